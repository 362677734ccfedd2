// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides the two collections the sync adapter consumes:
//! - Activities (definitions with embedded daily entries)
//! - Logs (append-only completion feed)

use serde::Deserialize;
use serde_json::Value;

use crate::db::{collections, ActivityStore};
use crate::error::{AppError, Result};
use crate::models::{Activity, LogRecord};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Deserialization target for the store-assigned id of a freshly created
/// document.
#[derive(Deserialize)]
struct CreatedDoc {
    #[serde(alias = "_firestore_id", default)]
    doc_id: Option<String>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::RemoteRead(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::RemoteRead(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client.as_ref().ok_or_else(|| {
            AppError::RemoteRead("Database not connected (offline mode)".to_string())
        })
    }

    /// Query a collection and deserialize each document, keying the `id`
    /// field from the document path (the map key and the body must agree).
    async fn list_collection<T>(
        &self,
        collection: &str,
        order_field: &str,
        set_id: impl Fn(&mut T, String),
    ) -> Result<Vec<T>>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        let docs = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .order_by([(order_field, firestore::FirestoreQueryDirection::Descending)])
            .query()
            .await
            .map_err(|e| AppError::RemoteRead(e.to_string()))?;

        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc
                .name
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            match firestore::FirestoreDb::deserialize_doc_to::<T>(&doc) {
                Ok(mut record) => {
                    set_id(&mut record, id);
                    out.push(record);
                }
                Err(e) => {
                    // Tolerate foreign documents in shared collections
                    tracing::warn!(collection, id, error = %e, "Skipping malformed document");
                }
            }
        }
        Ok(out)
    }

    /// Insert a document with a store-generated id and return that id.
    async fn create_in(&self, collection: &str, doc: Value) -> Result<String> {
        let created: CreatedDoc = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .generate_document_id()
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::RemoteWrite(e.to_string()))?;

        created.doc_id.ok_or_else(|| {
            AppError::RemoteWrite(format!("{}: store returned no document id", collection))
        })
    }
}

impl ActivityStore for FirestoreDb {
    async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.list_collection(
            collections::ACTIVITIES,
            "createdAt",
            |activity: &mut Activity, id| activity.id = id,
        )
        .await
    }

    async fn create_activity(&self, doc: Value) -> Result<String> {
        self.create_in(collections::ACTIVITIES, doc).await
    }

    async fn update_activity(&self, id: &str, patch: Value) -> Result<()> {
        let field_paths: Vec<String> = patch
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(field_paths)
            .in_col(collections::ACTIVITIES)
            .document_id(id)
            .object(&patch)
            .execute()
            .await
            .map_err(|e| AppError::RemoteWrite(e.to_string()))?;
        Ok(())
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ACTIVITIES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::RemoteWrite(e.to_string()))?;
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>> {
        self.list_collection(
            collections::LOGS,
            "timestamp",
            |record: &mut LogRecord, id| record.id = id,
        )
        .await
    }

    async fn create_log(&self, doc: Value) -> Result<String> {
        self.create_in(collections::LOGS, doc).await
    }
}
