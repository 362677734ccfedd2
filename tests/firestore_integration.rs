// SPDX-License-Identifier: MIT

//! Firestore integration tests. Require a running emulator
//! (`FIRESTORE_EMULATOR_HOST`); skipped otherwise.

mod common;

use activity_logger::db::ActivityStore;
use serde_json::json;

#[tokio::test]
async fn test_activity_document_lifecycle() {
    require_emulator!();
    let db = common::test_db().await;

    let id = db
        .create_activity(json!({
            "name": "Emulator Read",
            "color": "#1B4965",
            "type": "habit",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .await
        .expect("create");
    db.update_activity(&id, json!({ "id": id.clone() }))
        .await
        .expect("persist id");

    let listed = db.list_activities().await.expect("list");
    let created = listed
        .iter()
        .find(|a| a.id == id)
        .expect("created document listed");
    assert_eq!(created.name, "Emulator Read");

    db.update_activity(&id, json!({ "name": "Renamed" }))
        .await
        .expect("update");
    let listed = db.list_activities().await.expect("list after update");
    assert_eq!(listed.iter().find(|a| a.id == id).unwrap().name, "Renamed");

    db.delete_activity(&id).await.expect("delete");
    let listed = db.list_activities().await.expect("list after delete");
    assert!(listed.iter().all(|a| a.id != id));
}

#[tokio::test]
async fn test_log_feed_append_and_list() {
    require_emulator!();
    let db = common::test_db().await;

    let id = db
        .create_log(json!({
            "activityId": "abc",
            "activityName": "Read",
            "date": "2024-01-02",
            "timestamp": "2024-01-02T08:00:00Z"
        }))
        .await
        .expect("append log");

    let logs = db.list_logs().await.expect("list logs");
    let record = logs.iter().find(|l| l.id == id).expect("record listed");
    assert_eq!(record.activity_name, "Read");
    assert_eq!(record.date, "2024-01-02");
}
