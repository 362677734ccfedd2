// SPDX-License-Identifier: MIT

//! Activity-Logger: habit and activity tracking with live Firestore sync.
//!
//! This crate mirrors a remote document collection into an in-memory
//! activity registry with optimistic local updates, and derives progress
//! metrics (streaks, weekly completion, goal status) on read.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prefs;
pub mod registry;
pub mod services;
pub mod time_utils;

pub use error::{AppError, Result};
pub use registry::ActivityRegistry;
pub use services::{SyncPhase, SyncService, SyncStatus};
