//! Files Module
//!
//! Per-user audio file uploads: extension gating, storage into the upload
//! directory and database bookkeeping.

pub mod db;
pub mod handlers;
pub mod models;
pub mod storage;

pub use models::StoredFile;
