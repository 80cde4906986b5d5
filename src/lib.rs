//! sift - An adaptive email priority triage engine
//!
//! This crate classifies inbox messages into priority tags using ordered
//! keyword rules, then adapts its verdicts per sender from an append-only log
//! of user corrections.

pub mod classify;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod services;
pub mod storage;

pub use storage::StorageLayer;
