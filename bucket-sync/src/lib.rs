//! CLI glue for bucket-sync.
//!
//! All pipeline logic (walking, filtering, fingerprinting, upload
//! orchestration, reporting) lives in `bucket-sync-core`. This crate only
//! parses arguments, loads and validates the YAML configuration, constructs
//! the concrete S3/MinIO store client and dispatches to the core pipeline.

pub mod cli;
pub mod load_config;
pub mod policy;
pub mod store;
