#![doc = "bucket-sync-core: core pipeline library for bucket-sync."]

//! This crate contains all decision logic for the synchronisation pipeline:
//! walking a local tree, filtering candidates, fingerprinting content,
//! coordinating uploads and assembling the run manifest.
//!
//! The object store itself is an external collaborator, consumed through the
//! [`contract::ObjectStore`] trait; no storage SDK, config file format or CLI
//! concern lives here.
//!
//! # Usage
//! Depend on this crate for the pipeline entrypoint
//! ([`synchronise::synchronise`]) and the collaborator contract. The binary
//! crate provides a concrete store implementation and config loading.

pub mod config;
pub mod contract;
pub mod filter;
pub mod fingerprint;
pub mod report;
pub mod synchronise;
pub mod upload;
pub mod walk;
