//! # bucket-sync CLI interface
//!
//! Command parsing and dispatch for the `bucket-sync` binary. Keep all
//! non-trivial business logic inside `bucket-sync-core`; this module is
//! strictly argument exposure and orchestration.
//!
//! ## Subcommands
//! - `sync` — run the full walk → filter → upload → manifest pipeline.
//! - `make-public` — one-shot administrative task: ensure the bucket exists
//!   and grant anonymous read access on it. Not part of the recurring
//!   pipeline.
//!
//! The async [`run`] entrypoint is public so integration tests can invoke
//! the CLI programmatically.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bucket_sync_core::contract::ObjectStore;
use bucket_sync_core::synchronise::{ensure_bucket, synchronise};

use crate::load_config::load_config;
use crate::policy::public_read_policy;
use crate::store::MinioStore;

/// CLI for bucket-sync: mirror a directory into an object-store bucket.
#[derive(Parser)]
#[clap(
    name = "bucket-sync",
    version,
    about = "Mirror a local directory into an S3-compatible bucket and emit an upload manifest"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk the scan directory and upload admitted files to the bucket
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Grant anonymous read access on the configured bucket (one-shot)
    MakePublic {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "sync", "Starting synchronisation run");
            let store = MinioStore::connect(&config.storage).await?;
            let report = synchronise(&config, &store).await?;
            tracing::info!(
                command = "sync",
                uploaded = report.uploaded,
                failed = report.failed,
                "Synchronisation complete"
            );
            println!(
                "Processed {} files ({} failed). Report saved to {}",
                report.uploaded,
                report.failed,
                report.report_path.display()
            );
            Ok(())
        }
        Commands::MakePublic { config } => {
            let config = load_config(config)?;
            let bucket = &config.storage.bucket;
            tracing::info!(command = "make-public", bucket = %bucket, "Applying public-read bucket policy");
            let store = MinioStore::connect(&config.storage).await?;
            ensure_bucket(&store, bucket).await?;
            let policy = public_read_policy(bucket);
            store
                .set_bucket_policy(bucket, &policy)
                .await
                .map_err(|e| anyhow::anyhow!("failed to set bucket policy on '{bucket}': {e}"))?;
            println!("Bucket '{bucket}' is now publicly readable");
            Ok(())
        }
    }
}
