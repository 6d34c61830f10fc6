/// Image decoding module
///
/// This module handles:
/// - Reading picked files into memory (loader.rs)
/// - Decode failures (error.rs)
/// - Joining all decodes of one upload into a single batch

pub mod error;
pub mod loader;

pub use error::DecodeError;
pub use loader::{DataUriDecoder, FileHandle, ImageDecoder};

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::state::batch::{BatchAssembler, DecodedBatch};

/// Decode every file of one upload concurrently and wait for all of them.
///
/// Completions are fed to a [`BatchAssembler`] as they arrive, in whatever
/// order the runtime finishes them. Must be called from within a tokio
/// runtime.
pub async fn decode_batch<D: ImageDecoder>(decoder: Arc<D>, files: Vec<FileHandle>) -> DecodedBatch {
    if files.is_empty() {
        return DecodedBatch::empty();
    }

    info!(files = files.len(), "🔍 Decoding upload batch");

    let mut assembler = BatchAssembler::new(files.len());
    let mut tasks = JoinSet::new();
    for (position, file) in files.into_iter().enumerate() {
        let decoder = Arc::clone(&decoder);
        tasks.spawn(async move { (position, decoder.decode(file).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, outcome)) => {
                if let Some(batch) = assembler.record(position, outcome) {
                    return batch;
                }
            }
            Err(e) => warn!(error = %e, "⚠️  Decode task did not complete"),
        }
    }

    // Only reached when a task panicked or was aborted; its position never reported.
    assembler.fail_remaining("decode task did not complete")
}
