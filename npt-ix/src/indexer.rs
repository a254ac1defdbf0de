//! Bulk indexing job
//!
//! Populates the `nounphrases` collection from the noun-phrase corpus.
//! For every file: derive the document id from the file name, look up the
//! paper's published date in `arxiv_metadata`, build one record per
//! distinct phrase with its per-file frequency, and post the batch to
//! Solr. Files are processed by a fixed pool of concurrent workers; each
//! file's output is disjoint, so the workers share no mutable state and
//! no ordering is guaranteed. There are no retries: the first failed
//! Solr call terminates the job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use npt_common::solr::{Collection, SolrClient};
use npt_common::{Error, Result};

use crate::npfiles;

/// Fixed worker pool size
pub const WORKERS: usize = 4;

/// Outcome of a bulk-indexing run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    pub files_indexed: usize,
    pub records_posted: usize,
    pub files_skipped: usize,
}

/// Index every noun-phrase file under `folder` into `collection`
pub async fn index_corpus(
    client: &SolrClient,
    folder: &Path,
    collection: Collection,
) -> Result<IndexSummary> {
    let paths = npfiles::np_file_paths(folder);
    info!(files = paths.len(), workers = WORKERS, "bulk indexing started");

    let semaphore = Arc::new(Semaphore::new(WORKERS));
    let mut tasks: JoinSet<Result<Option<usize>>> = JoinSet::new();
    for path in paths {
        let permit_source = semaphore.clone();
        let client = client.clone();
        tasks.spawn(async move {
            // Closed only when the semaphore is dropped, which outlives the tasks
            let _permit = permit_source
                .acquire_owned()
                .await
                .map_err(|e| Error::InvalidInput(e.to_string()))?;
            index_one_file(&client, &path, collection).await
        });
    }

    let mut summary = IndexSummary::default();
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(|e| Error::InvalidInput(format!("worker panicked: {}", e)))?;
        match outcome? {
            Some(records) => {
                summary.files_indexed += 1;
                summary.records_posted += records;
            }
            None => summary.files_skipped += 1,
        }
    }
    info!(
        files = summary.files_indexed,
        records = summary.records_posted,
        skipped = summary.files_skipped,
        "bulk indexing finished"
    );
    Ok(summary)
}

/// Index one file; Ok(None) when the file has no usable id or no phrases
async fn index_one_file(
    client: &SolrClient,
    path: &PathBuf,
    collection: Collection,
) -> Result<Option<usize>> {
    let Some(document_id) = npfiles::document_id_from_path(path) else {
        warn!(path = %path.display(), "cannot derive document id, skipping");
        return Ok(None);
    };
    let phrase_counts = npfiles::read_np_file(path)?;
    if phrase_counts.is_empty() {
        return Ok(None);
    }

    let published_date = client.published_date(&document_id).await?;
    let date_field = published_date.map(|d| format!("{}T00:00:00Z", d));

    let phrase_field = collection.phrase_field();
    let docs: Vec<serde_json::Value> = phrase_counts
        .iter()
        .map(|(phrase, frequency)| {
            json!({
                phrase_field: phrase,
                "num_occurrences": frequency,
                "published_date": date_field,
                "arxiv_identifier": document_id,
            })
        })
        .collect();

    client.add(collection, &docs).await?;
    Ok(Some(docs.len()))
}
