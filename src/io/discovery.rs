use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::debug;

use crate::models::Document;

/// The longest event start marker id in the document (first one on ties).
///
/// Long ids are rare enough to identify the source file of an annotation.
pub fn fingerprint(doc: &Document) -> Option<&str> {
    doc.events()
        .map(|e| e.start.as_str())
        .fold(None, |best, id| match best {
            Some(best) if best.len() >= id.len() => Some(best),
            _ => Some(id),
        })
}

/// Find files in `dir` whose name ends in `suffix` and that mention the
/// document's fingerprint as a quoted attribute value.
///
/// Candidates are read concurrently; the hits are returned sorted.
pub async fn locate_original(doc: &Document, dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let Some(fingerprint) = fingerprint(doc) else {
        return Ok(Vec::new());
    };
    let needle = format!("\"{}\"", fingerprint);
    debug!("Searching {:?} for {}", dir, needle);

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut tasks = JoinSet::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches_suffix = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if !matches_suffix {
            continue;
        }

        let needle = needle.clone();
        tasks.spawn(async move {
            let content = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read candidate: {:?}", path))?;
            let hit = content
                .windows(needle.len())
                .any(|window| window == needle.as_bytes());
            Ok::<_, anyhow::Error>(hit.then_some(path))
        });
    }

    let mut hits = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        if let Some(path) = joined.context("Candidate scan task failed")?? {
            hits.push(path);
        }
    }
    hits.sort();
    Ok(hits)
}
