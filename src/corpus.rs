//! Corpus discovery: the documents the indexing pipeline embeds.
//!
//! Walks `corpus.root`, keeps files whose path relative to the root matches
//! one of `corpus.include_globs`, and returns them sorted by path.

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::CorpusConfig;
use crate::models::Document;

/// Separator placed after every document when the corpus is concatenated.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

pub fn read_documents(config: &CorpusConfig) -> Result<Vec<Document>> {
    let root = &config.root;
    if !root.is_dir() {
        bail!("Corpus root does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if include_set.is_match(relative) {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Document { path, text })
        })
        .collect()
}

/// Join all documents, each followed by a blank line.
///
/// Document identity is lost: a chunk may span two files.
pub fn concatenate(documents: &[Document]) -> String {
    let mut all_text = String::with_capacity(
        documents
            .iter()
            .map(|d| d.text.len() + DOCUMENT_SEPARATOR.len())
            .sum(),
    );
    for doc in documents {
        all_text.push_str(&doc.text);
        all_text.push_str(DOCUMENT_SEPARATOR);
    }
    all_text
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // `*` stops at path separators, like a shell glob.
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}
