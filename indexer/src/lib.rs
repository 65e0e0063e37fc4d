pub mod query_file;

use anyhow::{Context, Result};
use invidx_core::persist::{load_index, save_index};
use invidx_core::{build_index, format_hits, load_documents_with, CodecKind, DuplicatePolicy, IndexStats};
use std::io::Write;
use std::path::{Path, PathBuf};

use query_file::{read_query_lines, QueryEncoding};

pub enum QuerySource {
    Terms(Vec<String>),
    File { path: PathBuf, encoding: QueryEncoding },
}

/// Load a corpus, build the index and write it with the chosen codec.
pub fn run_build(dataset: &Path, output: &Path, codec: CodecKind, policy: DuplicatePolicy) -> Result<IndexStats> {
    let docs = load_documents_with(dataset, policy)
        .with_context(|| format!("loading corpus {}", dataset.display()))?;
    let index = build_index(&docs);
    save_index(output, codec.codec().as_ref(), &index)
        .with_context(|| format!("writing index {}", output.display()))?;
    let stats = index.stats();
    tracing::info!(output = %output.display(), terms = stats.terms, postings = stats.postings, "index build complete");
    Ok(stats)
}

/// Answer each query with one comma-joined line of document ids.
pub fn run_query<W: Write>(index_path: &Path, codec: CodecKind, source: QuerySource, out: &mut W) -> Result<()> {
    let index = load_index(index_path, codec.codec().as_ref())
        .with_context(|| format!("loading index {}", index_path.display()))?;
    match source {
        QuerySource::Terms(terms) => writeln!(out, "{}", format_hits(&index.query(&terms)))?,
        QuerySource::File { path, encoding } => {
            for line in read_query_lines(&path, encoding)? {
                let terms: Vec<&str> = line.split_whitespace().collect();
                writeln!(out, "{}", format_hits(&index.query(&terms)))?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

pub fn run_stats(index_path: &Path, codec: CodecKind) -> Result<IndexStats> {
    let index = load_index(index_path, codec.codec().as_ref())
        .with_context(|| format!("loading index {}", index_path.display()))?;
    Ok(index.stats())
}
