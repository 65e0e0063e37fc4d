use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indexer::query_file::QueryEncoding;
use indexer::{run_build, run_query, run_stats, QuerySource};
use invidx_core::{CodecKind, DuplicatePolicy};
use tracing_subscriber::{fmt, EnvFilter};

use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build, save, load and query an inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a corpus file and save it to disk
    Build {
        /// Corpus with one `<id> <text>` document per line
        #[arg(long = "dataset")]
        dataset: PathBuf,
        /// Where to write the index
        #[arg(long)]
        output: PathBuf,
        /// On-disk encoding (fixed or varint)
        #[arg(long, default_value_t = CodecKind::Fixed)]
        codec: CodecKind,
        /// Fail on repeated document ids instead of keeping the last one
        #[arg(long, default_value_t = false)]
        strict_ids: bool,
    },
    /// Load a saved index and print matching document ids per query
    Query {
        /// Path to a saved index
        #[arg(long)]
        index: PathBuf,
        #[arg(long, default_value_t = CodecKind::Fixed)]
        codec: CodecKind,
        #[command(flatten)]
        input: QueryInput,
    },
    /// Print term and posting counts of a saved index as JSON
    Stats {
        #[arg(long)]
        index: PathBuf,
        #[arg(long, default_value_t = CodecKind::Fixed)]
        codec: CodecKind,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct QueryInput {
    /// Terms that must all appear in a document
    #[arg(long, num_args = 1..)]
    query: Option<Vec<String>>,
    /// UTF-8 file with one query per line (`-` for stdin)
    #[arg(long = "query-file-utf8")]
    query_file_utf8: Option<PathBuf>,
    /// cp1251 file with one query per line (`-` for stdin)
    #[arg(long = "query-file-cp1251")]
    query_file_cp1251: Option<PathBuf>,
}

impl QueryInput {
    fn into_source(self) -> QuerySource {
        match (self.query, self.query_file_utf8, self.query_file_cp1251) {
            (Some(terms), _, _) => QuerySource::Terms(terms),
            (None, Some(path), _) => QuerySource::File { path, encoding: QueryEncoding::Utf8 },
            (None, None, Some(path)) => QuerySource::File { path, encoding: QueryEncoding::Cp1251 },
            // clap enforces exactly one source
            (None, None, None) => QuerySource::Terms(Vec::new()),
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dataset, output, codec, strict_ids } => {
            let policy = if strict_ids { DuplicatePolicy::Reject } else { DuplicatePolicy::LastWriteWins };
            run_build(&dataset, &output, codec, policy)?;
            Ok(())
        }
        Commands::Query { index, codec, input } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run_query(&index, codec, input.into_source(), &mut out)
        }
        Commands::Stats { index, codec } => {
            let stats = run_stats(&index, codec)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}
