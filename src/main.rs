use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use faculty_recommender::{
    parse_query, persist, source, IndexBuilder, Recommendation, Recommender, Settings, StopWords,
    Tokenizer,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "faculty-recommender")]
#[command(about = "Rank faculty profiles against free-text queries", version)]
struct Cli {
    /// settings file (default: ./faculty-recommender.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// index artifact, overrides the configured path
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    /// stopword list, overrides the configured path
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the index from the full corpus and persist it
    Build(BuildArgs),
    /// Answer one query
    Query(QueryArgs),
    /// Read queries from stdin until `exit`
    Interactive,
    /// Show how a query's result count is parsed
    Parse { text: Vec<String> },
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// read records from a JSON file instead of the ingestion endpoint
    #[arg(long, conflicts_with = "corpus_url")]
    corpus_file: Option<PathBuf>,
    /// ingestion endpoint, overrides the configured URL
    #[arg(long)]
    corpus_url: Option<String>,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// print results as JSON
    #[arg(long)]
    json: bool,
    #[arg(required = true)]
    text: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(index) = cli.index {
        settings.index_path = index;
    }
    if let Some(stopwords) = cli.stopwords {
        settings.stopwords_path = stopwords;
    }
    init_tracing(&settings.log_level);

    match cli.command {
        Commands::Build(args) => run_build(&settings, args),
        Commands::Query(args) => run_query(&settings, args),
        Commands::Interactive => run_interactive(&settings),
        Commands::Parse { text } => {
            let (text, k) = parse_query(&text.join(" ")).into_parts();
            println!("{k}\t{text}");
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_build(settings: &Settings, args: BuildArgs) -> Result<()> {
    let start = Instant::now();
    let stopwords = StopWords::load(&settings.stopwords_path)?;
    let records = match (args.corpus_file, args.corpus_url) {
        (Some(path), _) => source::read_json_file(&path)?,
        (None, url) => {
            let url = url.unwrap_or_else(|| settings.corpus_url.clone());
            source::fetch(&url, Duration::from_secs(settings.http_timeout_secs))?
        }
    };

    let builder: IndexBuilder = IndexBuilder::new(Tokenizer::new(Arc::new(stopwords)));
    let index = builder.build(records);
    persist(&index, &settings.index_path)
        .with_context(|| format!("index not written to {}", settings.index_path.display()))?;

    tracing::info!(
        documents = index.doc_num(),
        vocabulary = index.vocab_size(),
        path = %settings.index_path.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build finished"
    );
    Ok(())
}

fn open(settings: &Settings) -> Result<Recommender> {
    Recommender::open(settings).context("cannot serve without a valid index; run `build` first")
}

fn run_query(settings: &Settings, args: QueryArgs) -> Result<()> {
    let recommender = open(settings)?;
    let results = recommender.recommend(&args.text.join(" "));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }
    Ok(())
}

fn run_interactive(settings: &Settings) -> Result<()> {
    let recommender = open(settings)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("Query> ");
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        let start = Instant::now();
        let results = recommender.recommend(trimmed);
        tracing::debug!(elapsed_us = start.elapsed().as_micros() as u64, "query answered");
        if results.is_empty() {
            println!("(no results)");
        }
        print_results(&results);
    }
    Ok(())
}

fn print_results(results: &[Recommendation]) {
    for r in results {
        println!("{:.4}\t{}\t{}", r.score, r.name, r.profile_url);
    }
}
