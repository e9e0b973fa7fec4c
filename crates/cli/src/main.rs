use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{MovieId, YearPattern, load_genome_tags};
use pipeline::{BoxBar, IndicatifBar, IngestConfig, Ingestor, MeanMode, NullSink, StatusSink};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;
use store::{DocumentStore, JsonLinesStore, MovieDocument, SortField};
use tracing::info;

/// ReelIngest - MovieLens preprocessing pipeline
#[derive(Parser)]
#[command(name = "reel-ingest")]
#[command(about = "Aggregate MovieLens ratings and tag genome into a movie document store", long_about = None)]
struct Cli {
    /// Path to MovieLens 25M dataset directory
    #[arg(short, long, default_value = "data/ml-25m")]
    data_dir: PathBuf,

    /// JSON-lines document store file
    #[arg(short, long, default_value = "data/movies.jsonl")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate the CSV files and upsert one document per movie
    Ingest {
        /// Rows per chunk
        #[arg(long, default_value_t = data_loader::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Genome tags kept per movie
        #[arg(long, default_value_t = pipeline::aggregators::genome::DEFAULT_TOP_TAGS)]
        top_tags: usize,

        /// Average per-chunk means instead of weighting by rating count
        #[arg(long)]
        chunk_mean: bool,

        /// Take the year from between the first '(' and the last ')'
        #[arg(long)]
        legacy_year: bool,

        /// Expected number of rating chunks (progress only)
        #[arg(long, default_value_t = pipeline::config::EXPECTED_RATING_CHUNKS)]
        rating_chunks: usize,

        /// Expected number of genome chunks (progress only)
        #[arg(long, default_value_t = pipeline::config::EXPECTED_GENOME_CHUNKS)]
        genome_chunks: usize,

        /// Expected number of movie chunks (progress only)
        #[arg(long, default_value_t = pipeline::config::EXPECTED_MOVIE_CHUNKS)]
        movie_chunks: usize,

        /// Draw the plain text progress box instead of a terminal bar
        #[arg(long)]
        plain: bool,

        /// No progress output
        #[arg(long)]
        quiet: bool,
    },

    /// List the top movies by a field, descending
    Top {
        #[arg(long, value_enum, default_value = "rating")]
        field: FieldArg,

        /// Number of movies to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show one stored movie with its tag names
    Show {
        #[arg(long)]
        movie_id: MovieId,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Rating,
    Year,
    Count,
}

impl From<FieldArg> for SortField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Rating => SortField::Rating,
            FieldArg::Year => SortField::Year,
            FieldArg::Count => SortField::RatingCount,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            chunk_size,
            top_tags,
            chunk_mean,
            legacy_year,
            rating_chunks,
            genome_chunks,
            movie_chunks,
            plain,
            quiet,
        } => {
            let config = IngestConfig {
                data_dir: cli.data_dir,
                chunk_size,
                top_tags,
                mean_mode: if chunk_mean { MeanMode::ChunkMean } else { MeanMode::Weighted },
                year_pattern: if legacy_year { YearPattern::Legacy } else { YearPattern::Strict },
                expected_rating_chunks: rating_chunks,
                expected_genome_chunks: genome_chunks,
                expected_movie_chunks: movie_chunks,
            };
            let mut sink: Box<dyn StatusSink> = if quiet {
                Box::new(NullSink)
            } else if plain {
                Box::new(BoxBar::new(std::io::stdout()))
            } else {
                Box::new(IndicatifBar::new(std::io::stderr().is_terminal()))
            };
            handle_ingest(config, &cli.store, sink.as_mut())?
        }
        Commands::Top { field, limit } => handle_top(&cli.store, field.into(), limit)?,
        Commands::Show { movie_id } => handle_show(&cli.store, &cli.data_dir, movie_id)?,
    }

    Ok(())
}

/// Handle the 'ingest' command
fn handle_ingest(config: IngestConfig, store_path: &Path, sink: &mut dyn StatusSink) -> Result<()> {
    let ingestor = Ingestor::new(config)?;
    let mut store = JsonLinesStore::open(store_path)
        .with_context(|| format!("Failed to open store {}", store_path.display()))?;

    println!(
        "Ingesting MovieLens dataset from {}...",
        ingestor.config().data_dir.display()
    );
    let start = Instant::now();
    let summary = ingestor
        .run(&mut store, sink)
        .context("Ingest run failed")?;
    store.compact().context("Failed to compact store")?;

    println!("{} Ingested dataset in {:?}", "✓".green(), start.elapsed());
    println!("{}Documents written: {}", "• ".green(), summary.movies_written);
    println!("{}With rating: {}", "• ".green(), summary.rated_movies);
    println!("{}With genome tags: {}", "• ".green(), summary.tagged_movies);
    if summary.orphan_rating_keys > 0 || summary.orphan_genome_keys > 0 {
        println!(
            "{}Skipped ids missing from movies.csv: {} rated, {} tagged",
            "• ".yellow(),
            summary.orphan_rating_keys,
            summary.orphan_genome_keys
        );
    }
    info!("Store {} now holds {} documents", store.path().display(), store.len());
    Ok(())
}

/// Handle the 'top' command
fn handle_top(store_path: &Path, field: SortField, limit: usize) -> Result<()> {
    let store = open_existing(store_path)?;
    let top = store.top_by(field, limit)?;

    println!("{}", format!("Top {} movies by {:?}:", limit, field).bold().blue());
    for (rank, doc) in top.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Rating: {} ({} ratings)",
            (rank + 1).to_string().green(),
            doc.title.trim_end(),
            doc.year,
            doc.genres.join(", "),
            format_rating(doc),
            doc.rating_count
        );
    }
    Ok(())
}

/// Handle the 'show' command
fn handle_show(store_path: &Path, data_dir: &Path, movie_id: MovieId) -> Result<()> {
    let store = open_existing(store_path)?;
    let doc = store
        .get(movie_id)
        .ok_or_else(|| anyhow!("Movie {} not found", movie_id))?;

    let tags_path = data_dir.join("genome-tags.csv");
    let tag_names = load_genome_tags(&tags_path)
        .with_context(|| format!("Failed to load tag names from {}", tags_path.display()))?;

    println!("{}", format!("Movie ID: {}", doc.movie_id).bold().blue());
    println!("{}Title: {}", "• ".green(), doc.title.trim_end());
    println!("{}Year: {}", "• ".green(), doc.year);
    println!("{}Genres: {}", "• ".green(), doc.genres.join(", "));
    println!("{}Rating: {} ({} ratings)", "• ".cyan(), format_rating(doc), doc.rating_count);

    let mut tags: Vec<(&u32, &f32)> = doc.tags.iter().collect();
    tags.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    println!("Top tags:");
    for (tag_id, relevance) in tags {
        let name = tag_names.get(tag_id).map(String::as_str).unwrap_or("?");
        println!("  - {} (#{}): {:.3}", name, tag_id, relevance);
    }
    Ok(())
}

fn open_existing(store_path: &Path) -> Result<JsonLinesStore> {
    if !store_path.exists() {
        return Err(anyhow!(
            "Store {} does not exist; run 'reel-ingest ingest' first",
            store_path.display()
        ));
    }
    JsonLinesStore::open(store_path)
        .with_context(|| format!("Failed to open store {}", store_path.display()))
}

fn format_rating(doc: &MovieDocument) -> String {
    doc.rating
        .map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "n/a".to_string())
}
