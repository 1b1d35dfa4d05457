// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the collaborators (fetcher, oracle, file sink) from them
// 3. Run a single-seed crawl or a keyword-driven crawl
// 4. Print the summary and exit (0 = done, 1 = usage error, 2 = error)
//
// The runtime is tokio's current-thread flavor: all crawl workers share one
// thread and interleave at their .await points (fetch, oracle, file write).
// =============================================================================

mod cli;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use cli::Cli;
use data_gatherer::crawl::{
    crawl_from_seed, crawl_keywords, CrawlContext, KeywordRunSummary, RunSummary,
};
use data_gatherer::extract::normalize_url;
use data_gatherer::fetch::HttpFetcher;
use data_gatherer::oracle::GroqOracle;
use data_gatherer::persist::FileSink;
use data_gatherer::search::{read_keywords, SerpApiSearch};
use data_gatherer::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished
//   Ok(1) = nothing to crawl (usage error)
//   Err   = setup failed (bad seed URL, unreadable keyword file, ...)
async fn run(cli: Cli) -> Result<i32> {
    if cli.seed_url.is_none() && cli.keywords.is_none() {
        eprintln!("{}", Cli::command().render_usage());
        return Ok(1);
    }

    let context = Arc::new(build_context(&cli)?);

    match (&cli.seed_url, &cli.keywords) {
        (Some(seed_url), _) => handle_seed_crawl(seed_url, context, cli.json).await,
        (None, Some(path)) => handle_keyword_crawl(path, &cli, context).await,
        (None, None) => Ok(1),
    }
}

fn build_context(cli: &Cli) -> Result<CrawlContext> {
    let fetcher = HttpFetcher::new(&cli.fetch_settings()).context("could not build HTTP client")?;

    let groq = cli.groq_settings();
    if groq.api_key.as_deref().map_or(true, str::is_empty) {
        warn!("GROQ_API_KEY is not set, no page will be judged worth saving");
    }
    let oracle = GroqOracle::new(groq).context("could not build Groq client")?;

    let sink = FileSink::new(&cli.output_dir);
    info!(dir = %sink.dir().display(), "accepted pages will be saved here");

    Ok(CrawlContext {
        fetcher: Arc::new(fetcher),
        oracle: Arc::new(oracle),
        sink: Arc::new(sink),
        settings: cli.crawl_settings(),
    })
}

async fn handle_seed_crawl(seed_url: &str, context: Arc<CrawlContext>, json: bool) -> Result<i32> {
    let seed = parse_seed(seed_url)?;

    println!("🔍 Crawling from: {}", seed);
    let summary = crawl_from_seed(seed, context).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_run_summary(&summary);
    }
    Ok(0)
}

async fn handle_keyword_crawl(path: &Path, cli: &Cli, context: Arc<CrawlContext>) -> Result<i32> {
    let keywords = read_keywords(path).await?;
    if keywords.is_empty() {
        println!("⚠️  No keywords found in {}", path.display());
        return Ok(0);
    }

    let search = SerpApiSearch::new(cli.serpapi_settings())
        .context("keyword mode needs a SerpAPI key")?;

    println!(
        "🔍 Processing {} keyword(s), visited scope: {:?}",
        keywords.len(),
        cli.visited_scope
    );
    let summary = crawl_keywords(&keywords, &search, context, cli.visited_scope).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_keyword_summary(&summary);
    }
    Ok(0)
}

fn parse_seed(seed_url: &str) -> Result<Url> {
    let seed = Url::parse(seed_url).with_context(|| format!("invalid URL '{}'", seed_url))?;
    if !matches!(seed.scheme(), "http" | "https") {
        bail!("only http and https URLs can be crawled, got '{}'", seed_url);
    }
    Ok(normalize_url(seed))
}

fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("✅ Crawl completed.");
    println!("📊 Summary:");
    println!("   🌐 Unique pages visited: {}", summary.pages_visited);
    println!("   💾 Pages saved: {}", summary.stats.saved);
    println!("   ❌ Failed fetches: {}", summary.stats.fetch_failures);
}

fn print_keyword_summary(summary: &KeywordRunSummary) {
    println!();
    println!("{:<40} {:>8} {:>10}", "KEYWORD", "SEEDS", "VISITED");
    println!("{}", "=".repeat(60));

    for keyword in &summary.keywords {
        // Truncate on a character boundary so long keywords don't break the table
        let display: String = if keyword.keyword.chars().count() > 37 {
            format!("{}...", keyword.keyword.chars().take(37).collect::<String>())
        } else {
            keyword.keyword.clone()
        };

        match &keyword.error {
            Some(error) => println!("{:<40} ⚠️  search failed: {}", display, error),
            None => println!(
                "{:<40} {:>8} {:>10}",
                display, keyword.seeds, keyword.pages_visited
            ),
        }
    }

    println!();
    println!("✅ All keywords processed.");
    println!("📊 Summary:");
    println!("   🌐 Total unique pages visited: {}", summary.total_unique_visited);
    println!("   💾 Pages saved: {}", summary.stats.saved);
    println!("   ❌ Failed fetches: {}", summary.stats.fetch_failures);
}
