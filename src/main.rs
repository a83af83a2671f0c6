//! # sspai digest
//!
//! Walks sspai.com post ids, extracts each post, summarizes it through an
//! OpenAI-compatible LLM API and records the results.
//!
//! ## Features
//!
//! - Sequential walk over an id range with a fixed pause between requests
//! - Field extraction with fallback locators for older page layouts
//! - LLM summaries with a deterministic extractive fallback when the
//!   service is unreachable or out of quota
//! - Each result appended to a JSONL file as soon as it exists, so an
//!   interrupted walk keeps everything it already produced
//! - Batch mode writing JSON and Markdown reports
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=... sspai_digest range --start 90001 --end 90100 -o abstract.jsonl
//! ```
//!
//! ## Architecture
//!
//! One id at a time:
//! 1. **Fetching**: GET `<site>/post/<id>` and extract the fields
//! 2. **Summarizing**: ask the LLM, fall back to leading paragraphs
//! 3. **Persisting**: append one JSON line and sync it before moving on

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod error;
mod inspect;
mod models;
mod outputs;
mod pipeline;
mod report;
mod scrapers;
mod summarizer;
mod utils;

use api::ChatClient;
use cli::{Cli, Command};
use config::LlmSettings;
use outputs::jsonl::JsonlSink;
use outputs::{json, markdown};
use pipeline::Pipeline;
use report::TextReporter;
use scrapers::sspai::SspaiFetcher;
use summarizer::Summarizer;
use utils::ensure_parent_writable;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Diagnostics go to stderr so stdout carries only the progress report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    let args = Cli::parse();
    debug!(command = ?args.command, site = %args.site_url, "Parsed CLI arguments");

    let result = run(args).await;

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, secs = elapsed.as_secs(), "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result
}

/// Wire the fetcher and the summary client. Fails when no API key is set.
fn build_pipeline(
    api_key: Option<String>,
    config: Option<&str>,
    site_url: &str,
    summary_length: Option<usize>,
) -> Result<Pipeline<SspaiFetcher, ChatClient>, Box<dyn Error>> {
    let settings = LlmSettings::load(config)?;
    let summary_length = summary_length.unwrap_or(settings.summary_length);
    let chat = ChatClient::new(api_key, &settings)?;
    let fetcher = SspaiFetcher::new(site_url)?;
    info!(?chat, site = %site_url, summary_length, "Pipeline initialized");

    Ok(Pipeline::new(fetcher, Summarizer::new(chat), summary_length))
}

async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let Cli {
        api_key,
        config,
        site_url,
        summary_length,
        command,
    } = args;
    let pipeline = || build_pipeline(api_key, config.as_deref(), &site_url, summary_length);

    match command {
        Command::Range {
            start,
            end,
            output,
            delay,
        } => {
            let pipeline = pipeline()?;
            let output_path = Path::new(&output);
            ensure_parent_writable(output_path)?;
            let sink = JsonlSink::new(output_path);
            let reporter = TextReporter::stdout();

            println!("Walking ids {start}..{end} (end excluded)");
            println!("Output file: {output}");
            println!("Delay between requests: {delay:?}");
            println!("Press Ctrl+C to stop at any time\n");

            tokio::select! {
                walked = pipeline.walk_range(start..end, &sink, delay, &reporter) => {
                    let stats = walked?;
                    println!("\nFinished {stats}; results saved to {output}");
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!(output = %output, "Interrupted; stopping walk");
                    println!("\nInterrupted; records saved so far are in {output}");
                }
            }
        }

        Command::Article { id } => {
            let pipeline = pipeline()?;
            let Some(article) = pipeline.process_article(&id).await else {
                return Err(format!("failed to process article {id}; check that the id exists").into());
            };
            println!("Title: {}", article.title);
            println!("Author: {}", article.author);
            println!("Summary: {}", article.summary.as_deref().unwrap_or_default());
        }

        Command::Batch { ids, name, delay } => {
            let pipeline = pipeline()?;
            println!("Processing {} articles...", ids.len());
            let results = pipeline.process_many(&ids, delay).await;
            if results.is_empty() {
                return Err("no article in the batch could be processed".into());
            }

            let json_path = format!("{name}.json");
            let md_path = format!("{name}.md");
            ensure_parent_writable(Path::new(&json_path))?;
            json::write_articles(&results, Path::new(&json_path)).await?;
            markdown::write_report(&results, Path::new(&md_path)).await?;

            println!("Processed {}/{} articles", results.len(), ids.len());
            println!("JSON results: {json_path}");
            println!("Markdown report: {md_path}");
        }

        // Works on local files and needs no credentials.
        Command::Inspect { path } => {
            let analysis = inspect::analyze_html_file(Path::new(&path)).await?;
            print!("{}", inspect::render(&analysis));
        }
    }

    Ok(())
}
