//! Command-line interface definitions.
//!
//! Global options configure the site and the summary service; the
//! subcommand picks what to run. The API key can come from the environment.

use crate::scrapers::sspai::DEFAULT_SITE;
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Walk ids 90001..=90099 into abstract.jsonl
/// sspai_digest range --start 90001 --end 90100
///
/// # Summarize a few posts and write articles.json / articles.md
/// sspai_digest batch 92777,92778,92779
///
/// # List candidate locators in a saved page
/// sspai_digest inspect saved_post.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// API key for the summary service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Optional path to a YAML file with summary service settings
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Root URL of the site; posts are fetched from `<site>/post/<id>`
    #[arg(long, env = "SSPAI_SITE_URL", default_value = DEFAULT_SITE, global = true)]
    pub site_url: String,

    /// Summary length in characters (overrides the config file)
    #[arg(long, global = true)]
    pub summary_length: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk ids in [start, end) and append every summarized post to a JSONL file
    Range {
        /// First id to fetch
        #[arg(long, default_value_t = 90001)]
        start: u64,

        /// Id to stop at (not fetched)
        #[arg(long, default_value_t = 90100)]
        end: u64,

        /// JSONL file to append to
        #[arg(short, long, default_value = "abstract.jsonl")]
        output: String,

        /// Seconds to wait before each request
        #[arg(short, long, default_value = "0.2", value_parser = parse_delay)]
        delay: Duration,
    },

    /// Fetch and summarize a single post
    Article {
        /// Post id
        id: String,
    },

    /// Summarize a list of posts and write `<name>.json` and `<name>.md`
    Batch {
        /// Post ids, separated by commas or spaces
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,

        /// Base name for the report files
        #[arg(short, long, default_value = "articles")]
        name: String,

        /// Seconds to wait between requests
        #[arg(short, long, default_value = "2.0", value_parser = parse_delay)]
        delay: Duration,
    },

    /// Report which generic locators match in a saved HTML page
    Inspect {
        /// Path to the HTML file
        path: String,
    },
}

/// Parse a non-negative number of seconds.
pub fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("`{raw}` is not a valid delay"))
}
