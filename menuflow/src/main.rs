//! Menuflow CLI
//!
//! Usage:
//!   menuflow ask "Quali piatti usano il curry e il riso?" --show-contexts
//!   menuflow search Ramen Sashimi --text-dir data/MenuTxt --context-chars 200
//!   menuflow search pomodoro --exclude
//!
//! Configuration is read from `--config` (or `MENUFLOW_CONFIG`), then
//! `MENUFLOW_*` environment variables; a `.env` file is loaded first.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use menuflow::capability::HttpCapability;
use menuflow::config::MenuflowConfig;
use menuflow::corpus::TextMenuSearch;
use menuflow::events::LoggingEventSink;
use menuflow::pipeline::PipelineBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Keyword-filtered menu retrieval
#[derive(Parser, Debug)]
#[command(name = "menuflow", version)]
#[command(about = "Answer questions about restaurant menus with canonical recipe ids")]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Configuration file (JSON)
    #[arg(long, short = 'c', env = "MENUFLOW_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a question with the matching dishes
    Ask {
        /// The question, in natural language
        question: String,

        /// Directory of per-restaurant JSON menus
        #[arg(long)]
        corpus_dir: Option<PathBuf>,

        /// Dish name to id mapping file
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Also print matched restaurants and the evidence trail
        #[arg(long)]
        show_contexts: bool,
    },

    /// Search plain-text menus for keywords
    Search {
        /// Keywords to look for
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Directory of plain-text menus
        #[arg(long)]
        text_dir: Option<PathBuf>,

        /// Characters kept before each occurrence
        #[arg(long)]
        context_chars: Option<usize>,

        /// List restaurants that do NOT mention the keyword
        #[arg(long)]
        exclude: bool,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn ask(
    config: MenuflowConfig,
    question: &str,
    corpus_dir: Option<PathBuf>,
    mapping: Option<PathBuf>,
    show_contexts: bool,
) -> Result<()> {
    let mut config = config;
    if let Some(dir) = corpus_dir {
        config.corpus.json_dir = dir;
    }
    if let Some(path) = mapping {
        config.mapping.path = path;
    }

    let capability = HttpCapability::new(config.capability.clone())
        .context("Failed to create capability client")?;
    let pipeline = PipelineBuilder::from_config(&config)
        .capability(Arc::new(capability))
        .event_sink(Arc::new(LoggingEventSink::debug()))
        .build()?;

    let state = pipeline.run_with_state(question).await?;
    let resolved = state.resolved_recipes().unwrap_or_default();

    let output = if show_contexts {
        serde_json::json!({
            "run_id": state.identity().run_id,
            "filters": state.filter_set(),
            "matched_restaurants": state.matched_restaurants(),
            "contexts": state.contexts(),
            "resolved": resolved,
        })
    } else {
        serde_json::json!(resolved)
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn search(
    config: &MenuflowConfig,
    keywords: &[String],
    text_dir: Option<PathBuf>,
    context_chars: Option<usize>,
    exclude: bool,
) -> Result<()> {
    let dir = text_dir.unwrap_or_else(|| config.corpus.text_dir.clone());
    let mut search = TextMenuSearch::new(dir);
    if let Some(chars) = context_chars {
        search = search.with_context_chars(chars);
    }

    let output = if exclude {
        let [keyword] = keywords else {
            bail!("--exclude takes exactly one keyword, got {}", keywords.len());
        };
        serde_json::json!(search.restaurants_with_keyword(keyword, false)?)
    } else {
        serde_json::json!(search.search(keywords)?)
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = MenuflowConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Ask {
            question,
            corpus_dir,
            mapping,
            show_contexts,
        } => ask(config, &question, corpus_dir, mapping, show_contexts).await,
        Command::Search {
            keywords,
            text_dir,
            context_chars,
            exclude,
        } => search(&config, &keywords, text_dir, context_chars, exclude),
    }
}
