//! # douban-book CLI
//!
//! Terminal front end for the lookup flow.
//!
//! - `run`: prompt for a query, pick a hit, print the record variables
//! - `search`: print the candidates for a query
//! - `book`: print the record for a detail page URL
//!
//! Output is JSON on stdout. Logs and notices go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use douban_book::{
    Host, HttpFetcher, IntroStyle, Notice, RecordOutcome, SearchCandidate, SiteConfig, Workflow,
    WorkflowOutcome,
};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, instrument};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Search Douban for a book and print its metadata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON file overriding the site configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Keep markdown characters in intro text as they are
    #[arg(long, global = true)]
    no_escape: bool,

    /// Use the flat intro extraction
    #[arg(long, global = true)]
    flat_intro: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search, choose a candidate and print the record (default)
    Run(RunArgs),

    /// Print the candidates for a query
    Search(SearchArgs),

    /// Print the record of one detail page
    Book(BookArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Query to search for; prompts when omitted
    query: Option<String>,

    /// 1-based candidate to take without prompting
    #[arg(short, long)]
    pick: Option<usize>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Book title or ISBN
    #[arg(required = true)]
    query: String,
}

#[derive(Args, Debug)]
struct BookArgs {
    /// Detail page URL
    #[arg(required = true)]
    url: String,
}

/// Host reading answers from stdin
struct TerminalHost {
    query: Option<String>,
    pick: Option<usize>,
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalHost {
    fn new(args: RunArgs) -> Self {
        Self {
            query: args.query,
            pick: args.pick,
            lines: BufReader::new(stdin()).lines(),
        }
    }

    async fn read_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                debug!("stdin read failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Host for TerminalHost {
    async fn input_prompt(&mut self, prompt: &str) -> Option<String> {
        if let Some(query) = self.query.take() {
            return Some(query);
        }
        eprint!("{}", prompt);
        self.read_line().await
    }

    async fn choose<'c>(&mut self, candidates: &'c [SearchCandidate]) -> Option<&'c SearchCandidate> {
        let index = match self.pick.take() {
            Some(index) => index,
            None => {
                for (n, candidate) in candidates.iter().enumerate() {
                    eprintln!("{:>3}. {}", n + 1, candidate.display_label());
                }
                eprint!("> ");
                self.read_line().await?.trim().parse().ok()?
            }
        };
        candidates.get(index.checked_sub(1)?)
    }

    fn notify(&mut self, notice: Notice) {
        eprintln!("{}", notice);
    }
}

fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &GlobalArgs) -> anyhow::Result<SiteConfig> {
    let mut config = match &args.config {
        Some(path) => SiteConfig::from_file(path)?,
        None => SiteConfig::default(),
    };
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if args.no_escape {
        config.record.escape_markdown = false;
    }
    if args.flat_intro {
        config.record.intro_style = IntroStyle::Flat;
    }
    Ok(config)
}

#[instrument(skip(workflow))]
async fn run_search(workflow: &Workflow<HttpFetcher>, query: &str) -> anyhow::Result<ExitCode> {
    let candidates = workflow.search(query.trim()).await?;
    println!("{}", serde_json::to_string_pretty(&candidates)?);
    Ok(if candidates.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[instrument(skip(workflow))]
async fn run_book(workflow: &Workflow<HttpFetcher>, url: &str) -> anyhow::Result<ExitCode> {
    match workflow.book(url).await {
        RecordOutcome::Complete(record) => {
            let variables = record.to_variables(workflow.config().record.derive_file_name)?;
            println!("{}", serde_json::to_string_pretty(&variables)?);
            Ok(ExitCode::SUCCESS)
        }
        failed @ RecordOutcome::Failed { .. } => {
            println!("{}", serde_json::to_string_pretty(&failed)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.global.verbose);

    let config = load_config(&cli.global)?;
    let workflow = Workflow::from_config(config)?;

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let mut host = TerminalHost::new(args);
            match workflow.run(&mut host).await {
                WorkflowOutcome::Done(variables) => {
                    println!("{}", serde_json::to_string_pretty(&variables)?);
                    Ok(ExitCode::SUCCESS)
                }
                WorkflowOutcome::Failed(_) => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Search(args) => run_search(&workflow, &args.query).await,
        Commands::Book(args) => run_book(&workflow, &args.url).await,
    }
}
