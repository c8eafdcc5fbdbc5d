use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use termads::ads::{
    self, AdsClient, LinkFilter, LinkKind, LogicTarget, Match, Paper, QueryBackend, SearchForm,
    SearchLogic,
};
use termads::{config, tui};

#[derive(Parser)]
#[command(
    name = "termads",
    version = env!("TERMADS_VERSION"),
    about = "Search the NASA ADS abstract service from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive search form (default)
    Form,
    /// Run one search and print BibTeX for each hit
    Search(SearchArgs),
    /// Print the BibTeX entry for a bibcode
    Bibtex {
        /// ADS bibcode, e.g. 2014ApJ...780..118T
        bibcode: String,
    },
    /// Create the ~/.termads directory
    Init,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Author(s), e.g. "Tanaka, K."
    #[arg(short, long)]
    author: Option<String>,
    /// Words in the title
    #[arg(short, long)]
    title: Option<String>,
    /// Words in the abstract
    #[arg(long = "abs")]
    text: Option<String>,
    /// Publication year (sets both ends of the date range)
    #[arg(short, long)]
    year: Option<String>,
    /// Publication month (sets both ends of the date range)
    #[arg(short, long)]
    month: Option<String>,
    /// First year of the date range
    #[arg(long)]
    y1: Option<String>,
    /// First month of the date range
    #[arg(long)]
    m1: Option<String>,
    /// Last year of the date range
    #[arg(long)]
    y2: Option<String>,
    /// Last month of the date range
    #[arg(long)]
    m2: Option<String>,
    /// Maximum number of papers to print
    #[arg(short = 'n', long = "max", default_value_t = 5)]
    max: usize,
    /// Also print each paper's abstract
    #[arg(short, long)]
    verbose: bool,
    /// Keep only papers offering one of these link letters (e.g. "FE")
    #[arg(long)]
    links: Option<LinkFilter>,
    /// Print the result list as JSON instead of BibTeX
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Form);

    match command {
        Commands::Init => {
            config::ensure_dirs()?;
            println!("termads initialized at ~/.termads/");
            Ok(())
        }
        Commands::Form => {
            config::ensure_dirs()?;
            init_logging(true)?;
            let cfg = config::load()?;
            tui::run(&cfg)
        }
        Commands::Search(args) => {
            init_logging(false)?;
            let cfg = config::load()?;
            let client = AdsClient::new(&cfg.search)?;
            run_search(&client, &args)
        }
        Commands::Bibtex { bibcode } => {
            init_logging(false)?;
            let cfg = config::load()?;
            let client = AdsClient::new(&cfg.search)?;
            println!("{}", client.fetch_bibtex(&bibcode)?);
            Ok(())
        }
    }
}

/// Interactive sessions log to a file so the screen stays clean; everything else logs to stderr.
fn init_logging(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("TERMADS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    if to_file {
        let path = config::log_path()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    Ok(())
}

/// Translate command-line options into a query; every field is combined with AND.
fn build_form(args: &SearchArgs) -> Result<SearchForm> {
    let mut form = SearchForm::new();
    form.set_search_logic(LogicTarget::All, SearchLogic::And)?;

    if let Some(author) = &args.author {
        form.set_author(author)?;
    }
    if let Some(title) = &args.title {
        form.set_title(title)?;
    }
    if let Some(text) = &args.text {
        form.set_text(text)?;
    }

    let start_year = args.y1.as_ref().or(args.year.as_ref());
    let start_mon = args.m1.as_ref().or(args.month.as_ref());
    let end_year = args.y2.as_ref().or(args.year.as_ref());
    let end_mon = args.m2.as_ref().or(args.month.as_ref());
    form.set_start_date(
        start_year.map_or("", String::as_str),
        start_mon.map_or("", String::as_str),
    )?;
    form.set_end_date(
        end_year.map_or("", String::as_str),
        end_mon.map_or("", String::as_str),
    )?;

    Ok(form)
}

/// The first `max` papers, keeping only those that pass the link filter when one is given.
///
/// Each match carries the link letters worth showing: the filtered ones, or all of them.
fn select_papers<'a>(papers: &'a [Paper], args: &SearchArgs) -> Vec<Match<'a>> {
    let mut matches = match &args.links {
        Some(filter) => ads::find(papers, filter),
        None => papers
            .iter()
            .map(|paper| Match {
                paper,
                links: paper.available_link_types(),
            })
            .collect(),
    };
    matches.truncate(args.max);
    matches
}

fn run_search(backend: &dyn QueryBackend, args: &SearchArgs) -> Result<()> {
    let form = build_form(args)?;
    let papers = backend.search(&form)?;
    let selected = select_papers(&papers, args);
    if selected.is_empty() {
        eprintln!("No papers found.");
        return Ok(());
    }

    if args.json {
        let mut out = Vec::with_capacity(selected.len());
        for Match { paper, .. } in selected {
            let mut paper = paper.clone();
            if args.verbose {
                paper.abstract_text = fetch_abstract(backend, &paper);
            }
            out.push(paper);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for Match { paper, links } in selected {
        println!("% {} [{links}]", paper.bibcode);
        match backend.fetch_bibtex(&paper.bibcode) {
            Ok(entry) => println!("{entry}"),
            Err(e) => {
                tracing::warn!("BibTeX lookup failed for {}: {e:#}", paper.bibcode);
                println!("% {} {} (no BibTeX entry)", paper.bibcode, paper.title);
            }
        }
        if args.verbose
            && let Some(text) = fetch_abstract(backend, paper)
        {
            println!("\n{text}");
        }
        println!();
    }
    Ok(())
}

fn fetch_abstract(backend: &dyn QueryBackend, paper: &Paper) -> Option<String> {
    if !paper.has_link(LinkKind::Abstract) {
        return None;
    }
    backend
        .fetch_supplementary(paper, LinkKind::Abstract)
        .inspect_err(|e| tracing::warn!("abstract lookup failed for {}: {e:#}", paper.bibcode))
        .ok()
}
