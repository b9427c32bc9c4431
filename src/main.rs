//! wiki-fetch-cache command line entry point

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wiki_fetch_cache::{
    cache,
    config::{self, StorageKind},
    wiki_path, wiki_title, Autosuggest, QueryBuilder, RequestDescriptor, Storage, Suggestion,
    WikiClient,
};

#[derive(Debug, Parser)]
#[command(name = "wiki-fetch-cache", version, about = "Cached MediaWiki search and page client")]
struct Cli {
    /// Path to settings.yml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the storage backend
    #[arg(short, long, global = true, value_enum)]
    storage: Option<StorageArg>,

    /// Print request counters to stderr when done
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StorageArg {
    Memory,
    #[value(alias = "disk")]
    File,
    Bounded,
}

impl From<StorageArg> for StorageKind {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Memory => StorageKind::Memory,
            StorageArg::File => StorageKind::File,
            StorageArg::Bounded => StorageKind::Bounded,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prefix search on page titles
    Search { term: String },
    /// Full-text search
    Fulltext { term: String },
    /// Fetch one or more pages by path, e.g. /wiki/Tokyo
    Page {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the canonical request URL
    Url {
        #[arg(value_enum)]
        kind: UrlKind,
        arg: String,
    },
    /// Print the stored or fetched response fragment for a request
    Raw {
        #[arg(value_enum)]
        kind: UrlKind,
        arg: String,
    },
    /// Convert an article path to a title
    Title { path: String },
    /// Convert a title to an article path
    Path { title: String },
    /// Read input changes from stdin and print suggestions for each
    Suggest,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UrlKind {
    Search,
    Fulltext,
    Page,
}

impl UrlKind {
    fn descriptor(self, arg: &str) -> RequestDescriptor {
        match self {
            UrlKind::Search => RequestDescriptor::prefix_search(arg),
            UrlKind::Fulltext => RequestDescriptor::full_text_search(arg),
            UrlKind::Page => RequestDescriptor::page_parse(arg),
        }
    }
}

#[derive(Serialize)]
struct SuggestLine<'a> {
    value: &'a str,
    suggestions: &'a [Suggestion],
    api_requests: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(storage) = cli.storage {
        settings.storage.backend = storage.into();
    }
    debug!("Using API endpoint {}", settings.api.base_url);

    match &cli.command {
        Command::Title { path } => {
            println!("{}", wiki_title(path));
            return Ok(());
        }
        Command::Path { title } => {
            println!("{}", wiki_path(title));
            return Ok(());
        }
        Command::Url { kind, arg } => {
            let builder = QueryBuilder::from_settings(&settings.api)?;
            println!("{}", builder.build_url(&kind.descriptor(arg)));
            return Ok(());
        }
        _ => {}
    }

    let store = cache::open(&settings.storage).await?;
    info!("Response cache: {}", store.name());
    let client = Arc::new(WikiClient::from_settings(&settings, store)?);

    match cli.command {
        Command::Search { term } => print_json(&client.search(&term).await?)?,
        Command::Fulltext { term } => print_json(&client.full_text_search(&term).await?)?,
        Command::Page { paths } => {
            let pages = join_all(paths.iter().map(|p| client.page(p))).await;
            let pages = pages.into_iter().collect::<Result<Vec<_>, _>>()?;
            print_json(&pages)?;
        }
        Command::Raw { kind, arg } => {
            let request = kind.descriptor(&arg);
            let url = client.builder().build_url(&request);
            let value = client
                .fetcher()
                .resolve_value(&url, request.operation().extractor())
                .await?;
            print_json(&value)?;
        }
        Command::Suggest => run_suggest(client.clone(), &settings.autocomplete).await?,
        Command::Title { .. } | Command::Path { .. } | Command::Url { .. } => {}
    }

    if cli.stats {
        eprintln!("{}", client.metrics().snapshot());
    }

    Ok(())
}

async fn run_suggest<S: Storage>(
    client: Arc<WikiClient<S>>,
    settings: &config::AutocompleteSettings,
) -> Result<()> {
    let mut session = Autosuggest::new(client, settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if let Err(e) = session.input(&line).await {
            eprintln!("error: {}", e);
        }
        let out = SuggestLine {
            value: session.value(),
            suggestions: session.suggestions(),
            api_requests: session.api_request_count(),
        };
        println!("{}", serde_json::to_string(&out)?);
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
