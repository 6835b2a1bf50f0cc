//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Validate the configuration and show the selected backends |
//! | `providers` | List every registered provider |
//! | `push` | Store, catalogue and index a package file |
//! | `search` | Query the configured search backend |

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use pkgfeed_application::registry::SearchCapability;
use pkgfeed_application::use_cases::{PackageIndexingResult, PackageUpload};
use pkgfeed_domain::value_objects::{Package, SearchRequest};
use pkgfeed_infrastructure::config::{AppConfig, ConfigLoader};
use pkgfeed_infrastructure::di::{
    AppContext, AvailableProviders, default_registry, diagnose, indexing_service,
};
use pkgfeed_infrastructure::logging::init_logging;
use tracing::info;

/// Command line interface for pkgfeed
#[derive(Parser, Debug)]
#[command(name = "pkgfeed")]
#[command(about = "Package feed with configuration-driven backends")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the configuration and report the backend chosen per capability
    Check,

    /// List registered providers grouped by capability
    Providers,

    /// Push a package file to the feed
    Push {
        /// Package id
        id: String,
        /// Package version
        version: String,
        /// Package file
        file: PathBuf,
        /// Package description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Key required by feeds that set `api_key`
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Search the feed
    Search {
        /// Substring matched against ids, descriptions and tags
        #[arg(default_value = "")]
        query: String,
        /// Results to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Maximum results
        #[arg(long, default_value_t = 20)]
        take: usize,
        /// Include unlisted versions
        #[arg(long)]
        include_unlisted: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

/// Run one command to completion
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    if let Err(err) = init_logging(&config.logging) {
        // An already installed subscriber is not fatal
        if err.is_fatal() {
            return Err(err.into());
        }
        eprintln!("warning: {err}");
    }

    match cli.command {
        Command::Providers => {
            print!("{}", AvailableProviders(default_registry()?.describe()));
            Ok(())
        }
        Command::Check => check(&AppContext::init(config)?),
        Command::Push {
            id,
            version,
            file,
            description,
            api_key,
        } => {
            let package = Package::new(id, version).with_description(description);
            push(&AppContext::init(config)?, package, &file, api_key).await
        }
        Command::Search {
            query,
            skip,
            take,
            include_unlisted,
        } => {
            let mut request = SearchRequest::new(query).with_page(skip, take);
            request.include_unlisted = include_unlisted;
            search(&AppContext::init(config)?, &request).await
        }
    }
}

fn check(context: &AppContext) -> anyhow::Result<()> {
    let report = diagnose(&context.root());
    print!("{report}");
    if !report.is_healthy() {
        bail!("one or more capabilities have no usable backend");
    }
    Ok(())
}

async fn push(
    context: &AppContext,
    package: Package,
    file: &Path,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let label = format!("{} {}", package.id, package.version);

    let scope = context.begin_scope();
    let indexer = indexing_service(&scope).await?;
    let mut upload = PackageUpload::new(package, content);
    upload.api_key = api_key;
    match indexer.index(upload).await? {
        PackageIndexingResult::Success => {
            info!(package = %label, "Package pushed");
            println!("Pushed {label}");
            Ok(())
        }
        PackageIndexingResult::PackageAlreadyExists => bail!("{label} already exists"),
        PackageIndexingResult::InvalidPackage => bail!("{label} is not a valid package"),
        PackageIndexingResult::Unauthorized => bail!("push of {label} requires a valid API key"),
    }
}

async fn search(context: &AppContext, request: &SearchRequest) -> anyhow::Result<()> {
    let scope = context.begin_scope();
    let search = scope.get::<SearchCapability>().await?;
    let response = search.search(request).await?;

    println!("{} package(s)", response.total_hits);
    for result in response.data {
        println!("{} {} [{}]", result.id, result.version, result.versions.join(", "));
        if !result.description.is_empty() {
            println!("    {}", result.description);
        }
    }
    Ok(())
}
