pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod domain;
pub mod models;
pub mod services;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{BrowseOptions, Cli, Commands};
pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve { host, port } => {
            cli::cmd_serve(config, prometheus_handle, host, port).await
        }

        Commands::Browse {
            search,
            sort,
            season,
            all_seasons,
            pages,
        } => {
            let options = BrowseOptions {
                search: search.as_deref(),
                sort: sort.as_deref(),
                season: season.as_deref(),
                all_seasons,
                pages,
            };
            cli::cmd_browse(&config, options).await
        }

        Commands::Search { query, page } => {
            cli::cmd_search_anime(&config, &query.join(" "), page).await
        }

        Commands::Trending { limit } => cli::cmd_trending(&config, limit).await,

        Commands::Seasonal { season, year } => {
            cli::cmd_seasonal(&config, season.as_deref(), year).await
        }

        Commands::Info { id } => cli::cmd_anime_info(&config, id).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    // `try_init` so a second call (tests, embedding) is not fatal.
    let _ = if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}
