//! CLI module - Command-line interface for `AniChart`
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// `AniChart` - Browse the AniList anime catalog
/// Serves a caching GraphQL proxy and a browse API, or browses from the terminal
#[derive(Parser)]
#[command(name = "anichart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the GraphQL proxy and browse API server
    #[command(alias = "server", alias = "web")]
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Browse the catalog with seasonal fallback
    #[command(alias = "b")]
    Browse {
        /// Search text
        #[arg(long, short)]
        search: Option<String>,
        /// Sort order, e.g. POPULARITY_DESC, SCORE_DESC, TRENDING_DESC
        #[arg(long)]
        sort: Option<String>,
        /// Season filter (WINTER, SPRING, SUMMER, FALL); defaults to the current one
        #[arg(long)]
        season: Option<String>,
        /// Browse without a season filter
        #[arg(long, conflicts_with = "season")]
        all_seasons: bool,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Search anime by title
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show trending anime
    #[command(alias = "t")]
    Trending {
        /// Number of entries to show
        #[arg(default_value = "20")]
        limit: u32,
    },

    /// Show one season's anime
    Seasonal {
        /// Season (defaults to the current one)
        #[arg(long)]
        season: Option<String>,
        /// Year (defaults to the year the season falls in)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show details about an anime
    #[command(alias = "i")]
    Info {
        /// AniList media ID
        id: i32,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
