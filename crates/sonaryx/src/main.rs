// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sonaryx - new release announcements for Discord.
//!
//! This is the binary entry point for the Sonaryx bot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod adapters;
mod artists;
mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sonaryx_release::RunKind;

/// Sonaryx - new release announcements for Discord.
#[derive(Parser, Debug)]
#[command(name = "sonaryx", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the daily and fallback checks on their schedules.
    Serve,
    /// Run one daily release check now.
    Check,
    /// Run one fallback release check now.
    Fallback,
    /// Manage artist subscriptions.
    Artist {
        #[command(subcommand)]
        action: ArtistCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ArtistCommand {
    /// Subscribe to an artist by name or Spotify ID.
    Add {
        /// Artist name or 22-character Spotify ID.
        query: String,
    },
    /// Unsubscribe from an artist by Spotify ID.
    Remove { id: String },
    /// List subscribed artists, newest first.
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sonaryx_config::load_and_validate_path(path),
        None => sonaryx_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sonaryx_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.bot.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Check) => check::run_check(&config, RunKind::Daily).await,
        Some(Commands::Fallback) => check::run_check(&config, RunKind::Fallback).await,
        Some(Commands::Artist { action }) => match action {
            ArtistCommand::Add { query } => artists::run_add(&config, &query).await,
            ArtistCommand::Remove { id } => artists::run_remove(&config, &id).await,
            ArtistCommand::List => artists::run_list(&config).await,
        },
        None => {
            println!("sonaryx: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
