//! xhs-crawler main entry point
//!
//! This is the command-line interface for the signed-request crawling client.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use xhs_crawler::client::{
    FilterNoteRange, FilterNoteTime, FilterNoteType, FilterPosDistance, SearchFilters, SortType,
};
use xhs_crawler::config::{load_config_with_hash, resolve_cookies, Config};
use xhs_crawler::url::{original_image_url, search_result_note_urls};
use xhs_crawler::{Identity, Limit, XhsClient};

/// xhs-crawler: a signed-request crawling client
///
/// Every API call is signed by an external helper process configured in the
/// `[signer]` section. Results are printed to stdout as JSON.
#[derive(Parser, Debug)]
#[command(name = "xhs-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A signed-request crawling client", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and identity without sending any request
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a note's card
    Note { url: String },

    /// Collect a note's full comment tree
    Comments { url: String },

    /// Search notes by keyword
    SearchNotes {
        query: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// 0 general, 1 latest, 2 most liked, 3 most commented, 4 most collected
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=4))]
        sort: u8,
        /// 0 any, 1 video, 2 image
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
        note_type: u8,
        /// 0 any, 1 day, 2 week, 3 half a year
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
        note_time: u8,
        /// 0 any, 1 seen, 2 unseen, 3 followed
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
        note_range: u8,
        /// 0 any, 1 same city, 2 nearby
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
        distance: u8,
        /// Print note URLs instead of raw results
        #[arg(long)]
        urls: bool,
    },

    /// Search users by keyword
    SearchUsers {
        query: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Suggest search keywords
    Suggest { word: String },

    /// Collect the notes a user posted
    UserNotes {
        url: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Collect the notes a user liked
    UserLikes {
        url: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Collect the notes a user collected
    UserCollects {
        url: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show a user's profile
    UserInfo { user_id: String },

    /// Show the logged-in user's profile
    Me,

    /// Collect notes from a home feed channel
    Feed {
        #[arg(long, default_value = "homefeed_recommend")]
        category: String,
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },

    /// List home feed channels
    Channels,

    /// Show unread notification counters
    Unread,

    /// Collect comment and @ mentions
    Mentions {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Collect likes and collects on the user's notes
    Likes {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Collect new followers
    Connections {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Look up a note's watermark-free video URL
    Video { note_id: String },

    /// Rewrite a CDN image URL to its origin form
    Image { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let Some(command) = cli.command else {
        bail!("no command given; run with --help to list commands");
    };

    if let Command::Image { url } = &command {
        println!("{}", original_image_url(url));
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let client = XhsClient::from_config(&config)?.with_cancel_token(cancel.clone());
    spawn_ctrl_c_handler(cancel);

    run(&client, command).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("xhs_crawler=info,warn"),
            1 => EnvFilter::new("xhs_crawler=debug,info"),
            2 => EnvFilter::new("xhs_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancels in-flight collections on the first Ctrl-C
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            cancel.cancel();
        }
    });
}

/// Handles the --dry-run mode: validates config and identity
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== xhs-crawler Dry Run ===\n");

    println!("Client:");
    println!("  API base URL: {}", config.client.api_base_url);
    println!("  Web base URL: {}", config.client.web_base_url);
    println!("  Timeout: {}s", config.client.timeout_secs);
    println!(
        "  Proxy: {}",
        config.client.proxy.as_deref().unwrap_or("none")
    );

    println!("\nSigner:");
    println!(
        "  Command: {} {}",
        config.signer.command,
        config.signer.args.join(" ")
    );
    println!("  Timeout: {}s", config.signer.timeout_secs);

    println!("\nPaging:");
    println!("  Max pages: {}", config.paging.max_pages);
    println!("  Reply concurrency: {}", config.paging.reply_concurrency);
    println!("  Max attempts: {}", config.retry.max_attempts);

    let cookies = resolve_cookies(&config.identity)?;
    let identity = Identity::parse(&cookies)?;
    identity.token()?;

    println!("\nIdentity:");
    let names: Vec<&str> = identity.iter().map(|(name, _)| name).collect();
    println!("  Cookies: {}", names.join(", "));

    println!("\n✓ Configuration is valid");
    println!("✓ Identity carries a signing token");

    Ok(())
}

/// Runs one command against the API and prints its result
async fn run(client: &XhsClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Note { url } => print_json(&client.note_card(&url).await?),
        Command::Comments { url } => print_json(&client.note_comments(&url).await?),
        Command::SearchNotes {
            query,
            count,
            sort,
            note_type,
            note_time,
            note_range,
            distance,
            urls,
        } => {
            let filters = SearchFilters {
                sort: SortType::from_index(sort).unwrap_or_default(),
                note_type: FilterNoteType::from_index(note_type).unwrap_or_default(),
                note_time: FilterNoteTime::from_index(note_time).unwrap_or_default(),
                note_range: FilterNoteRange::from_index(note_range).unwrap_or_default(),
                pos_distance: FilterPosDistance::from_index(distance).unwrap_or_default(),
                geo: None,
            };
            let results = client
                .search_notes(&query, Limit::from(count), &filters)
                .await?;
            if urls {
                print_json(&search_result_note_urls(&results))
            } else {
                print_json(&results)
            }
        }
        Command::SearchUsers { query, count } => {
            print_json(&client.search_users(&query, Limit::from(count)).await?)
        }
        Command::Suggest { word } => print_json(&client.search_keywords(&word).await?),
        Command::UserNotes { url, count } => {
            print_json(&client.user_notes(&url, Limit::from(count)).await?)
        }
        Command::UserLikes { url, count } => {
            print_json(&client.user_liked_notes(&url, Limit::from(count)).await?)
        }
        Command::UserCollects { url, count } => {
            print_json(&client.user_collected_notes(&url, Limit::from(count)).await?)
        }
        Command::UserInfo { user_id } => print_json(&client.user_info(&user_id).await?),
        Command::Me => print_json(&client.self_info().await?),
        Command::Feed { category, count } => {
            print_json(&client.home_feed(&category, Limit::Count(count)).await?)
        }
        Command::Channels => print_json(&client.home_feed_channels().await?),
        Command::Unread => print_json(&client.unread_count().await?),
        Command::Mentions { count } => print_json(&client.mentions(Limit::from(count)).await?),
        Command::Likes { count } => print_json(&client.likes(Limit::from(count)).await?),
        Command::Connections { count } => {
            print_json(&client.connections(Limit::from(count)).await?)
        }
        Command::Video { note_id } => {
            println!("{}", client.note_video_url(&note_id).await?);
            Ok(())
        }
        Command::Image { url } => {
            println!("{}", original_image_url(&url));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
