//! CLI entry point for giglink

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

use giglink_api::{ApiClient, NewProposal, OrderQuery};
use giglink_core::config::{Config, ConfigLoader};
use giglink_core::logging::init_logging;
use giglink_core::models::{OrderStatus, Role};
use giglink_core::session::AuthSession;
use giglink_inbox::{filter_by_text, InboxService, PushChannel};

#[derive(Parser)]
#[command(name = "giglink")]
#[command(about = "Command-line client for the giglink freelance marketplace")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize giglink configuration
    Init,
    /// Conversation inbox
    Inbox {
        #[command(subcommand)]
        command: InboxCommands,
    },
    /// Browse orders
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Proposals on an order
    Proposals {
        #[command(subcommand)]
        command: ProposalCommands,
    },
    /// Bookmarked orders
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// Show a public profile
    Profile { username: String },
    /// Show dashboard statistics
    Stats,
    /// Show configuration and API reachability
    Status,
}

#[derive(Subcommand)]
enum InboxCommands {
    /// List conversations, most recently active first
    List {
        /// Filter by order title or counterpart name
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Follow the inbox live via the push channel
    Watch,
    /// Show the messages of one conversation
    Show { id: String },
    /// Send a message into a conversation
    Send { id: String, message: String },
    /// Mark a conversation as read
    Read { id: String },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List orders
    List {
        /// Filter by status (open, in_progress, completed, cancelled)
        #[arg(short, long)]
        status: Option<OrderStatus>,
        /// Full-text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one order
    Show { id: String },
}

#[derive(Subcommand)]
enum ProposalCommands {
    /// List proposals on an order
    List {
        #[arg(short, long)]
        order: String,
    },
    /// Submit a proposal on an order
    Submit {
        #[arg(short, long)]
        order: String,
        #[arg(long)]
        cover_letter: String,
        #[arg(long)]
        bid: f64,
        #[arg(long)]
        days: u32,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// List favorites
    List,
    /// Bookmark an order
    Add { order_id: String },
    /// Remove a bookmark
    Remove { order_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    if let Commands::Init = cli.command {
        return cmd_init(&loader);
    }

    let config = loader
        .load()
        .with_context(|| format!("loading config from {:?}", loader.config_dir()))?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Inbox { command } => match command {
            InboxCommands::List { filter } => cmd_inbox_list(&config, filter).await,
            InboxCommands::Watch => cmd_inbox_watch(&config).await,
            InboxCommands::Show { id } => cmd_inbox_show(&config, &id).await,
            InboxCommands::Send { id, message } => cmd_inbox_send(&config, &id, &message).await,
            InboxCommands::Read { id } => cmd_inbox_read(&config, &id).await,
        },
        Commands::Orders { command } => match command {
            OrderCommands::List { status, search } => {
                cmd_orders_list(&config, status, search).await
            }
            OrderCommands::Show { id } => cmd_orders_show(&config, &id).await,
        },
        Commands::Proposals { command } => match command {
            ProposalCommands::List { order } => cmd_proposals_list(&config, &order).await,
            ProposalCommands::Submit {
                order,
                cover_letter,
                bid,
                days,
            } => cmd_proposals_submit(&config, &order, cover_letter, bid, days).await,
        },
        Commands::Favorites { command } => match command {
            FavoriteCommands::List => cmd_favorites_list(&config).await,
            FavoriteCommands::Add { order_id } => cmd_favorites_add(&config, &order_id).await,
            FavoriteCommands::Remove { order_id } => {
                cmd_favorites_remove(&config, &order_id).await
            }
        },
        Commands::Profile { username } => cmd_profile(&config, &username).await,
        Commands::Stats => cmd_stats(&config).await,
        Commands::Status => cmd_status(&config, &loader).await,
    }
}

fn client(config: &Config) -> Result<Arc<ApiClient>> {
    let session = Arc::new(AuthSession::from_config(&config.auth)?);
    Ok(Arc::new(ApiClient::new(&config.api, session)))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn cmd_init(loader: &ConfigLoader) -> Result<()> {
    println!("{}", style("giglink configuration").bold());

    let mut config = loader.load().unwrap_or_default();

    config.api.base_url = Input::new()
        .with_prompt("API base URL")
        .default(config.api.base_url.clone())
        .interact_text()?;
    config.push.url = Input::new()
        .with_prompt("Push channel URL")
        .default(config.push.url.clone())
        .interact_text()?;
    config.auth.token = Input::new()
        .with_prompt("Auth token (from your giglink account page)")
        .allow_empty(true)
        .default(config.auth.token.clone())
        .interact_text()?;

    let roles = [Role::Client, Role::Freelancer];
    let selected = Select::new()
        .with_prompt("Your marketplace role")
        .items(&["client", "freelancer"])
        .default(if config.auth.role == Role::Freelancer { 1 } else { 0 })
        .interact()?;
    config.auth.role = roles[selected];

    if Confirm::new()
        .with_prompt(format!("Write config to {:?}?", loader.config_dir()))
        .default(true)
        .interact()?
    {
        loader.save(&config)?;
        println!("{}", style("Configuration saved.").green());
    } else {
        println!("Aborted, nothing written.");
    }
    Ok(())
}

async fn cmd_inbox_list(config: &Config, filter: Option<String>) -> Result<()> {
    let client = client(config)?;
    let service = InboxService::new(client);

    let pb = spinner("Loading conversations...");
    let result = service.load().await;
    pb.finish_and_clear();
    result.context("loading conversation snapshot")?;

    let conversations = service.snapshot().await;
    match filter.as_deref() {
        Some(query) => print_filtered(&conversations, query),
        None => render::print_conversations(&conversations),
    }
    Ok(())
}

fn print_filtered(conversations: &[giglink_core::models::ConversationSummary], query: &str) {
    let filtered = filter_by_text(conversations, query);
    if filtered.is_empty() {
        println!("{}", style(format!("No conversations match '{}'.", query)).dim());
    } else {
        render::print_conversations(&filtered);
    }
}

async fn cmd_inbox_watch(config: &Config) -> Result<()> {
    // Long-running command: full logging with file output
    let _guard = init_logging(&config.logging);

    let session = Arc::new(AuthSession::from_config(&config.auth)?);
    let client = Arc::new(ApiClient::new(&config.api, Arc::clone(&session)));
    let service = Arc::new(InboxService::new(client));

    let pb = spinner("Loading conversations...");
    let result = service.load().await;
    pb.finish_and_clear();
    let count = result.context("loading conversation snapshot")?;
    let unread = service.total_unread().await;
    println!(
        "{}",
        style(format!(
            "Watching {} conversations ({} unread). Ctrl-C to stop.",
            count, unread
        ))
        .dim()
    );
    render::print_conversations(&service.snapshot().await);

    // Re-render on every list change; the subscription is dropped (and
    // the handler unregistered) when this function returns.
    let _subscription = service.updates().subscribe(|update| {
        println!();
        render::print_conversations(&update.conversations);
    });

    let (event_tx, event_rx) = mpsc::channel(64);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let mut channel = PushChannel::new(&config.push, session);
    channel.set_event_sender(event_tx);
    channel.start().await?;

    let runner = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service.run(event_rx, shutdown_rx).await;
        })
    };

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    println!("\n{}", style("Stopping...").dim());

    channel.stop().await?;
    if shutdown_tx.send(()).await.is_err() {
        warn!("Inbox service already stopped");
    }
    let _ = runner.await;
    Ok(())
}

async fn cmd_inbox_show(config: &Config, id: &str) -> Result<()> {
    let client = client(config)?;
    let messages = client
        .conversations()
        .messages(id)
        .await
        .with_context(|| format!("fetching messages of conversation {}", id))?;
    render::print_messages(&messages);
    Ok(())
}

async fn cmd_inbox_send(config: &Config, id: &str, message: &str) -> Result<()> {
    let client = client(config)?;
    let sent = client
        .conversations()
        .send(id, message)
        .await
        .with_context(|| format!("sending message to conversation {}", id))?;
    println!("{} {}", style("Sent:").green(), sent.id);
    Ok(())
}

async fn cmd_inbox_read(config: &Config, id: &str) -> Result<()> {
    let client = client(config)?;
    client
        .conversations()
        .mark_read(id)
        .await
        .with_context(|| format!("marking conversation {} read", id))?;
    println!("{}", style("Marked as read.").green());
    Ok(())
}

async fn cmd_orders_list(
    config: &Config,
    status: Option<OrderStatus>,
    search: Option<String>,
) -> Result<()> {
    let client = client(config)?;
    let mut query = OrderQuery::default();
    if let Some(status) = status {
        query = query.status(status);
    }
    if let Some(search) = search {
        query = query.search(search);
    }

    let pb = spinner("Loading orders...");
    let result = client.orders().list(&query).await;
    pb.finish_and_clear();
    render::print_orders(&result.context("listing orders")?);
    Ok(())
}

async fn cmd_orders_show(config: &Config, id: &str) -> Result<()> {
    let client = client(config)?;
    let order = client
        .orders()
        .get(id)
        .await
        .with_context(|| format!("fetching order {}", id))?;
    render::print_order(&order);
    Ok(())
}

async fn cmd_proposals_list(config: &Config, order_id: &str) -> Result<()> {
    let client = client(config)?;
    let proposals = client
        .proposals()
        .list_for_order(order_id)
        .await
        .with_context(|| format!("listing proposals for order {}", order_id))?;
    render::print_proposals(&proposals);
    Ok(())
}

async fn cmd_proposals_submit(
    config: &Config,
    order_id: &str,
    cover_letter: String,
    bid: f64,
    days: u32,
) -> Result<()> {
    let client = client(config)?;
    let proposal = client
        .proposals()
        .submit(
            order_id,
            &NewProposal {
                cover_letter,
                bid_amount: bid,
                delivery_days: days,
            },
        )
        .await
        .with_context(|| format!("submitting proposal on order {}", order_id))?;
    println!(
        "{} {}",
        style("Proposal submitted:").green(),
        proposal.id
    );
    Ok(())
}

async fn cmd_favorites_list(config: &Config) -> Result<()> {
    let client = client(config)?;
    let favorites = client.favorites().list().await.context("listing favorites")?;
    render::print_favorites(&favorites);
    Ok(())
}

async fn cmd_favorites_add(config: &Config, order_id: &str) -> Result<()> {
    let client = client(config)?;
    let favorite = client
        .favorites()
        .add(order_id)
        .await
        .with_context(|| format!("saving order {}", order_id))?;
    println!("{} {}", style("Saved:").green(), favorite.order_title);
    Ok(())
}

async fn cmd_favorites_remove(config: &Config, order_id: &str) -> Result<()> {
    let client = client(config)?;
    client
        .favorites()
        .remove(order_id)
        .await
        .with_context(|| format!("removing favorite {}", order_id))?;
    println!("{}", style("Removed.").green());
    Ok(())
}

async fn cmd_profile(config: &Config, username: &str) -> Result<()> {
    let client = client(config)?;
    let profile = client
        .profiles()
        .get(username)
        .await
        .with_context(|| format!("fetching profile {}", username))?;
    render::print_profile(&profile);
    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let client = client(config)?;
    let stats = client.stats().dashboard().await.context("fetching stats")?;
    render::print_stats(&stats);
    Ok(())
}

async fn cmd_status(config: &Config, loader: &ConfigLoader) -> Result<()> {
    println!("{}", style("giglink status").bold());
    println!("  config dir: {:?}", loader.config_dir());
    println!("  api:        {}", config.api.base_url);
    println!("  push:       {}", config.push.url);
    println!("  role:       {}", config.auth.role);

    let session = match AuthSession::from_config(&config.auth) {
        Ok(session) => {
            println!("  token:      {}", style("configured").green());
            Arc::new(session)
        }
        Err(_) => {
            println!(
                "  token:      {} (run `giglink init`)",
                style("missing").red()
            );
            // Health probe is unauthenticated, a placeholder session will do
            Arc::new(AuthSession::new("", "", config.auth.role))
        }
    };

    let client = ApiClient::new(&config.api, session);
    match client.health().await {
        Ok(()) => println!("  reachable:  {}", style("yes").green()),
        Err(e) => println!("  reachable:  {} ({})", style("no").red(), e),
    }
    Ok(())
}
