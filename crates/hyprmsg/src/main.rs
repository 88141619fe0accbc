//! hyprmsg CLI
//!
//! A hyprctl-style front-end over the hypr-ipc library: one subcommand per
//! IPC operation, JSON output for queries, plus `listen` to tail the event
//! socket.

use anyhow::Result;
use clap::{Parser, Subcommand};
use hypr_ipc::{EventClient, RequestClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hyprmsg")]
#[command(about = "Send commands to the Hyprland compositor")]
#[command(version)]
struct Cli {
    /// Skip response validation (does not check for "ok" markers)
    #[arg(long)]
    no_validate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the currently focused window
    Activewindow,

    /// Show the currently focused workspace
    Activeworkspace,

    /// List all windows
    Clients,

    /// Show the cursor position
    Cursorpos,

    /// List all monitors
    Monitors,

    /// List all workspaces
    Workspaces,

    /// Look up a configuration option
    Getoption {
        /// Option name, e.g. "general:border_size"
        name: String,
    },

    /// Run dispatchers
    Dispatch {
        /// Command to dispatch; repeatable. Quote commands with arguments
        /// (e.g.: 'exec kitty')
        #[arg(short = 'c', required = true)]
        commands: Vec<String>,
    },

    /// Set configuration keywords
    Keyword {
        /// Keyword assignment; repeatable (e.g.: 'general:border_size 2')
        #[arg(short = 'c', required = true)]
        keywords: Vec<String>,
    },

    /// Enter kill mode
    Kill,

    /// Reload the compositor configuration
    Reload,

    /// Set the cursor theme and size
    Setcursor {
        #[arg(long, default_value = "Adwaita")]
        theme: String,

        #[arg(long, default_value_t = 32)]
        size: u16,
    },

    /// Show compositor build information
    Version,

    /// Show the splash phrase
    Splash,

    /// Tail the event socket, printing one event per line
    Listen,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Listen = cli.command {
        return listen().await;
    }

    let mut client = RequestClient::from_env()?;
    client.validate = !cli.no_validate;

    match cli.command {
        Commands::Activewindow => print_json(&client.active_window().await?),
        Commands::Activeworkspace => print_json(&client.active_workspace().await?),
        Commands::Clients => print_json(&client.clients().await?),
        Commands::Cursorpos => print_json(&client.cursor_pos().await?),
        Commands::Monitors => print_json(&client.monitors().await?),
        Commands::Workspaces => print_json(&client.workspaces().await?),
        Commands::Getoption { name } => print_json(&client.get_option(&name).await?),
        Commands::Dispatch { commands } => {
            client.dispatch(&commands).await?;
            println!("ok");
            Ok(())
        }
        Commands::Keyword { keywords } => {
            client.keyword(&keywords).await?;
            println!("ok");
            Ok(())
        }
        Commands::Kill => {
            client.kill().await?;
            println!("ok");
            Ok(())
        }
        Commands::Reload => {
            client.reload().await?;
            println!("ok");
            Ok(())
        }
        Commands::Setcursor { theme, size } => {
            client.set_cursor(&theme, size).await?;
            println!("ok");
            Ok(())
        }
        Commands::Version => print_json(&client.version().await?),
        Commands::Splash => {
            println!("{}", client.splash().await?);
            Ok(())
        }
        Commands::Listen => unreachable!("handled above"),
    }
}

async fn listen() -> Result<()> {
    let mut events = EventClient::from_env().await?;

    tracing::info!("listening for compositor events, Ctrl+C to stop");

    while let Some(record) = events.next_event().await? {
        println!("{}>>{}", record.kind, record.data);
    }

    tracing::info!("event stream closed by compositor");
    Ok(())
}
