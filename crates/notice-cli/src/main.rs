use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notice_cli::cli::{replay, DesktopSink, FanoutSink, Scenario, StdoutSink};
use notice_core::config::UserConfigStorage;
use notice_core::lang::Lang;
use notice_core::models::{ChatMessage, MessageContent};
use notice_core::plain_text::{plain_text_of_chat_message, MarkdownRenderer, PlainTextOptions};
use notice_core::tracing_setup::init_tracing;
use notice_core::NoticeConfig;

#[derive(Parser)]
#[command(name = "chat-notice")]
#[command(about = "Replay chat activity through the notification aggregator")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Directory holding user-config.json
    #[arg(long, short = 'd', global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file and print every notification decision
    Simulate {
        /// Path to the scenario JSON
        scenario: PathBuf,
        /// Also show popups through the desktop notification service
        #[arg(long)]
        desktop: bool,
    },

    /// Print the plain-text preview a message would get in a popup
    Preview {
        text: String,
        /// Treat the text as markdown
        #[arg(long, short)]
        markdown: bool,
        /// Maximum preview length in characters (0 keeps everything)
        #[arg(long, short)]
        limit: Option<usize>,
        #[arg(long)]
        keep_breaks: bool,
        #[arg(long, default_value = "en")]
        locale: String,
    },

    /// Inspect or create the stored user config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective user config
    Show,
    /// Write the default user config if none exists
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let notice_config = match &cli.data_dir {
        Some(dir) => NoticeConfig::new(dir),
        None => NoticeConfig::default(),
    };

    if let Err(e) = run(cli.command, cli.pretty, notice_config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, pretty: bool, notice_config: NoticeConfig) -> Result<()> {
    match command {
        Commands::Simulate { scenario, desktop } => {
            simulate(&scenario, desktop, pretty, &notice_config)
        }
        Commands::Preview {
            text,
            markdown,
            limit,
            keep_breaks,
            locale,
        } => {
            let message = ChatMessage {
                content: MessageContent::Text { text, markdown },
                ..ChatMessage::text("preview", "preview", "preview", 0, "")
            };
            let options = PlainTextOptions {
                limit_length: match limit {
                    Some(0) => None,
                    Some(n) => Some(n),
                    None => notice_config.plain_text.limit_length,
                },
                ignore_break: !keep_breaks,
            };
            let preview =
                plain_text_of_chat_message(&message, &MarkdownRenderer, &Lang::new(&locale), options);
            println!("{}", preview);
            Ok(())
        }
        Commands::Config { action } => {
            let mut storage = UserConfigStorage::new(&notice_config.data_dir);
            match action {
                ConfigAction::Show => print_json(&storage.config, pretty),
                ConfigAction::Init { force } => {
                    if storage.exists() && !force {
                        anyhow::bail!(
                            "{} already exists (use --force to overwrite)",
                            storage.path().display()
                        );
                    }
                    storage.set(Default::default())?;
                    eprintln!("Wrote {}", storage.path().display());
                    Ok(())
                }
            }
        }
    }
}

fn simulate(
    path: &std::path::Path,
    desktop: bool,
    pretty: bool,
    notice_config: &NoticeConfig,
) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let stored = UserConfigStorage::new(&notice_config.data_dir).config;

    let mut sink = FanoutSink::new();
    sink.push(Arc::new(StdoutSink::new(pretty)));
    if desktop {
        sink.push(Arc::new(DesktopSink::new()));
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let report = runtime.block_on(replay(scenario, stored, notice_config, Arc::new(sink)))?;
    print_json(&report, pretty)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
