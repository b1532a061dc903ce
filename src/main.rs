use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::warn;

use next_step::api::{get_provider, parse_board_ref, parse_card_ref, BoardProvider, RefError};
use next_step::checklist::{select, AnnotatedStep, CardChecklists, Mode, ModeCycle};
use next_step::config::Config;
use next_step::logging;
use next_step::render::{render_board, step_lines, steps_json};
use next_step::services::BoardRefresher;

#[derive(Parser)]
#[command(name = "next-step")]
#[command(about = "Shows the next unchecked checklist item of every card on a Trello board")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the next steps of a single card
    Card {
        /// Card id, short link or https://trello.com/c/... URL
        card: String,

        /// Selection mode (hidden, one-per-card, one-per-checklist, display-all)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Print the steps as a JSON array
        #[arg(long)]
        json: bool,

        /// Treat CARD as a path to a card JSON document
        #[arg(long)]
        local: bool,
    },

    /// Show the next steps of every card on a board
    Board {
        /// Board id, short link or https://trello.com/b/... URL
        board: String,

        /// Selection mode (hidden, one-per-card, one-per-checklist, display-all)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Print cards and steps as JSON
        #[arg(long)]
        json: bool,

        /// Treat BOARD as a directory of card JSON documents
        #[arg(long)]
        local: bool,
    },

    /// Keep a board's next steps on screen, re-scanning periodically
    Watch {
        /// Board id, short link or https://trello.com/b/... URL
        board: String,

        /// Starting mode (Enter advances to the next one)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Treat BOARD as a directory of card JSON documents
        #[arg(long)]
        local: bool,
    },

    /// Run the selection on a card JSON document ("-" reads stdin)
    File {
        path: String,

        /// Selection mode (hidden, one-per-card, one-per-checklist, display-all)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Print the steps as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// List the annotation modes in cycle order
    Modes,

    /// Verify Trello credentials
    Check,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_watch_mode = matches!(cli.command, Commands::Watch { .. });
    let logging_handle = logging::init_logging(&config, is_watch_mode, cli.debug)?;

    match cli.command {
        Commands::Card {
            card,
            mode,
            json,
            local,
        } => {
            let mode = mode.unwrap_or(config.display.default_mode);
            cmd_card(&config, &card, mode, json, local).await?;
        }
        Commands::Board {
            board,
            mode,
            json,
            local,
        } => {
            let mode = mode.unwrap_or(config.display.default_mode);
            cmd_board(&config, &board, mode, json, local).await?;
        }
        Commands::Watch { board, mode, local } => {
            let mode = mode.unwrap_or(config.display.default_mode);
            let result = cmd_watch(&config, &board, mode, local).await;
            print_log_path(logging_handle.log_file_path);
            result?;
        }
        Commands::File { path, mode, json } => {
            let mode = mode.unwrap_or(config.display.default_mode);
            cmd_file(&config, &path, mode, json).await?;
        }
        Commands::Modes => cmd_modes(&config),
        Commands::Check => cmd_check(&config).await?,
        Commands::Config => println!("{}", config.to_toml()?),
    }

    Ok(())
}

/// Print the log file path on exit if logs were written
fn print_log_path(log_file_path: Option<PathBuf>) {
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }
}

/// Pick the provider and normalized board/card reference
fn resolve(
    config: &Config,
    reference: &str,
    local: bool,
    parse: fn(&str) -> Result<String, RefError>,
) -> Result<(Box<dyn BoardProvider>, String)> {
    if local {
        return Ok((get_provider("file", config)?, reference.to_string()));
    }

    let id = parse(reference)?;
    let provider = get_provider("trello", config).with_context(|| {
        format!(
            "Set {} and {} to access Trello",
            config.trello.api_key_env, config.trello.token_env
        )
    })?;
    Ok((provider, id))
}

fn print_steps(config: &Config, steps: &[AnnotatedStep], json: bool) -> Result<()> {
    if json {
        println!("{}", steps_json(steps)?);
    } else if steps.is_empty() {
        println!("No next steps");
    } else {
        for line in step_lines(steps, &config.display.marker) {
            println!("{}", line);
        }
    }
    Ok(())
}

async fn cmd_card(config: &Config, card: &str, mode: Mode, json: bool, local: bool) -> Result<()> {
    if !mode.needs_fetch() {
        return print_steps(config, &[], json);
    }

    let (provider, card_id) = resolve(config, card, local, parse_card_ref)?;
    let payload = provider
        .fetch_checklists(&card_id)
        .await
        .with_context(|| format!("Failed to fetch checklists of card '{}'", card_id))?;

    print_steps(config, &select(mode, &payload.checklists), json)
}

async fn cmd_board(
    config: &Config,
    board: &str,
    mode: Mode,
    json: bool,
    local: bool,
) -> Result<()> {
    let (provider, board_id) = resolve(config, board, local, parse_board_ref)?;
    let mut refresher = BoardRefresher::new(provider);

    let result = refresher.refresh_board(mode, &board_id).await?;
    let annotations = refresher.annotations();

    if json {
        let value: Vec<serde_json::Value> = annotations
            .iter()
            .map(|a| {
                serde_json::json!({
                    "card": a.card,
                    "steps": a.steps,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Next steps: {}", mode.label());
        println!("{}", "─".repeat(60));
        let rendered = render_board(&annotations, &config.display);
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }

    if !result.is_success() {
        eprintln!(
            "{} card(s) could not be fetched (see log output)",
            result.failed.len()
        );
    }

    Ok(())
}

async fn cmd_watch(config: &Config, board: &str, mode: Mode, local: bool) -> Result<()> {
    let (provider, board_id) = resolve(config, board, local, parse_board_ref)?;
    let mut refresher = BoardRefresher::new(provider);
    let mut cycle = ModeCycle::new(mode);
    let interval = Duration::from_secs(config.refresh.interval_secs.max(1));

    // One listener for the whole session, so a press during a scan is not lost
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    refresher
        .watch(
            &board_id,
            &mut cycle,
            interval,
            BufReader::new(tokio::io::stdin()),
            shutdown,
            |mode, annotations| {
                // Clear screen and redraw
                print!("\x1b[2J\x1b[H");
                println!(
                    "Next steps: {}    (Enter: next mode, Ctrl-C: quit)",
                    mode.label()
                );
                println!("{}", "─".repeat(60));
                println!("{}", render_board(annotations, &config.display));
            },
        )
        .await
}

async fn cmd_file(config: &Config, path: &str, mode: Mode, json: bool) -> Result<()> {
    let payload = if path == "-" {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read stdin")?;
        CardChecklists::from_json_str(&content).context("Failed to parse card JSON")?
    } else {
        get_provider("file", config)?
            .fetch_checklists(path)
            .await
            .with_context(|| format!("Failed to read card document '{}'", path))?
    };

    print_steps(config, &select(mode, &payload.checklists), json)
}

fn cmd_modes(config: &Config) {
    for mode in Mode::ALL {
        let marker = if mode == config.display.default_mode {
            "*"
        } else {
            " "
        };
        println!("{} {:<18} {}", marker, mode.cli_name(), mode.label());
    }
}

async fn cmd_check(config: &Config) -> Result<()> {
    let provider = get_provider("trello", config)?;

    if provider.test_connection().await? {
        println!("Trello credentials OK");
        Ok(())
    } else {
        bail!(
            "Trello rejected the credentials in {} / {}",
            config.trello.api_key_env,
            config.trello.token_env
        )
    }
}
