//! LED board sender entry point.
//!
//! Draws test patterns on a virtual board and streams each frame to the
//! display controller as paced UDP datagrams.
//!
//! # Usage
//!
//! ```text
//! ledboard-sender [OPTIONS] <COMMAND>
//!
//! Commands:
//!   pattern      Draw a test pattern and send it
//!   fill         Set every pixel to one value
//!   scroll       Scroll the diagonals one pixel per frame
//!   monitor      Receive and reassemble frames (stand-in controller)
//!   init-config  Write the default configuration file
//!
//! Options:
//!   --config <PATH>   Configuration file [default: platform config dir]
//!   --host   <HOST>   Controller host name or IP
//!   --port   <PORT>   Controller UDP port
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                         |
//! |-------------------|-------------------------------------|
//! | `LEDBOARD_CONFIG` | Configuration file path             |
//! | `LEDBOARD_HOST`   | Controller host, overrides the file |
//! | `LEDBOARD_PORT`   | Controller port, overrides the file |
//! | `RUST_LOG`        | Log filter, overrides `log_level`   |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ledboard_core::{LedBoard, ScrollDirection};
use ledboard_sender::application::patterns::{Diagonals, Fill, PanelIndex, PanelSine, Pattern, Scroll};
use ledboard_sender::application::render::RenderLoop;
use ledboard_sender::infrastructure::network::{FrameMonitor, FrameTransport, UdpDatagramSink};
use ledboard_sender::infrastructure::storage::config::{self, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Streams frames to an LED matrix board over UDP.
#[derive(Debug, Parser)]
#[command(name = "ledboard-sender", version)]
struct Cli {
    /// Configuration file.  Defaults to the platform config directory.
    #[arg(long, env = "LEDBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Controller host name or IP address.
    #[arg(long, env = "LEDBOARD_HOST")]
    host: Option<String>,

    /// Controller UDP port.
    #[arg(long, env = "LEDBOARD_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw a test pattern and send it.
    Pattern {
        #[arg(value_enum)]
        kind: PatternKind,
        /// Number of frames to send; runs until Ctrl-C when omitted.
        #[arg(long)]
        frames: Option<u64>,
    },
    /// Set every pixel to one value.
    Fill {
        value: i32,
        #[arg(long)]
        frames: Option<u64>,
    },
    /// Draw the diagonals and scroll them one pixel per frame.
    Scroll {
        #[arg(long, value_enum, default_value_t = DirectionArg::Right)]
        direction: DirectionArg,
        #[arg(long)]
        frames: Option<u64>,
    },
    /// Receive frames like the controller would and log them.
    Monitor {
        #[arg(long, default_value = "0.0.0.0:1337")]
        bind: SocketAddr,
    },
    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PatternKind {
    Diagonals,
    PanelSine,
    PanelIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DirectionArg> for ScrollDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => ScrollDirection::Up,
            DirectionArg::Down => ScrollDirection::Down,
            DirectionArg::Left => ScrollDirection::Left,
            DirectionArg::Right => ScrollDirection::Right,
        }
    }
}

impl Cli {
    /// Applies the host and port overrides on top of the loaded file.
    fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(host) = &self.host {
            cfg.network.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.network.port = port;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig { force } = cli.command {
        return init_config(cli.config, force);
    }

    let mut cfg = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut cfg);

    // `RUST_LOG` wins; otherwise the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.sender.log_level)),
        )
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl-C, stopping");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl-C signal: {e}"),
        }
    });

    match cli.command {
        Command::Pattern { kind, frames } => {
            let mut pattern: Box<dyn Pattern> = match kind {
                PatternKind::Diagonals => Box::new(Diagonals),
                PatternKind::PanelSine => Box::new(PanelSine),
                PatternKind::PanelIndex => Box::new(PanelIndex),
            };
            render(&cfg, pattern.as_mut(), frames, &running).await
        }
        Command::Fill { value, frames } => {
            render(&cfg, &mut Fill { value }, frames, &running).await
        }
        Command::Scroll { direction, frames } => {
            let mut pattern = Scroll {
                direction: direction.into(),
            };
            render(&cfg, &mut pattern, frames, &running).await
        }
        Command::Monitor { bind } => {
            let mut monitor = FrameMonitor::bind(bind, cfg.frame_len())
                .await
                .with_context(|| format!("failed to start frame monitor on {bind}"))?;
            monitor.run(running).await;
            Ok(())
        }
        Command::InitConfig { .. } => Ok(()),
    }
}

/// Builds the board and transport from `cfg` and runs the render loop.
async fn render(
    cfg: &AppConfig,
    pattern: &mut dyn Pattern,
    frames: Option<u64>,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    let board = LedBoard::from_config(&cfg.board).context("invalid board configuration")?;
    let destination = cfg.network.destination();
    let sink = UdpDatagramSink::connect(&destination.host, destination.port)
        .await
        .with_context(|| format!("failed to open UDP sink to {destination}"))?;
    let transport = FrameTransport::new(sink, cfg.network.transport_settings());

    let mut render_loop = RenderLoop::new(board, transport, cfg.sender.frame_interval());
    let stats = render_loop
        .run(pattern, frames, running)
        .await
        .context("render loop stopped")?;

    info!(
        "done: {} frames sent, {} failed",
        stats.frames_sent, stats.frames_failed
    );
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let target = match path {
        Some(p) => p,
        None => config::config_file_path()?,
    };
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            target.display()
        );
    }
    let mut defaults = AppConfig::default();
    defaults.board.panel_order = Some(ledboard_core::PanelOrder::default());
    let written = config::save_config(&defaults, Some(&target))?;
    println!("wrote {}", written.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
