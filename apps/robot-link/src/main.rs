use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::time::Duration;
use tracing::{error, info};

use actuator_api::{MockActuator, MockTiming};
use command_dispatch::{load_config, LinkConfig, Session, SessionMetrics};

mod controller;

#[derive(Parser, Debug)]
#[command(
    name = "robot-link",
    version,
    about = "Semicolon-delimited command link between a controller and a robot",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Robot side: connect to the controller and execute commands until it disconnects
    Run {
        /// YAML config file; flags below override its values
        #[arg(long)]
        config: Option<String>,
        /// Name this robot answers to
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Bound each actuator action, in milliseconds
        #[arg(long)]
        action_timeout_ms: Option<u64>,
        /// Simulated duration of every motion primitive, in milliseconds
        #[arg(long, default_value_t = 250u64)]
        sim_ms: u64,
        /// Print prometheus counters when the session ends
        #[arg(long, action = ArgAction::SetTrue)]
        metrics: bool,
    },
    /// Controller side: accept one robot and send it commands read from stdin
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: String,
        /// How long to wait for an acknowledgment before moving on
        #[arg(long, default_value_t = 30_000u64)]
        ack_timeout_ms: u64,
        /// Send lines even when they do not parse
        #[arg(long, action = ArgAction::SetTrue)]
        raw: bool,
    },
    /// Validate one frame and print it as JSON
    Parse {
        /// Frame text, e.g. "CozmoName;F;L;100;50"
        message: String,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            name,
            host,
            port,
            action_timeout_ms,
            sim_ms,
            metrics,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)?,
                None => LinkConfig::default(),
            };
            if let Some(name) = name {
                cfg.robot_name = name;
            }
            if let Some(host) = host {
                cfg.host = host;
            }
            if let Some(port) = port {
                cfg.port = port;
            }
            if action_timeout_ms.is_some() {
                cfg.action_timeout_ms = action_timeout_ms;
            }
            run_robot(&cfg, Duration::from_millis(sim_ms), metrics)
        }
        Commands::Serve {
            bind,
            ack_timeout_ms,
            raw,
        } => controller::serve(&bind, Duration::from_millis(ack_timeout_ms), raw),
        Commands::Parse { message } => match command_codec::parse(&message) {
            Ok(cmd) => {
                println!("{}", serde_json::to_string_pretty(&cmd)?);
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("invalid frame {message:?}: {e}")),
        },
    }
}

fn run_robot(cfg: &LinkConfig, sim: Duration, print_metrics: bool) -> Result<()> {
    info!(robot = %cfg.robot_name, addr = %cfg.addr(), "connecting to controller");
    let mut transport = cfg
        .connect()
        .with_context(|| format!("connecting to {}", cfg.addr()))?;

    let dispatcher = cfg.dispatcher();
    let metrics = SessionMetrics::new().map_err(anyhow::Error::msg)?;
    let mut robot = MockActuator::with_timing(MockTiming::uniform(sim));

    let session = Session::new(&dispatcher).with_metrics(&metrics);
    let outcome = session.run(&mut transport, &mut robot);

    if print_metrics {
        print!("{}", metrics.encode_text());
    }
    match outcome {
        Ok(report) => {
            info!(
                received = report.received,
                dispatched = report.dispatched,
                ignored = report.ignored,
                rejected = report.rejected,
                "session finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(session = %session.id(), "session aborted: {e}");
            Err(e.into())
        }
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
