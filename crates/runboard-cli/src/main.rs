mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{
    bail,
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use runboard_api::ActionEffect;
use runboard_core::config::{
    validate_client,
    ConfigLoader,
    RunboardConfig,
};
use runboard_core::{
    render_rows,
    BroadcastEventBus,
    CoreEvent,
    Effect,
    PanelContext,
    TriggerOutcome,
};
use tokio::sync::broadcast;

use crate::render::{
    render_notification,
    render_table,
};

const FOLLOW_TIMEOUT: Duration = Duration::from_secs(60);

/// Runboard - list GitHub Actions runs and trigger new ones
#[derive(Debug, Parser)]
#[command(name = "runboard", version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "RUNBOARD_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Override the plugin server URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the run history table
    Runs {
        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trigger a workflow run
    Trigger {
        /// Follow the notification action and print the refreshed table
        #[arg(long)]
        follow: bool,
    },

    /// Poll the run history and reprint the table on every change
    Watch {
        /// Poll interval in seconds (defaults to the configured one)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    runboard_core::logging::init_stderr(cli.verbose);

    let config = load_config(&cli)?;
    let event_bus = Arc::new(BroadcastEventBus::default());
    let context = PanelContext::new(&config, event_bus.clone())
        .context("Failed to create panel client")?;

    match cli.command {
        Commands::Runs { json } => list_runs(&context, json).await,
        Commands::Trigger { follow } => trigger(&context, &event_bus, follow).await,
        Commands::Watch { interval } => {
            let context = match interval {
                Some(secs) => {
                    let mut config = config.clone();
                    config.client.poll_interval_secs = secs;
                    PanelContext::new(&config, event_bus.clone())?
                }
                None => context,
            };
            watch(&context, &event_bus).await
        }
    }
}

fn load_config(cli: &Cli) -> Result<RunboardConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(ConfigLoader::discover_config_path);

    let mut config = ConfigLoader::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(base_url) = &cli.base_url {
        config.client.base_url = base_url.clone();
    }

    let validation = validate_client(&config);
    if !validation.is_ok() {
        bail!("Invalid configuration: {}", validation.summary());
    }

    Ok(config)
}

async fn list_runs(context: &PanelContext, json: bool) -> Result<ExitCode> {
    let runs = context
        .history
        .fetch_now()
        .await
        .context("Failed to fetch run history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    } else {
        print!("{}", render_table(&render_rows(Some(&runs))));
    }

    Ok(ExitCode::SUCCESS)
}

async fn trigger(
    context: &PanelContext, event_bus: &BroadcastEventBus, follow: bool,
) -> Result<ExitCode> {
    let outcome = context.controller.trigger_run().await;

    if let Some(notification) = context.controller.notification() {
        print!("{}", render_notification(&notification));
    }

    let succeeded = matches!(outcome, TriggerOutcome::Triggered);
    let follows_refresh = context
        .controller
        .notification()
        .and_then(|n| n.action)
        .is_some_and(|a| a.effect == ActionEffect::RefreshAndDismiss);

    if follow && follows_refresh {
        let mut events = event_bus.subscribe();
        context.start_polling().await;
        wait_for_runs(&mut events).await?;

        for effect in context.controller.invoke_notification_action().await {
            match effect {
                Effect::RequestRefresh => {
                    wait_for_runs(&mut events).await?;
                    let snapshot = context.history.snapshot().await;
                    print!("{}", render_table(&render_rows(snapshot.runs.as_ref())));
                }
                Effect::OpenLink(href) => println!("{href}"),
                Effect::Dispatch => {}
            }
        }

        context.shutdown().await;
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Waits for the next successful fetch
async fn wait_for_runs(events: &mut broadcast::Receiver<CoreEvent>) -> Result<()> {
    tokio::time::timeout(FOLLOW_TIMEOUT, async {
        loop {
            match events.recv().await {
                Ok(CoreEvent::RunsUpdated { .. }) => return Ok(()),
                Ok(CoreEvent::RefreshError { error }) => {
                    tracing::warn!(error = %error, "Refresh failed, waiting for next poll");
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => bail!("Event bus closed"),
            }
        }
    })
    .await
    .context("Timed out waiting for the run list")?
}

async fn watch(context: &PanelContext, event_bus: &BroadcastEventBus) -> Result<ExitCode> {
    let mut events = event_bus.subscribe();
    context.start_polling().await;

    eprintln!(
        "Polling every {}s, press Ctrl-C to stop",
        context.history.poll_interval().as_secs()
    );

    let mut printed_once = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(CoreEvent::RunsUpdated { changed, .. }) if changed || !printed_once => {
                    let snapshot = context.history.snapshot().await;
                    print!("{}", render_table(&render_rows(snapshot.runs.as_ref())));
                    println!();
                    printed_once = true;
                }
                Ok(CoreEvent::RefreshError { error }) => eprintln!("Refresh failed: {error}"),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    context.shutdown().await;
    Ok(ExitCode::SUCCESS)
}
