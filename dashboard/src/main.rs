use anyhow::Context;
use clap::Parser;
use fieldcore::engine::TickOutcome;
use gui_bridge::bridge::GuiBridge;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use workflow::config::DashboardConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Response-team dashboard driver")]
struct Args {
    /// Load dashboard settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "team-1")]
    team_id: String,
    /// Base URL of the dashboard backend (`/api/...` lives under it)
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    api_base: String,
    #[arg(long, default_value_t = 10_000)]
    poll_ms: u64,
    /// Run a single poll tick, print the view model and exit
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Serve the view model over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        DashboardConfig::load(path)?
    } else {
        DashboardConfig::from_args(args.team_id, args.api_base, args.poll_ms)
    };
    let runner = Runner::new(config.clone());

    if args.once {
        let result = runner.run_once().await?;
        let failures = match &result.outcome {
            TickOutcome::Success => 0,
            TickOutcome::PartialFailure(failures) => failures.len(),
        };
        println!(
            "Single tick -> position {:?}, reports {}, failures {}",
            result
                .view
                .position()
                .map(|fix| (fix.latitude(), fix.longitude())),
            result.view.reports().len(),
            failures
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&result.view).context("serializing view model")?
        );
        return Ok(());
    }

    let session = Arc::new(runner.start_session().await?);
    let bridge = if args.serve {
        Some(GuiBridge::start(session.clone(), config.bind)?)
    } else {
        None
    };

    println!(
        "Dashboard session for team {} running (Ctrl+C to stop)...",
        session.team()
    );
    if let Some(bridge) = bridge.as_ref() {
        println!("View model at http://{}/view", bridge.address());
    }
    signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;

    if let Some(bridge) = bridge {
        bridge.shutdown().await;
    }
    session.logout().await;

    Ok(())
}
