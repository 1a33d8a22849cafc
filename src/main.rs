use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod balancer;
mod cli;
mod cluster;
mod config;
mod executor;
mod output;
mod proxmox;

#[cfg(test)]
mod tests;

use cli::Cli;
use config::AppConfig;
use proxmox::ProxmoxClient;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Startup and configuration failures are fatal so an orchestrator can
    // restart the process or an operator can repair the config. Individual
    // migration failures never end up here.
    if let Err(e) = run(cli).await {
        eprintln!("proxbalance: {e:#}");
        std::process::exit(2);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.tracing_filter().into()),
        )
        .init();

    info!("proxbalance v{} starting up", env!("CARGO_PKG_VERSION"));
    info!(
        "balancing {} by {}, balanciness {}%",
        config.method, config.mode, config.balanciness
    );

    let client = ProxmoxClient::connect(
        &config.api_host,
        &config.api_user,
        &config.api_pass,
        config.verify_ssl,
    )
    .await?;

    let cancel = CancellationToken::new();
    spawn_signal_watcher(cancel.clone());

    loop {
        run_cycle(&client, &config, &cli, &cancel).await?;

        if !config.daemon || cli.dry_run || cancel.is_cancelled() {
            break;
        }

        info!("sleeping {}h until the next cycle", config.schedule_hours);
        tokio::select! {
            () = cancel.cancelled() => {
                info!("shutdown requested");
                break;
            }
            () = tokio::time::sleep(Duration::from_secs(config.schedule_hours * 3600)) => {}
        }
    }

    info!("proxbalance shut down cleanly");
    Ok(())
}

/// One planning cycle: snapshot, plan, then either print or execute.
async fn run_cycle(
    client: &ProxmoxClient,
    config: &AppConfig,
    cli: &Cli,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut state = cluster::fetch(client, config).await?;
    info!("snapshot: {} nodes, {} VMs", state.nodes.len(), state.vms.len());

    if cancel.is_cancelled() {
        return Ok(());
    }

    let mut rng = StdRng::from_entropy();
    let plan = balancer::generate_plan(&mut state, &config.policy(), &mut rng)?;

    if plan.migrations.is_empty() {
        info!("cluster is balanced, nothing to migrate");
    }

    if cli.dry_run {
        println!("{}", output::render_table(&plan));
    } else if !cancel.is_cancelled() {
        let failures = executor::execute_plan(client, &plan, cancel).await;
        if failures > 0 {
            error!(
                "{failures} of {} migrations failed; the next cycle will re-plan",
                plan.migrations.len()
            );
        }
    }

    if cli.json {
        println!("{}", output::render_json(&state, &plan)?);
    }

    Ok(())
}

/// Turn SIGINT/SIGTERM into a cancellation, so an in-flight cycle stops at
/// its next checkpoint (after the snapshot, after planning, or between
/// migration requests) instead of dying mid-request.
fn spawn_signal_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        warn!("shutdown signal received, stopping at the next checkpoint");
        cancel.cancel();
    });
}

/// Resolve once SIGINT or, on unix, SIGTERM arrives.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let Ok(mut terminate) = signal(SignalKind::terminate()) else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;
}
