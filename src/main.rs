//! `npo-grab` - keeps NPO radio stream URLs resolved and redirects players to them

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use npo_grab::{
    build_client, router, serve, Config, LookupState, RefreshScheduler, ResolutionPipeline,
    RouteRegistry, RouteResolver, StreamCache,
};

#[derive(Parser)]
#[command(name = "npo-grab")]
#[command(about = "Resolve live NPO radio stream URLs and redirect players to them")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the redirect server (default)
    Serve,

    /// List the configured routes
    Routes,

    /// Resolve stream URLs once and print them, without serving
    Resolve {
        /// Only resolve this route (e.g. /nporadio2.m3u8)
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `routes` / `resolve` output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(&cli.config).await,
        Commands::Routes => {
            cmd_routes();
            Ok(())
        }
        Commands::Resolve { path } => cmd_resolve(&cli.config, path.as_deref()).await,
    }
}

fn pipeline(config: &Config) -> Result<Arc<dyn RouteResolver>> {
    let client = build_client(config.timeout())
        .map_err(anyhow::Error::from)
        .inspect_err(|e| error!("Cannot set up page resolution: {e:#}"))?;
    Ok(Arc::new(ResolutionPipeline::with_client(client)))
}

async fn cmd_serve(config: &Config) -> Result<()> {
    let resolver = pipeline(config)?;
    let registry = Arc::new(RouteRegistry::npo_radio());
    let cache = StreamCache::new();
    let shutdown = CancellationToken::new();

    info!(
        port = config.port(),
        timeout = %humantime::format_duration(config.timeout()),
        refresh_interval = %humantime::format_duration(config.refresh_interval()),
        "Starting"
    );

    let refresher = RefreshScheduler::new(
        resolver,
        Arc::clone(&registry),
        cache.clone(),
        config.refresh_interval(),
    )
    .with_cancellation(shutdown.clone())
    .spawn();

    tokio::spawn(shutdown_signal(shutdown.clone()));

    if let Some(route) = registry.iter().next() {
        info!("To grab a stream URL, visit e.g. http://<ip-address>:{}{}", config.port(), route.path);
    }

    let app = router(LookupState {
        cache,
        refresh_interval: config.refresh_interval(),
    });
    let served = serve(config.port(), app, shutdown.clone()).await;

    // An in-flight pass is abandoned rather than awaited; cache writes are
    // whole-entry so nothing is left half written.
    shutdown.cancel();
    refresher.abort();

    served.with_context(|| format!("HTTP server on port {} failed", config.port()))
}

fn cmd_routes() {
    let registry = RouteRegistry::npo_radio();
    println!("📻 {} routes:\n", registry.len());
    for route in registry.iter() {
        println!(
            "   {:<20} {:<5} {:<9} {}",
            route.path, route.profile, route.drm_type, route.page_url
        );
    }
}

async fn cmd_resolve(config: &Config, path: Option<&str>) -> Result<()> {
    let all = RouteRegistry::npo_radio();
    let registry = match path {
        Some(path) => match all.get(path) {
            Some(route) => RouteRegistry::from_routes([route.clone()]),
            None => bail!("Unknown route: {path}. Run `npo-grab routes` to list them."),
        },
        None => all,
    };

    let resolver = pipeline(config)?;
    let scheduler = RefreshScheduler::new(
        resolver,
        Arc::new(registry),
        StreamCache::new(),
        config.refresh_interval(),
    );

    let report = scheduler.run_pass().await;
    for (path, url) in &report.resolved {
        println!("✅ {path}\n   {url}");
    }
    for (path, err) in &report.failed {
        println!("❌ {path}\n   {err}");
    }

    if !report.is_complete() {
        let total = report.failed.len() + report.resolved.len();
        bail!("{} of {total} routes failed", report.failed.len());
    }
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received SIGTERM signal");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    shutdown.cancel();
}
