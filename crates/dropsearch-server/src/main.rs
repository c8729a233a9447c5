//! Dropsearch - runs Dropbox team member traversals

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod indexing;


use crate::config::Settings;
use dropsearch_connector::{
    Checkpoint, DropboxRepository, IndexingService, ListingTraversal, Repository,
    RepositoryContext, TraversalOptions, TraversalReport, TraversalStatus,
};
use dropsearch_dropbox::DropboxClientFactory;
use indexing::LoggingIndexingService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let settings = Settings::load().context("Failed to load configuration")?;

    info!("Starting dropsearch v{}", env!("CARGO_PKG_VERSION"));

    let mut repository = DropboxRepository::new(Arc::new(DropboxClientFactory::new()));
    repository
        .init(&RepositoryContext::new(settings.dropbox.clone()))
        .await
        .context("Failed to initialize Dropbox repository")?;

    let indexing = LoggingIndexingService::stdout();
    let options = TraversalOptions {
        resolve_pushed_items: settings.traversal.resolve_pushed_items,
    };

    let result = match settings.traversal.interval_secs {
        None => run_once(&repository, &indexing, options).await,
        Some(secs) => {
            run_every(
                &repository,
                &indexing,
                options,
                Duration::from_secs(secs),
                shutdown_signal(),
            )
            .await
        }
    };

    repository.close().await;
    result
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dropsearch=debug"));

    // stdout carries the operation stream
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

async fn traverse(
    repository: &dyn Repository,
    indexing: &dyn IndexingService,
    options: TraversalOptions,
    checkpoint: Option<&Checkpoint>,
) -> Result<TraversalReport> {
    let report = ListingTraversal::new(repository, indexing, options)
        .run(checkpoint)
        .await
        .context("Traversal failed")?;

    info!(
        "Traversal report: {}",
        serde_json::to_string(&report).context("Failed to encode traversal report")?
    );
    Ok(report)
}

async fn run_once(
    repository: &dyn Repository,
    indexing: &dyn IndexingService,
    options: TraversalOptions,
) -> Result<()> {
    let report = traverse(repository, indexing, options, None).await?;

    if report.status == TraversalStatus::Failed {
        anyhow::bail!("Traversal failed with {} errors", report.errors.len());
    }
    Ok(())
}

/// Run a traversal every `period` until `shutdown` completes
///
/// `shutdown` is also watched while a traversal is in flight.
async fn run_every<F>(
    repository: &dyn Repository,
    indexing: &dyn IndexingService,
    options: TraversalOptions,
    period: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    info!("Running traversals every {}s", period.as_secs());

    let mut ticker = tokio::time::interval(period);
    let mut checkpoint: Option<Checkpoint> = None;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        tokio::select! {
            result = traverse(repository, indexing, options.clone(), checkpoint.as_ref()) => {
                match result {
                    Ok(report) => {
                        if report.status != TraversalStatus::Success {
                            warn!("Traversal finished with status {:?}", report.status);
                        }
                        checkpoint = report.checkpoint;
                    }
                    Err(e) => error!("{:#}", e),
                }
            }
            _ = &mut shutdown => {
                warn!("Shutdown requested during traversal");
                break;
            }
        }
    }

    info!("Shutdown requested");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
