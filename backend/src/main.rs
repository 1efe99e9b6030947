//! Service entry point: loads settings, wires storage, starts the daily
//! reminder job and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use immunisation::domain::DailyScheduler;
use immunisation::inbound::http::health::HealthState;
use immunisation::inbound::http::session_config::{BuildMode, session_settings};
use immunisation::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::settings::ServiceSettings;
use server::{ServerConfig, build_components, build_delivery_channel, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load service settings")?;
    let runtime = settings
        .resolve(std::env::var("DATABASE_URL").ok())
        .wrap_err("invalid service settings")?;
    let session = session_settings(&runtime.session, BuildMode::from_debug_assertions())
        .wrap_err("failed to prepare session key")?;

    let pool = match runtime.database_url.as_deref() {
        Some(url) => {
            let applied = run_pending_migrations(url)
                .await
                .wrap_err("database migrations failed")?;
            info!(applied, "database migrations applied");
            let config =
                PoolConfig::for_reminder_scan(url, runtime.scanner.max_concurrent_deliveries);
            Some(
                DbPool::new(config)
                    .await
                    .wrap_err("failed to build database pool")?,
            )
        }
        None => None,
    };

    let delivery = build_delivery_channel(&runtime.delivery)?;
    let components = build_components(&runtime, pool, delivery);
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_storage_ready(components.storage);

    let scheduler = DailyScheduler::new(runtime.schedule, Arc::new(DefaultClock));
    let job = scheduler.start(components.scanner);
    health_state.set_scheduler_running(true);

    let config = ServerConfig::new(session, runtime.bind_addr);
    info!(bind_addr = %config.bind_addr(), "starting HTTP server");
    let served = create_server(health_state.clone(), components.http_state, config)?.await;

    health_state.mark_draining();
    if let Err(err) = job.stop().await {
        warn!(error = %err, "reminder scheduler did not stop cleanly");
    }
    health_state.set_scheduler_running(false);
    served.wrap_err("HTTP server terminated with an error")
}
