use log::{error, info};
use program_reports::config::Config;
use program_reports::db_migration::initialize_database;
use program_reports::auth::JwtCodec;
use program_reports::domains::report::ProgramReportServiceImpl;
use program_reports::server::{build_router, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("program_reports_server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    info!("Starting with {:?}", config);

    let pool = config.connect_pool().await?;
    initialize_database(&pool).await?;

    let state = AppState::new(
        Arc::new(ProgramReportServiceImpl::from_pool(pool)),
        JwtCodec::new(&config.jwt_secret)?,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Program report server listening on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
