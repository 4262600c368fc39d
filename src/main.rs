use carrier_sales::db::seed_loads_if_empty;
use carrier_sales::{api, config::Config, db::init_db, CarrierVerifier, FmcsaClient, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    let repo = Arc::new(Repository::new(pool));

    if config.seed_on_startup {
        if let Err(e) = seed_loads_if_empty(&repo, chrono::Utc::now()).await {
            eprintln!("Failed to seed loads: {}", e);
            std::process::exit(1);
        }
    }

    if config.fmcsa_api_key.is_empty() {
        tracing::warn!("FMCSA_API_KEY is not set; carrier verification will report unavailable");
    }
    let verifier: Arc<dyn CarrierVerifier> = Arc::new(FmcsaClient::new(
        config.fmcsa_base_url.clone(),
        config.fmcsa_api_key.clone(),
    ));

    let addr = SocketAddr::new(config.host, config.port);
    let app = api::create_router(api::AppState::new(repo, config, verifier));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
