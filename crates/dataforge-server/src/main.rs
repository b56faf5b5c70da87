// DataForge Server
//
// Provisions ephemeral PostgreSQL sandboxes in containers and exposes a
// metadata-driven schema & data API over HTTP.

mod config;
mod logging;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use dataforge_api::routes;
use dataforge_core::{
    AdhocQueryService, CredentialVault, CrudService, DbUserService, InstanceRegistry,
    InstanceService, PgExecutor, SandboxOrchestrator, SchemaCache, SchemaManager, SqlExecutor,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match config::ServerConfig::from_file("dataforge.toml") {
        Ok(cfg) => cfg,
        Err(_) => {
            eprintln!("Warning: dataforge.toml not found, using defaults");
            config::ServerConfig::default()
        }
    };

    // Initialize logging
    logging::init_logging(
        &config.logging.level,
        config.logging.file_path.as_deref(),
        config.logging.log_to_console,
    )?;

    info!("Starting DataForge Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: host={}, port={}",
        config.server.host, config.server.port
    );
    if config.vault.is_default_secret() {
        warn!("Using the built-in vault secret; set [vault].secret for real deployments");
    }

    // Credential vault and instance registry
    let vault = Arc::new(CredentialVault::new(&config.vault.secret));
    let registry = Arc::new(InstanceRegistry::open(PathBuf::from(&config.registry.path))?);
    info!(
        "Instance registry ready at {} ({} instance(s))",
        config.registry.path,
        registry.len()
    );

    // Container backend — reachability decided once, here
    let orchestrator = Arc::new(SandboxOrchestrator::connect().await);
    if !orchestrator.status().is_connected() {
        warn!("Container backend unreachable; provisioning will fail until restart");
    }

    // Shared executor primitive and domain services
    let executor: Arc<dyn SqlExecutor> = Arc::new(PgExecutor::new());
    let schema_cache = Arc::new(SchemaCache::new());

    let instance_service = Arc::new(InstanceService::new(
        registry.clone(),
        vault.clone(),
        orchestrator.clone(),
        executor.clone(),
    ));
    let schema_manager = Arc::new(SchemaManager::new(
        registry.clone(),
        vault.clone(),
        executor.clone(),
        schema_cache,
    ));
    let crud_service = Arc::new(CrudService::new(
        registry.clone(),
        vault.clone(),
        executor.clone(),
    ));
    let adhoc_service = Arc::new(AdhocQueryService::new(
        registry.clone(),
        vault.clone(),
        executor.clone(),
    ));
    let user_service = Arc::new(DbUserService::new(registry, vault, executor));
    info!("Domain services initialized");

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);

    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };

    HttpServer::new(move || {
        // CORS for the desktop/web console
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(orchestrator.clone()))
            .app_data(web::Data::new(instance_service.clone()))
            .app_data(web::Data::new(schema_manager.clone()))
            .app_data(web::Data::new(crud_service.clone()))
            .app_data(web::Data::new(adhoc_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .configure(routes::configure_routes)
    })
    .bind(&bind_addr)?
    .workers(workers)
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
