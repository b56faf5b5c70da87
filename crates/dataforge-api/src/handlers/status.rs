//! Service status endpoint.

use actix_web::{get, web, HttpResponse};
use dataforge_core::SandboxOrchestrator;
use serde_json::json;
use std::sync::Arc;

/// GET /api/status — the orchestrator's startup reachability snapshot.
///
/// The reported backend state is the one observed at process start; it is
/// not a live probe of the container runtime.
#[get("/api/status")]
pub async fn get_status(
    orchestrator: web::Data<Arc<SandboxOrchestrator>>,
) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "container_backend": orchestrator.status(),
    }))
}
