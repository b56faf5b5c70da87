//! Database-instance lifecycle endpoints.

use crate::error::ApiError;
use crate::models::{CreateDatabaseRequest, InstanceCreated, InstanceSummary};
use actix_web::{delete, get, post, web, HttpResponse};
use dataforge_commons::InstanceId;
use dataforge_core::InstanceService;
use log::info;
use serde_json::json;
use std::sync::Arc;

/// POST /databases — provision a new sandboxed database instance.
#[post("/databases")]
pub async fn create_database(
    request: web::Json<CreateDatabaseRequest>,
    service: web::Data<Arc<InstanceService>>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    info!("Provisioning database '{}'", request.db_name);
    let instance = service
        .provision(&request.db_name, &request.user, &request.password)
        .await?;
    Ok(HttpResponse::Created().json(InstanceCreated::from(&instance)))
}

/// GET /databases — all registered instances, credentials omitted.
#[get("/databases")]
pub async fn list_databases(
    service: web::Data<Arc<InstanceService>>,
) -> Result<HttpResponse, ApiError> {
    let summaries: Vec<InstanceSummary> =
        service.list().iter().map(InstanceSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// DELETE /databases/{id} — tear down the sandbox and forget the instance.
#[delete("/databases/{id}")]
pub async fn delete_database(
    path: web::Path<i64>,
    service: web::Data<Arc<InstanceService>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    service.delete(id).await?;
    info!("Deleted database instance {}", id);
    Ok(HttpResponse::NoContent().finish())
}

/// GET /databases/{id}/test-connection — one round trip to the engine.
#[get("/databases/{id}/test-connection")]
pub async fn test_connection(
    path: web::Path<i64>,
    service: web::Data<Arc<InstanceService>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    let connected = service.test_connection(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "connected": connected })))
}
