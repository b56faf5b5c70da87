//! Ad-hoc SQL endpoint.

use crate::error::ApiError;
use crate::models::SqlQueryRequest;
use actix_web::{post, web, HttpResponse};
use dataforge_commons::InstanceId;
use dataforge_core::AdhocQueryService;
use std::sync::Arc;

/// POST /databases/{id}/query — run literal SQL against an instance.
///
/// Always answers 200 with a tagged outcome (rows, affected count, or a
/// captured error), so an interactive console can render SQL failures as
/// data. Only an unknown instance id is still a 404.
#[post("/databases/{id}/query")]
pub async fn execute_query(
    path: web::Path<i64>,
    request: web::Json<SqlQueryRequest>,
    service: web::Data<Arc<AdhocQueryService>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    let outcome = service.execute(id, &request.sql).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
