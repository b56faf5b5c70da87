//! Dynamic record CRUD endpoints.

use crate::error::ApiError;
use crate::models::{AffectedResponse, MessageResponse, RecordQuery};
use actix_web::{delete, get, post, put, web, HttpResponse};
use dataforge_commons::{InstanceId, RecordFields};
use dataforge_core::CrudService;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// POST /db/{id}/tables/{table} — insert one record.
#[post("/db/{id}/tables/{table}")]
pub async fn create_record(
    path: web::Path<(i64, String)>,
    record: web::Json<RecordFields>,
    service: web::Data<Arc<CrudService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table) = path.into_inner();
    service
        .create_record(InstanceId::new(id), &table, &record)
        .await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "Record created in table '{}'",
        table
    ))))
}

/// GET /db/{id}/tables/{table} — paginated, filterable read.
///
/// Reserved query parameters: `page`, `limit`, `order_by`,
/// `order_direction`; all others are column filters.
#[get("/db/{id}/tables/{table}")]
pub async fn read_records(
    path: web::Path<(i64, String)>,
    params: web::Query<IndexMap<String, String>>,
    service: web::Data<Arc<CrudService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table) = path.into_inner();
    let query = RecordQuery::from_params(params.into_inner())?;
    let records = service
        .read_records(InstanceId::new(id), &table, &query.filters, &query.options)
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

/// PUT /db/{id}/tables/{table}/{record_id} — patch by id. 0 affected rows
/// is a success, not an error.
#[put("/db/{id}/tables/{table}/{record_id}")]
pub async fn update_record(
    path: web::Path<(i64, String, String)>,
    patch: web::Json<RecordFields>,
    service: web::Data<Arc<CrudService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table, record_id) = path.into_inner();
    let rows_affected = service
        .update_record(
            InstanceId::new(id),
            &table,
            &Value::String(record_id),
            &patch,
        )
        .await?;
    Ok(HttpResponse::Ok().json(AffectedResponse { rows_affected }))
}

/// DELETE /db/{id}/tables/{table}/{record_id} — delete by id.
#[delete("/db/{id}/tables/{table}/{record_id}")]
pub async fn delete_record(
    path: web::Path<(i64, String, String)>,
    service: web::Data<Arc<CrudService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table, record_id) = path.into_inner();
    let rows_affected = service
        .delete_record(InstanceId::new(id), &table, &Value::String(record_id))
        .await?;
    Ok(HttpResponse::Ok().json(AffectedResponse { rows_affected }))
}
