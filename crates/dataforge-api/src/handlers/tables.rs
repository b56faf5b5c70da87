//! Schema-management endpoints.

use crate::error::ApiError;
use crate::models::MessageResponse;
use actix_web::{delete, get, post, put, web, HttpResponse};
use dataforge_commons::{ColumnChange, ColumnSpec, InstanceId, TableSpec};
use dataforge_core::SchemaManager;
use std::sync::Arc;

/// POST /databases/{id}/tables — create a table from its description.
#[post("/databases/{id}/tables")]
pub async fn create_table(
    path: web::Path<i64>,
    spec: web::Json<TableSpec>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    manager.create_table(id, &spec).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "Table '{}' created successfully",
        spec.table_name
    ))))
}

/// GET /databases/{id}/tables — base tables in the default schema.
#[get("/databases/{id}/tables")]
pub async fn list_tables(
    path: web::Path<i64>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    let tables = manager.list_tables(id).await?;
    Ok(HttpResponse::Ok().json(tables))
}

/// GET /databases/{id}/tables/{table} — introspected schema, cache-first.
#[get("/databases/{id}/tables/{table}")]
pub async fn get_table_schema(
    path: web::Path<(i64, String)>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table) = path.into_inner();
    let schema = manager.get_schema(InstanceId::new(id), &table).await?;
    Ok(HttpResponse::Ok().json(schema))
}

/// DELETE /databases/{id}/tables/{table} — drop the table, cascading.
#[delete("/databases/{id}/tables/{table}")]
pub async fn delete_table(
    path: web::Path<(i64, String)>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table) = path.into_inner();
    manager.delete_table(InstanceId::new(id), &table).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /databases/{id}/tables/{table}/columns — add a column.
#[post("/databases/{id}/tables/{table}/columns")]
pub async fn add_column(
    path: web::Path<(i64, String)>,
    column: web::Json<ColumnSpec>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table) = path.into_inner();
    manager
        .add_column(InstanceId::new(id), &table, &column)
        .await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "Column '{}' added to table '{}'",
        column.name, table
    ))))
}

/// PUT /databases/{id}/tables/{table}/columns/{column} — rename/retype/
/// change nullability, applied in that order.
#[put("/databases/{id}/tables/{table}/columns/{column}")]
pub async fn modify_column(
    path: web::Path<(i64, String, String)>,
    change: web::Json<ColumnChange>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table, column) = path.into_inner();
    manager
        .modify_column(InstanceId::new(id), &table, &column, &change)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Column '{}' modified in table '{}'",
        column, table
    ))))
}

/// DELETE /databases/{id}/tables/{table}/columns/{column} — drop a column.
#[delete("/databases/{id}/tables/{table}/columns/{column}")]
pub async fn delete_column(
    path: web::Path<(i64, String, String)>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table, column) = path.into_inner();
    manager
        .delete_column(InstanceId::new(id), &table, &column)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /databases/{id}/tables/{table}/relationships — imported foreign keys.
#[get("/databases/{id}/tables/{table}/relationships")]
pub async fn get_relationships(
    path: web::Path<(i64, String)>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table) = path.into_inner();
    let relationships = manager.get_relationships(InstanceId::new(id), &table).await?;
    Ok(HttpResponse::Ok().json(relationships))
}

/// DELETE /databases/{id}/tables/{table}/foreign-keys/{constraint} — drop a
/// foreign-key constraint.
#[delete("/databases/{id}/tables/{table}/foreign-keys/{constraint}")]
pub async fn drop_foreign_key(
    path: web::Path<(i64, String, String)>,
    manager: web::Data<Arc<SchemaManager>>,
) -> Result<HttpResponse, ApiError> {
    let (id, table, constraint) = path.into_inner();
    manager
        .drop_foreign_key(InstanceId::new(id), &table, &constraint)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
