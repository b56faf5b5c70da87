//! Engine-user management endpoints.

use crate::error::ApiError;
use crate::models::{CreateDbUserRequest, MessageResponse, PermissionsRequest};
use actix_web::{delete, get, post, web, HttpResponse};
use dataforge_commons::InstanceId;
use dataforge_core::DbUserService;
use std::sync::Arc;

/// POST /databases/{id}/db-users — create an engine-level user.
#[post("/databases/{id}/db-users")]
pub async fn create_db_user(
    path: web::Path<i64>,
    request: web::Json<CreateDbUserRequest>,
    service: web::Data<Arc<DbUserService>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    service
        .create_user(id, &request.username, &request.password)
        .await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "User '{}' created successfully",
        request.username
    ))))
}

/// DELETE /databases/{id}/db-users/{username} — drop an engine-level user.
#[delete("/databases/{id}/db-users/{username}")]
pub async fn delete_db_user(
    path: web::Path<(i64, String)>,
    service: web::Data<Arc<DbUserService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, username) = path.into_inner();
    service.delete_user(InstanceId::new(id), &username).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "User '{}' deleted successfully",
        username
    ))))
}

/// GET /databases/{id}/db-users — users from the engine catalog.
#[get("/databases/{id}/db-users")]
pub async fn list_db_users(
    path: web::Path<i64>,
    service: web::Data<Arc<DbUserService>>,
) -> Result<HttpResponse, ApiError> {
    let id = InstanceId::new(path.into_inner());
    let users = service.list_users(id).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /databases/{id}/db-users/{username}/permissions — grant table
/// privileges.
#[post("/databases/{id}/db-users/{username}/permissions")]
pub async fn grant_permissions(
    path: web::Path<(i64, String)>,
    request: web::Json<PermissionsRequest>,
    service: web::Data<Arc<DbUserService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, username) = path.into_inner();
    service
        .grant(
            InstanceId::new(id),
            &username,
            &request.table_name,
            &request.privileges,
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Permissions granted to '{}' on table '{}'",
        username, request.table_name
    ))))
}

/// DELETE /databases/{id}/db-users/{username}/permissions — revoke table
/// privileges.
#[delete("/databases/{id}/db-users/{username}/permissions")]
pub async fn revoke_permissions(
    path: web::Path<(i64, String)>,
    request: web::Json<PermissionsRequest>,
    service: web::Data<Arc<DbUserService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, username) = path.into_inner();
    service
        .revoke(
            InstanceId::new(id),
            &username,
            &request.table_name,
            &request.privileges,
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Permissions revoked from '{}' on table '{}'",
        username, request.table_name
    ))))
}

/// GET /databases/{id}/db-users/{username}/permissions — direct grants,
/// grouped by table.
#[get("/databases/{id}/db-users/{username}/permissions")]
pub async fn list_user_permissions(
    path: web::Path<(i64, String)>,
    service: web::Data<Arc<DbUserService>>,
) -> Result<HttpResponse, ApiError> {
    let (id, username) = path.into_inner();
    let permissions = service
        .list_permissions(InstanceId::new(id), &username)
        .await?;
    Ok(HttpResponse::Ok().json(permissions))
}
