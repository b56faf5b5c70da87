//! API route configuration.
//!
//! All endpoints are registered here; handlers carry their full paths so the
//! route table reads top to bottom:
//!
//! - `POST/GET    /databases`            — provision / list instances
//! - `DELETE      /databases/{id}`       — decommission an instance
//! - `GET         /databases/{id}/test-connection`
//! - `...         /databases/{id}/tables...`      — schema management
//! - `...         /databases/{id}/db-users...`    — engine users and grants
//! - `POST        /databases/{id}/query` — ad-hoc SQL console
//! - `...         /db/{id}/tables/{table}...`     — dynamic record CRUD
//! - `GET         /api/status`           — backend reachability snapshot

use crate::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::instances::create_database)
        .service(handlers::instances::list_databases)
        .service(handlers::instances::delete_database)
        .service(handlers::instances::test_connection)
        .service(handlers::tables::create_table)
        .service(handlers::tables::list_tables)
        .service(handlers::tables::get_table_schema)
        .service(handlers::tables::delete_table)
        .service(handlers::tables::add_column)
        .service(handlers::tables::modify_column)
        .service(handlers::tables::delete_column)
        .service(handlers::tables::get_relationships)
        .service(handlers::tables::drop_foreign_key)
        .service(handlers::records::create_record)
        .service(handlers::records::read_records)
        .service(handlers::records::update_record)
        .service(handlers::records::delete_record)
        .service(handlers::query::execute_query)
        .service(handlers::users::create_db_user)
        .service(handlers::users::delete_db_user)
        .service(handlers::users::list_db_users)
        .service(handlers::users::grant_permissions)
        .service(handlers::users::revoke_permissions)
        .service(handlers::users::list_user_permissions)
        .service(handlers::status::get_status);
}
