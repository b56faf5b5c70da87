//! Dynamic CRUD: parameterized statements over runtime table/column names.

mod builder;
mod service;

pub use builder::{parse_id, ReadOptions};
pub use service::CrudService;
