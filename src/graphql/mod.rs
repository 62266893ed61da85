pub mod schema_impl;

pub use schema_impl::{create_schema, Schema};
