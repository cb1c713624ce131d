//! Database layer — schema setup plus the staging/mart access store.

pub mod schema;
pub mod store;
