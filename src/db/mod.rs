//! Database module: everything that touches the server or statement text.
//!
//! Layout:
//! - `identifier.rs`: allow-list validation for identifier-position values
//! - `statements.rs`: DDL and inspection SQL (MySQL dialect)
//! - `admin.rs`: connector/connection traits the provisioner is written against
//! - `mysql.rs`: sqlx-backed implementation of those traits
//! - `fake.rs`: in-memory server for tests

pub mod admin;
#[cfg(test)]
pub(crate) mod fake;
pub mod identifier;
pub mod mysql;
pub mod statements;

pub use admin::{AdminConnection, AdminConnector, SchemaInfo};
pub use identifier::{Charset, Collation, SchemaName};
pub use mysql::{MySqlAdmin, MySqlConnector};
