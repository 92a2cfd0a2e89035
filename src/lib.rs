pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use cli::{Cli, Outcome, run_cli};
pub use config::{Config, ConnectionParameters};
pub use db::MySqlConnector;
pub use error::ProvisionError;
pub use service::{ProvisionPlan, ProvisionReport, Provisioner};
