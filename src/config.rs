//! Process configuration, read once at startup and passed by value.
//!
//! Layers, lowest to highest precedence:
//! 1. built-in defaults (`localhost`, `root`, empty password, `rishta`, `utf8mb4`)
//! 2. `DB_PORT` parsed as a number
//! 3. `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_CHARSET`, `DB_COLLATION`
//!    taken verbatim, so a password like `0123` or `[x]` is not reinterpreted
//! 4. `LOGLEVEL`
//!
//! When `DB_CHARSET` picks a non-default charset and `DB_COLLATION` is unset,
//! the collation is left to the server's default for that charset.

use crate::error::ProvisionError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt;

const ENV_PREFIX: &str = "DB_";
const VERBATIM_FIELDS: [&str; 6] = ["host", "user", "password", "name", "charset", "collation"];

/// Everything needed to open the administrative connection and describe the
/// target schema.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionParameters {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Target schema. Dropped and recreated on every run.
    pub name: String,
    pub charset: String,
    /// `None` lets the server pick the charset's default collation.
    pub collation: Option<String>,
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "rishta".to_string(),
            charset: "utf8mb4".to_string(),
            collation: Some("utf8mb4_unicode_ci".to_string()),
        }
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &password)
            .field("name", &self.name)
            .field("charset", &self.charset)
            .field("collation", &self.collation)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: ConnectionParameters,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: ConnectionParameters::default(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Layered figment over defaults and the process environment.
    pub fn figment() -> Result<Figment, ProvisionError> {
        Ok(Self::layered(verbatim_env(ENV_PREFIX)?))
    }

    pub fn load() -> Result<Self, ProvisionError> {
        let verbatim = verbatim_env(ENV_PREFIX)?;
        let collation_pinned = verbatim.contains_key("collation");
        let mut cfg: Config = Self::layered(verbatim).extract()?;

        let default_charset = ConnectionParameters::default().charset;
        if !collation_pinned && !cfg.database.charset.eq_ignore_ascii_case(&default_charset) {
            cfg.database.collation = None;
        }
        Ok(cfg)
    }

    fn layered(verbatim: BTreeMap<String, String>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .only(&["port"])
                    .map(|key| format!("database.{key}").into()),
            )
            .merge(Serialized::default("database", verbatim))
            .merge(Env::raw().only(&["loglevel"]))
    }
}

/// A set but undecodable variable is an error, never a silent fallback to
/// the default schema.
fn verbatim_env(prefix: &str) -> Result<BTreeMap<String, String>, ProvisionError> {
    let mut values = BTreeMap::new();
    for field in VERBATIM_FIELDS {
        let var = format!("{prefix}{}", field.to_ascii_uppercase());
        match std::env::var(&var) {
            Ok(v) => {
                values.insert(field.to_string(), v);
            }
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(_)) => {
                return Err(ProvisionError::Configuration(format!(
                    "{var} is not valid UTF-8"
                )));
            }
        }
    }
    Ok(values)
}
