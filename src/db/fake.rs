//! In-memory stand-in for a MySQL server, for exercising the reset sequence
//! without a live database.

use crate::config::ConnectionParameters;
use crate::db::admin::{AdminConnection, AdminConnector, SchemaInfo};
use crate::db::identifier::SchemaName;
use sqlx::Error as SqlxError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailAt {
    Connect,
    Drop,
    Create,
    Inspect,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeSchema {
    pub charset: String,
    pub collation: String,
    pub tables: i64,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub schemas: HashMap<String, FakeSchema>,
    pub executed: Vec<String>,
    pub connects: usize,
    pub open: usize,
    pub fail_at: Option<FailAt>,
    /// Another process recreates the schema right after our drop.
    pub drop_races: bool,
    /// Server ignores the requested charset.
    pub forced_charset: Option<String>,
    /// MySQL 8.0.30+ behaviour: `utf8` is stored and reported as `utf8mb3`.
    pub reports_utf8mb3: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    state: Arc<Mutex<FakeState>>,
}

impl FakeServer {
    pub fn with(f: impl FnOnce(&mut FakeState)) -> Self {
        let server = Self::default();
        f(&mut server.state.lock().unwrap());
        server
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn seed(&self, name: &str, charset: &str, collation: &str, tables: i64) {
        self.state().schemas.insert(
            name.to_string(),
            FakeSchema {
                charset: charset.to_string(),
                collation: collation.to_string(),
                tables,
            },
        );
    }
}

pub(crate) struct FakeConn {
    state: Arc<Mutex<FakeState>>,
}

fn injected(step: &str) -> SqlxError {
    SqlxError::Protocol(format!("injected {step} failure"))
}

fn unquote(ident: &str) -> String {
    ident.trim_matches('`').to_string()
}

impl AdminConnector for FakeServer {
    type Conn = FakeConn;

    async fn connect(&self, _params: &ConnectionParameters) -> Result<FakeConn, SqlxError> {
        let mut st = self.state();
        st.connects += 1;
        if st.fail_at == Some(FailAt::Connect) {
            return Err(SqlxError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        st.open += 1;
        Ok(FakeConn {
            state: self.state.clone(),
        })
    }
}

impl FakeState {
    fn create(&mut self, name: &str, charset: &str, collation: Option<&str>) -> Result<(), SqlxError> {
        if self.fail_at == Some(FailAt::Create) {
            return Err(injected("create"));
        }
        let name = unquote(name);
        if self.schemas.contains_key(&name) {
            return Err(SqlxError::Protocol(format!(
                "Can't create database '{name}'; database exists"
            )));
        }
        let mut charset = self
            .forced_charset
            .clone()
            .unwrap_or_else(|| charset.to_string());
        let mut collation = collation
            .map(str::to_string)
            .unwrap_or_else(|| format!("{charset}_general_ci"));
        if self.reports_utf8mb3 && charset == "utf8" {
            charset = "utf8mb3".to_string();
            collation = collation.replacen("utf8_", "utf8mb3_", 1);
        }
        self.schemas.insert(
            name,
            FakeSchema {
                charset,
                collation,
                tables: 0,
            },
        );
        Ok(())
    }
}

impl AdminConnection for FakeConn {
    async fn execute(&mut self, statement: &str) -> Result<(), SqlxError> {
        let mut st = self.state.lock().unwrap();
        st.executed.push(statement.to_string());
        let words: Vec<&str> = statement.split_whitespace().collect();
        match words.as_slice() {
            ["DROP", "DATABASE", "IF", "EXISTS", name] => {
                if st.fail_at == Some(FailAt::Drop) {
                    return Err(injected("drop"));
                }
                if !st.drop_races {
                    st.schemas.remove(&unquote(name));
                }
                Ok(())
            }
            ["CREATE", "DATABASE", name, "CHARACTER", "SET", charset, "COLLATE", collation] => {
                st.create(name, charset, Some(*collation))
            }
            ["CREATE", "DATABASE", name, "CHARACTER", "SET", charset] => {
                st.create(name, charset, None)
            }
            _ => Err(SqlxError::Protocol(format!("unexpected statement: {statement}"))),
        }
    }

    async fn inspect(&mut self, schema: &SchemaName) -> Result<Option<SchemaInfo>, SqlxError> {
        let st = self.state.lock().unwrap();
        if st.fail_at == Some(FailAt::Inspect) {
            return Err(injected("inspect"));
        }
        Ok(st.schemas.get(schema.as_str()).map(|s| SchemaInfo {
            charset: s.charset.clone(),
            collation: s.collation.clone(),
            table_count: s.tables,
        }))
    }

    async fn close(self) -> Result<(), SqlxError> {
        self.state.lock().unwrap().open -= 1;
        Ok(())
    }
}
