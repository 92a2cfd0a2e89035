use crate::config::ConnectionParameters;
use crate::db::admin::{AdminConnection, AdminConnector, SchemaInfo};
use crate::db::identifier::SchemaName;
use crate::db::statements::INSPECT_SCHEMA;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Error as SqlxError, Row};
use tracing::debug;

/// Connects to a MySQL/MariaDB server with no default database selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    fn connect_options(params: &ConnectionParameters) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
    }
}

impl AdminConnector for MySqlConnector {
    type Conn = MySqlAdmin;

    async fn connect(&self, params: &ConnectionParameters) -> Result<MySqlAdmin, SqlxError> {
        let conn = MySqlConnection::connect_with(&Self::connect_options(params)).await?;
        debug!(host = %params.host, port = params.port, "administrative connection opened");
        Ok(MySqlAdmin { conn })
    }
}

pub struct MySqlAdmin {
    conn: MySqlConnection,
}

impl AdminConnection for MySqlAdmin {
    async fn execute(&mut self, statement: &str) -> Result<(), SqlxError> {
        debug!(statement, "executing");
        sqlx::Executor::execute(&mut self.conn, sqlx::raw_sql(statement)).await?;
        Ok(())
    }

    async fn inspect(&mut self, schema: &SchemaName) -> Result<Option<SchemaInfo>, SqlxError> {
        let row = sqlx::query(INSPECT_SCHEMA)
            .bind(schema.as_str())
            .bind(schema.as_str())
            .fetch_optional(&mut self.conn)
            .await?;
        row.map(row_to_info).transpose()
    }

    async fn close(self) -> Result<(), SqlxError> {
        self.conn.close().await?;
        debug!("administrative connection closed");
        Ok(())
    }
}

fn row_to_info(row: MySqlRow) -> Result<SchemaInfo, SqlxError> {
    Ok(SchemaInfo {
        charset: row.try_get("charset")?,
        collation: row.try_get("collation")?,
        table_count: row.try_get("table_count")?,
    })
}
