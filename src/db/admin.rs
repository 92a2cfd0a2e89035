use crate::config::ConnectionParameters;
use crate::db::identifier::SchemaName;
use sqlx::Error as SqlxError;

/// What the server reports about a schema right after it was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInfo {
    pub charset: String,
    pub collation: String,
    pub table_count: i64,
}

/// Opens administrative connections: bound to the server, never to a schema,
/// so dropping the target cannot invalidate the connection's own context.
pub trait AdminConnector: Send + Sync {
    type Conn: AdminConnection;

    fn connect(
        &self,
        params: &ConnectionParameters,
    ) -> impl Future<Output = Result<Self::Conn, SqlxError>> + Send;
}

/// A live administrative connection. Must be `close`d on every exit path.
pub trait AdminConnection: Send {
    /// Run one DDL statement over the text protocol.
    fn execute(&mut self, statement: &str) -> impl Future<Output = Result<(), SqlxError>> + Send;

    /// `None` when the schema does not exist.
    fn inspect(
        &mut self,
        schema: &SchemaName,
    ) -> impl Future<Output = Result<Option<SchemaInfo>, SqlxError>> + Send;

    fn close(self) -> impl Future<Output = Result<(), SqlxError>> + Send;
}
