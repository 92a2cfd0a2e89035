//! Statement text for the reset sequence.
//! Identifiers are only accepted as validated types and are always backtick-quoted.

use crate::db::identifier::{Charset, Collation, SchemaName};

/// Succeeds whether or not the schema exists.
pub fn drop_database(schema: &SchemaName) -> String {
    format!("DROP DATABASE IF EXISTS {}", schema.quoted())
}

/// No `IF NOT EXISTS`: a schema that survived the drop must fail loudly.
/// Without a collation the server applies the charset's default.
pub fn create_database(
    schema: &SchemaName,
    charset: &Charset,
    collation: Option<&Collation>,
) -> String {
    let mut stmt = format!(
        "CREATE DATABASE {} CHARACTER SET {}",
        schema.quoted(),
        charset.as_str()
    );
    if let Some(collation) = collation {
        stmt.push_str(" COLLATE ");
        stmt.push_str(collation.as_str());
    }
    stmt
}

/// Charset, collation and table count for one schema. Binds the schema name twice.
pub const INSPECT_SCHEMA: &str = r#"
SELECT CAST(s.DEFAULT_CHARACTER_SET_NAME AS CHAR) AS charset,
       CAST(s.DEFAULT_COLLATION_NAME AS CHAR) AS collation,
       (SELECT COUNT(*) FROM information_schema.TABLES t WHERE t.TABLE_SCHEMA = ?) AS table_count
FROM information_schema.SCHEMATA s
WHERE s.SCHEMA_NAME = ?
"#;
