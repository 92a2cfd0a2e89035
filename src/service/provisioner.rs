use crate::config::ConnectionParameters;
use crate::db::admin::{AdminConnection, AdminConnector, SchemaInfo};
use crate::db::identifier::{Charset, Collation, SchemaName};
use crate::db::statements;
use crate::error::ProvisionError;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Validated targets and the exact statements a run will issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub schema: SchemaName,
    pub charset: Charset,
    pub collation: Option<Collation>,
    pub drop_statement: String,
    pub create_statement: String,
}

impl ProvisionPlan {
    /// Validate every identifier-position value and build the statements.
    /// Pure; nothing is sent anywhere.
    pub fn from_params(params: &ConnectionParameters) -> Result<Self, ProvisionError> {
        let schema = SchemaName::parse(&params.name)?;
        let charset = Charset::parse(&params.charset)?;
        let collation = params
            .collation
            .as_deref()
            .map(|raw| Collation::parse(raw, &charset))
            .transpose()?;
        Ok(Self {
            drop_statement: statements::drop_database(&schema),
            create_statement: statements::create_database(&schema, &charset, collation.as_ref()),
            schema,
            charset,
            collation,
        })
    }

    pub fn statements(&self) -> [&str; 2] {
        [&self.drop_statement, &self.create_statement]
    }
}

/// Outcome of a successful run, as read back from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub host: String,
    pub schema: String,
    pub charset: String,
    pub collation: String,
    pub table_count: u64,
    pub elapsed_ms: u64,
}

/// Brings a named schema from any prior state to existing-and-empty.
///
/// **Destructive:** every run irreversibly deletes all contents of the target
/// schema. Callers own confirmation, retries and timeouts.
pub struct Provisioner<C> {
    connector: C,
}

impl<C: AdminConnector> Provisioner<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Drop and recreate `params.name` with the configured charset/collation.
    ///
    /// Identifiers are validated before a connection is attempted. Once
    /// connected, the connection is closed on success and on every failure.
    /// Drop and create are not transactional; an interrupted run may leave
    /// the schema absent, and re-running converges.
    pub async fn run(&self, params: &ConnectionParameters) -> Result<ProvisionReport, ProvisionError> {
        let started = Instant::now();
        let plan = ProvisionPlan::from_params(params)?;
        let host = format!("{}:{}", params.host, params.port);

        info!(
            host = %host,
            user = %params.user,
            schema = %plan.schema,
            "connecting to database server"
        );
        let mut conn = self
            .connector
            .connect(params)
            .await
            .map_err(|source| ProvisionError::Connection {
                host: host.clone(),
                source,
            })?;

        let outcome = reset(&mut conn, &plan).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "administrative connection did not close cleanly");
        }

        let info = outcome?;
        info!(
            schema = %plan.schema,
            charset = %info.charset,
            collation = %info.collation,
            "schema recreated empty"
        );
        Ok(ProvisionReport {
            host,
            schema: plan.schema.to_string(),
            charset: info.charset,
            collation: info.collation,
            table_count: u64::try_from(info.table_count).unwrap_or_default(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }
}

async fn reset<A: AdminConnection>(
    conn: &mut A,
    plan: &ProvisionPlan,
) -> Result<SchemaInfo, ProvisionError> {
    warn!(schema = %plan.schema, "dropping schema; all existing contents will be destroyed");
    conn.execute(&plan.drop_statement)
        .await
        .map_err(|source| ProvisionError::Drop {
            schema: plan.schema.to_string(),
            source,
        })?;

    conn.execute(&plan.create_statement)
        .await
        .map_err(|source| ProvisionError::Create {
            schema: plan.schema.to_string(),
            source,
        })?;

    let verification = |reason: String| ProvisionError::Verification {
        schema: plan.schema.to_string(),
        reason,
    };
    let info = conn
        .inspect(&plan.schema)
        .await
        .map_err(|e| verification(format!("inspection query failed: {e}")))?
        .ok_or_else(|| verification("schema not found after create".to_string()))?;

    if !plan.charset.matches_reported(&info.charset) {
        return Err(verification(format!(
            "charset is {} instead of {}",
            info.charset,
            plan.charset.as_str()
        )));
    }
    if let Some(collation) = &plan.collation
        && !collation.matches_reported(&info.collation)
    {
        return Err(verification(format!(
            "collation is {} instead of {}",
            info.collation,
            collation.as_str()
        )));
    }
    if info.table_count != 0 {
        return Err(verification(format!(
            "{} table(s) present after create",
            info.table_count
        )));
    }
    Ok(info)
}
