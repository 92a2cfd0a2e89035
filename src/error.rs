use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Terminal failure of a provisioning run. There is no local recovery for any
/// variant; the caller must treat the schema state as unknown.
#[derive(Debug, ThisError)]
pub enum ProvisionError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("cannot connect to database server {host}: {source}")]
    Connection {
        host: String,
        #[source]
        source: SqlxError,
    },

    #[error("failed to drop schema `{schema}`: {source}")]
    Drop {
        schema: String,
        #[source]
        source: SqlxError,
    },

    #[error("failed to create schema `{schema}`: {source}")]
    Create {
        schema: String,
        #[source]
        source: SqlxError,
    },

    #[error("schema `{schema}` failed post-create check: {reason}")]
    Verification { schema: String, reason: String },
}

impl ProvisionError {
    /// Stable label for the failure class, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProvisionError::Configuration(_) => "ConfigurationError",
            ProvisionError::Connection { .. } => "ConnectionError",
            ProvisionError::Drop { .. } => "DropError",
            ProvisionError::Create { .. } => "CreateError",
            ProvisionError::Verification { .. } => "VerificationError",
        }
    }

    /// Process exit status reported to calling automation. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProvisionError::Configuration(_) => 2,
            ProvisionError::Connection { .. } => 3,
            ProvisionError::Drop { .. } => 4,
            ProvisionError::Create { .. } => 5,
            ProvisionError::Verification { .. } => 6,
        }
    }
}

impl From<figment::Error> for ProvisionError {
    fn from(e: figment::Error) -> Self {
        ProvisionError::Configuration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let errors = [
            ProvisionError::Configuration("bad".into()),
            ProvisionError::Connection {
                host: "db".into(),
                source: SqlxError::PoolTimedOut,
            },
            ProvisionError::Drop {
                schema: "s".into(),
                source: SqlxError::PoolTimedOut,
            },
            ProvisionError::Create {
                schema: "s".into(),
                source: SqlxError::PoolTimedOut,
            },
            ProvisionError::Verification {
                schema: "s".into(),
                reason: "missing".into(),
            },
        ];
        let mut codes: Vec<u8> = errors.iter().map(ProvisionError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn display_carries_kind_specific_context() {
        let err = ProvisionError::Drop {
            schema: "rishta".into(),
            source: SqlxError::PoolTimedOut,
        };
        assert_eq!(err.kind(), "DropError");
        assert!(err.to_string().contains("`rishta`"));
    }
}
