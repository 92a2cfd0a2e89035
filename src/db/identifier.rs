//! Allow-list validation for values that end up in identifier position.
//!
//! MySQL cannot bind identifiers as statement parameters, so every name that
//! is spliced into DDL text must pass through one of these types first.

use crate::error::ProvisionError;
use std::fmt;

/// MySQL's identifier length limit.
const MAX_IDENT_LEN: usize = 64;

/// Schemas owned by the server itself; never a valid reset target.
const SYSTEM_SCHEMAS: [&str; 4] = ["mysql", "information_schema", "performance_schema", "sys"];

/// A schema name that is safe to quote into `DROP`/`CREATE DATABASE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName(String);

impl SchemaName {
    pub fn parse(raw: &str) -> Result<Self, ProvisionError> {
        check_charset(raw, "schema name", |c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '$'
        })?;
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProvisionError::Configuration(format!(
                "schema name {raw:?} must not consist only of digits"
            )));
        }
        if SYSTEM_SCHEMAS.iter().any(|s| s.eq_ignore_ascii_case(raw)) {
            return Err(ProvisionError::Configuration(format!(
                "refusing to reset system schema {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick-quoted form for statement text.
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset(String);

impl Charset {
    pub fn parse(raw: &str) -> Result<Self, ProvisionError> {
        check_charset(raw, "charset", is_word_char)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the server may report this charset under `reported`.
    /// MySQL 8.0.30+ reports the `utf8` alias as `utf8mb3`.
    pub fn matches_reported(&self, reported: &str) -> bool {
        canonical_charset(&self.0) == canonical_charset(reported)
    }
}

/// A collation, checked to belong to its charset (`utf8mb4_unicode_ci` for `utf8mb4`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collation(String);

impl Collation {
    pub fn parse(raw: &str, charset: &Charset) -> Result<Self, ProvisionError> {
        check_charset(raw, "collation", is_word_char)?;
        let prefix = format!("{}_", charset.as_str());
        let matches_charset = raw.len() > prefix.len()
            && raw[..prefix.len()].eq_ignore_ascii_case(&prefix);
        if !matches_charset {
            return Err(ProvisionError::Configuration(format!(
                "collation {raw:?} does not belong to charset {:?}",
                charset.as_str()
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Alias-aware comparison, e.g. `utf8_general_ci` against `utf8mb3_general_ci`.
    pub fn matches_reported(&self, reported: &str) -> bool {
        canonical_collation(&self.0) == canonical_collation(reported)
    }
}

fn canonical_charset(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower == "utf8" {
        "utf8mb3".to_string()
    } else {
        lower
    }
}

fn canonical_collation(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.strip_prefix("utf8_") {
        Some(rest) => format!("utf8mb3_{rest}"),
        None => lower,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn check_charset(
    raw: &str,
    what: &str,
    allowed: impl Fn(char) -> bool,
) -> Result<(), ProvisionError> {
    if raw.is_empty() {
        return Err(ProvisionError::Configuration(format!("{what} is empty")));
    }
    if raw.len() > MAX_IDENT_LEN {
        return Err(ProvisionError::Configuration(format!(
            "{what} exceeds {MAX_IDENT_LEN} characters"
        )));
    }
    if let Some(bad) = raw.chars().find(|c| !allowed(*c)) {
        return Err(ProvisionError::Configuration(format!(
            "{what} {raw:?} contains disallowed character {bad:?}"
        )));
    }
    Ok(())
}
