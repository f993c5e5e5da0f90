//! Identifier safety check shared by channel names, column names and filter fields.
//!
//! Channel and field names arrive from producers and end up quoted inside DDL and
//! query text, so they must pass this check before any SQL is assembled. There is
//! no sanitising fallback: a name either passes as-is or the request is rejected.

use crate::{CoreError, ErrorLocation, Result as CoreErrorResult};

use std::fmt;
use std::panic::Location;

/// Longest identifier accepted (matches the common 63-byte limit of SQL engines)
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

const RESERVED_PREFIX: &str = "sqlite_";

/// What an identifier names; only used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Channel,
    Column,
    FilterField,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Channel => "channel",
            Self::Column => "column",
            Self::FilterField => "filter field",
        };
        f.write_str(label)
    }
}

/// Validate `name` as a storage identifier.
///
/// Accepted: an ASCII letter or `_`, followed by up to 62 ASCII letters, digits,
/// `_` or `-`. Names starting with `sqlite_` are reserved by the storage engine.
#[track_caller]
pub fn validate_identifier(kind: IdentifierKind, name: &str) -> CoreErrorResult<()> {
    let caller = Location::caller();
    let reject = |reason: &'static str| CoreError::UnsafeIdentifier {
        kind,
        name: name.to_string(),
        reason,
        location: ErrorLocation::from(caller),
    };

    let mut chars = name.chars();
    let first = chars.next().ok_or_else(|| reject("empty"))?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(reject("too long"));
    }

    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(reject("must start with a letter or underscore"));
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(reject("only letters, digits, '_' and '-' are allowed"));
    }

    if name
        .get(..RESERVED_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RESERVED_PREFIX))
    {
        return Err(reject("reserved prefix"));
    }

    Ok(())
}
