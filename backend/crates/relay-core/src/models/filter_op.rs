use crate::{CoreError, ErrorLocation};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

/// Comparison operators accepted in retrieval filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
    ILike,
}

impl FilterOp {
    pub const ALL: [FilterOp; 8] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::Like,
        Self::ILike,
    ];

    /// Wire spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Like => "like",
            Self::ILike => "ilike",
        }
    }

    /// Pattern operators compare text, never null
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }
}

impl FromStr for FilterOp {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CoreError::InvalidOperator {
                op: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
