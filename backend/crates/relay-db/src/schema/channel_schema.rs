use relay_core::is_base_column;

/// Quote an identifier for interpolation into SQL text.
///
/// Only call with names that passed `relay_core::validate_identifier`; those
/// cannot contain a double quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Column set of one channel relation as currently stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSchema {
    pub channel: String,
    /// Column names in table order (`id`, `created_at`, `event`, then payload fields)
    pub columns: Vec<String>,
}

impl ChannelSchema {
    pub fn new(channel: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            channel: channel.into(),
            columns,
        }
    }

    /// Case-insensitive, like SQLite identifiers
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Columns holding payload fields
    pub fn data_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !is_base_column(c))
    }

    /// Columns from `required` this relation lacks, in the order given
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }
}

/// What a reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub created_table: bool,
    pub added_columns: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_unchanged(&self) -> bool {
        !self.created_table && self.added_columns.is_empty()
    }
}
