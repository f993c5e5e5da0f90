use crate::{ChannelQuery, quote_identifier};

use relay_core::{
    Filter, FilterOp, IdentifierKind, Result as CoreErrorResult, to_column_text,
    validate_identifier,
};

use serde_json::Value;

/// Rows returned by a search when no limit is configured
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// Build the search statement for `channel`.
///
/// Filters are ANDed; results come back newest first, at most `limit` rows.
pub fn build_query(channel: &str, filters: &[Filter], limit: u32) -> CoreErrorResult<ChannelQuery> {
    validate_identifier(IdentifierKind::Channel, channel)?;

    let mut clauses = Vec::with_capacity(filters.len());
    let mut params = Vec::with_capacity(filters.len());

    for filter in filters {
        let op = filter.validate()?;
        let column = quote_identifier(&filter.field);

        if filter.value.is_null() {
            let test = match op {
                FilterOp::Ne => "IS NOT NULL",
                _ => "IS NULL",
            };
            clauses.push(format!("{} {}", column, test));
            continue;
        }

        let clause = match op {
            FilterOp::Eq => format!("{} = ?", column),
            FilterOp::Like => format!("{} LIKE ?", column),
            FilterOp::ILike => format!("LOWER({}) LIKE LOWER(?)", column),
            other => format!("{} {} ?", column, other.as_str()),
        };
        clauses.push(clause);
        params.push(bind_value(&filter.value));
    }

    let mut sql = format!("SELECT * FROM {}", quote_identifier(channel));
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(&format!(" ORDER BY \"id\" DESC LIMIT {}", limit));

    Ok(ChannelQuery { sql, params })
}

fn bind_value(value: &Value) -> Option<String> {
    to_column_text(value)
}
