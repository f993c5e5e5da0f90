/// A parameterized search statement.
///
/// `sql` only ever contains quoted, validated identifiers and `?` placeholders;
/// every filter value travels in `params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelQuery {
    pub sql: String,
    pub params: Vec<Option<String>>,
}
