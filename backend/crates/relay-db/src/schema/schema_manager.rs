use crate::{ChannelSchema, DbError, ReconcileOutcome, Result, quote_identifier};

use relay_core::{CoreError, ErrorLocation, IdentifierKind, is_base_column, validate_identifier};

use std::collections::HashMap;
use std::panic::Location;

use log::{debug, info};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, RwLock};

/// Creates channel relations on demand and widens them when payloads carry new fields.
///
/// Column sets are cached per channel. A publish whose fields are all known
/// takes the read-locked fast path and touches no DDL. Otherwise DDL runs under
/// a single async mutex and the stored columns are re-read before every change,
/// so concurrent publishes to a new channel or with a new field each succeed.
///
/// Channel names are case-sensitive but SQLite table names are not, so a
/// channel only owns a relation whose stored name matches it exactly. A channel
/// that differs from an existing relation only by case is refused.
pub struct SchemaManager {
    pool: SqlitePool,
    known: RwLock<HashMap<String, ChannelSchema>>,
    ddl_lock: Mutex<()>,
}

impl SchemaManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            known: RwLock::new(HashMap::new()),
            ddl_lock: Mutex::new(()),
        }
    }

    /// Make sure `channel` exists with an `event` column and one column per field.
    pub async fn reconcile(&self, channel: &str, fields: &[&str]) -> Result<ReconcileOutcome> {
        validate_identifier(IdentifierKind::Channel, channel)?;
        for field in fields {
            validate_identifier(IdentifierKind::Column, field)?;
        }

        let mut required = vec!["event"];
        required.extend(fields.iter().copied().filter(|f| !is_base_column(f)));

        // Fast path: every column is already known
        {
            let known = self.known.read().await;
            if let Some(schema) = known.get(channel)
                && schema.missing(&required).is_empty()
            {
                return Ok(ReconcileOutcome::default());
            }
        }

        // Slow path: serialize DDL and work from what is actually stored
        let _guard = self.ddl_lock.lock().await;

        self.ensure_no_case_conflict(channel).await?;

        let mut outcome = ReconcileOutcome::default();

        let mut schema = match self.load_schema(channel).await? {
            Some(schema) => schema,
            None => {
                self.create_table(channel, &required[1..]).await?;
                outcome.created_table = true;
                self.load_schema(channel)
                    .await?
                    .ok_or_else(|| DbError::Initialization {
                        message: format!("Channel table {} missing after creation", channel),
                        location: ErrorLocation::from(Location::caller()),
                    })?
            }
        };

        let missing = schema.missing(&required);
        if !missing.is_empty() {
            for column in missing {
                if self.add_column(channel, column).await? {
                    outcome.added_columns.push(column.to_string());
                }
            }
            if let Some(reloaded) = self.load_schema(channel).await? {
                schema = reloaded;
            }
        }

        self.known.write().await.insert(channel.to_string(), schema);

        Ok(outcome)
    }

    /// Current column set of `channel`, or `None` when no relation exists yet
    pub async fn describe(&self, channel: &str) -> Result<Option<ChannelSchema>> {
        validate_identifier(IdentifierKind::Channel, channel)?;

        if let Some(schema) = self.known.read().await.get(channel) {
            return Ok(Some(schema.clone()));
        }

        let schema = self.load_schema(channel).await?;
        if let Some(schema) = &schema {
            self.known
                .write()
                .await
                .insert(channel.to_string(), schema.clone());
        }

        Ok(schema)
    }

    /// Re-read the column set of `channel` from storage, replacing the cached one
    pub async fn refresh(&self, channel: &str) -> Result<Option<ChannelSchema>> {
        validate_identifier(IdentifierKind::Channel, channel)?;

        let schema = self.load_schema(channel).await?;
        let mut known = self.known.write().await;
        match &schema {
            Some(schema) => known.insert(channel.to_string(), schema.clone()),
            None => known.remove(channel),
        };

        Ok(schema)
    }

    /// Stored name of the relation `channel` resolves to, compared without case
    async fn stored_table_name(&self, channel: &str) -> Result<Option<String>> {
        let name: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
        )
        .bind(channel)
        .fetch_optional(&self.pool)
        .await?;

        Ok(name)
    }

    async fn ensure_no_case_conflict(&self, channel: &str) -> Result<()> {
        match self.stored_table_name(channel).await? {
            Some(stored) if stored != channel => Err(CoreError::Validation {
                message: format!(
                    "Channel {} conflicts with existing channel {} (names differ only by case)",
                    channel, stored
                ),
                field: Some("channel".to_string()),
                location: ErrorLocation::from(Location::caller()),
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// `None` when no relation exists or the stored one belongs to a differently-cased channel
    async fn load_schema(&self, channel: &str) -> Result<Option<ChannelSchema>> {
        match self.stored_table_name(channel).await? {
            Some(stored) if stored == channel => {}
            _ => return Ok(None),
        }

        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info(?) ORDER BY cid")
                .bind(channel)
                .fetch_all(&self.pool)
                .await?;

        if columns.is_empty() {
            return Ok(None);
        }

        Ok(Some(ChannelSchema::new(channel, columns)))
    }

    async fn create_table(&self, channel: &str, fields: &[&str]) -> Result<()> {
        let mut columns = vec![
            "\"id\" INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            "\"created_at\" TEXT NOT NULL".to_string(),
            "\"event\" TEXT".to_string(),
        ];
        columns.extend(fields.iter().map(|f| format!("{} TEXT", quote_identifier(f))));

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_identifier(channel),
            columns.join(", ")
        );

        sqlx::query(&sql)
            .persistent(false)
            .execute(&self.pool)
            .await?;

        info!(
            "Created channel table {} with {} field column(s)",
            channel,
            fields.len()
        );

        Ok(())
    }

    /// Returns false when another writer added the column first
    async fn add_column(&self, channel: &str, column: &str) -> Result<bool> {
        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {} TEXT",
            quote_identifier(channel),
            quote_identifier(column)
        );

        match sqlx::query(&sql)
            .persistent(false)
            .execute(&self.pool)
            .await
        {
            Ok(_) => {
                info!("Added column {} to channel table {}", column, channel);
                Ok(true)
            }
            Err(e) if is_duplicate_column(&e) => {
                debug!("Column {} already present on {}", column, channel);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_duplicate_column(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.message().contains("duplicate column name"))
}
