use crate::{
    ChannelRow, ChannelSchema, ChannelStore, DbError, PersistOutcome, Result, SchemaManager,
    StoreOptions, build_query, decode_row, open_pool, quote_identifier,
};

use relay_core::{CoreError, ErrorLocation, Filter, Notification, to_column_text};

use std::panic::Location;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::SqlitePool;

/// SQLite-backed store: one relation per channel, one text column per payload field.
pub struct SqliteStore {
    pool: SqlitePool,
    schema: SchemaManager,
    search_limit: u32,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, search_limit: u32) -> Self {
        Self {
            schema: SchemaManager::new(pool.clone()),
            pool,
            search_limit,
        }
    }

    pub async fn connect(options: &StoreOptions, search_limit: u32) -> Result<Self> {
        let pool = open_pool(options).await?;
        Ok(Self::new(pool, search_limit))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn schema(&self) -> &SchemaManager {
        &self.schema
    }

    pub fn search_limit(&self) -> u32 {
        self.search_limit
    }
}

#[async_trait]
impl ChannelStore for SqliteStore {
    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn persist(&self, notification: &Notification) -> Result<PersistOutcome> {
        notification.validate()?;

        if notification.event.is_empty() {
            return Err(CoreError::Validation {
                message: "Event is required for persistence".to_string(),
                field: Some("event".to_string()),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        }

        let fields: Vec<(&str, Option<String>)> = notification
            .data_fields()
            .map(|(name, value)| (name.as_str(), to_column_text(value)))
            .collect();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();

        let reconciled = self.schema.reconcile(&notification.channel, &names).await?;

        let mut columns = vec![quote_identifier("created_at"), quote_identifier("event")];
        columns.extend(names.iter().map(|name| quote_identifier(name)));
        let placeholders = vec!["?"; columns.len()].join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(&notification.channel),
            columns.join(", "),
            placeholders
        );

        let mut query = sqlx::query(&sql)
            .persistent(false)
            .bind(Utc::now().to_rfc3339())
            .bind(notification.event.as_str());
        for (_, value) in fields {
            query = query.bind(value);
        }

        let row_id = query.execute(&self.pool).await?.last_insert_rowid();

        debug!(
            "Persisted {} event {} as row {}",
            notification.channel, notification.event, row_id
        );

        Ok(PersistOutcome::Stored {
            row_id,
            added_columns: reconciled.added_columns,
        })
    }

    async fn search(&self, channel: &str, filters: &[Filter]) -> Result<Vec<ChannelRow>> {
        let query = build_query(channel, filters, self.search_limit)?;

        let Some(mut schema) = self.schema.describe(channel).await? else {
            return Ok(Vec::new());
        };

        // Another writer may have widened the relation since it was cached
        if filters.iter().any(|f| !schema.has_column(&f.field))
            && let Some(fresh) = self.schema.refresh(channel).await?
        {
            schema = fresh;
        }

        if let Some(unknown) = filters.iter().find(|f| !schema.has_column(&f.field)) {
            return Err(DbError::UnknownField {
                channel: channel.to_string(),
                field: unknown.field.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut statement = sqlx::query(&query.sql).persistent(false);
        for param in &query.params {
            statement = statement.bind(param.as_deref());
        }

        let rows = statement.fetch_all(&self.pool).await?;

        Ok(rows.iter().map(decode_row).collect())
    }

    async fn describe(&self, channel: &str) -> Result<Option<ChannelSchema>> {
        self.schema.describe(channel).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Event store closed");
    }
}
