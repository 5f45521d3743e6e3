//! # SQLite Store
//!
//! [`RowStore`] over a local SQLite database, for development and offline
//! use. SQL is built from the [`TableSchema`]: column names come only from
//! the schema, values are always bound.
//!
//! ## Column Encoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ColumnKind   SQLite    JSON row value                                  │
//! │  ──────────   ──────    ──────────────                                  │
//! │  Text         TEXT      "Bali"                                          │
//! │  Real         REAL      4.7                                             │
//! │  TextArray    TEXT      ["Surfing","Temples"]  (stored as JSON text)    │
//! │  Timestamp    TEXT      "2024-05-01T08:30:00.000000Z"                   │
//! │                                                                         │
//! │  Timestamps are rewritten to fixed-width UTC on the way in, so text    │
//! │  order in ORDER BY equals time order.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row as SqlxRow, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::{retain_matching, ColumnKind, Filter, Query, Row, RowStore, TableSchema};
use crate::error::{StoreError, StoreResult};
use crate::pool::{create_pool, SqliteConfig};

/// Local SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

/// A value ready to bind.
#[derive(Debug, Clone, PartialEq)]
enum Bind {
    Text(Option<String>),
    Real(Option<f64>),
    Integer(i64),
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

impl SqliteStore {
    /// Wraps an existing pool. Migrations must already be applied.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// Opens the database described by `config`, running migrations when
    /// enabled.
    pub async fn connect(config: &SqliteConfig) -> StoreResult<Self> {
        let pool = create_pool(config).await?;
        Ok(SqliteStore { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        info!("Closing SQLite store");
        self.pool.close().await;
    }

    async fn fetch_by_id(&self, table: &TableSchema, id: &str) -> StoreResult<Option<Row>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            column_list(table),
            table.name
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| decode_row(table, &r)).transpose()
    }
}

fn column_list(table: &TableSchema) -> String {
    table
        .columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn bind_all<'q>(mut query: SqliteQuery<'q>, binds: Vec<Bind>) -> SqliteQuery<'q> {
    for value in binds {
        query = match value {
            Bind::Text(v) => query.bind(v),
            Bind::Real(v) => query.bind(v),
            Bind::Integer(v) => query.bind(v),
        };
    }
    query
}

// =============================================================================
// Encoding
// =============================================================================

/// Rewrites an RFC 3339 instant as UTC with microsecond precision.
pub(crate) fn normalize_timestamp(raw: &str) -> StoreResult<String> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| StoreError::Decode(format!("invalid timestamp '{}': {}", raw, e)))?;
    Ok(format_timestamp(parsed.with_timezone(&Utc)))
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Converts a JSON row value to a bind value for a column.
fn encode_value(table: &TableSchema, column: &str, value: Value) -> StoreResult<Bind> {
    let kind = table.column(column)?.kind;
    let mismatch = |value: &Value| {
        StoreError::Decode(format!(
            "{}.{} cannot store {}",
            table.name, column, value
        ))
    };

    let bind = match (kind, value) {
        (ColumnKind::Real, Value::Null) => Bind::Real(None),
        (ColumnKind::Real, Value::Number(n)) => Bind::Real(n.as_f64()),
        (ColumnKind::Timestamp, Value::String(s)) => Bind::Text(Some(normalize_timestamp(&s)?)),
        (ColumnKind::TextArray, array @ Value::Array(_)) => {
            Bind::Text(Some(serde_json::to_string(&array)?))
        }
        (ColumnKind::Text, Value::String(s)) => Bind::Text(Some(s)),
        (_, Value::Null) => Bind::Text(None),
        (_, other) => return Err(mismatch(&other)),
    };
    Ok(bind)
}

/// Reads one SQLite row back into a JSON row.
fn decode_row(table: &TableSchema, row: &SqliteRow) -> StoreResult<Row> {
    let mut out = Row::new();

    for column in table.columns {
        let value = match column.kind {
            ColumnKind::Real => row
                .try_get::<Option<f64>, _>(column.name)?
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnKind::TextArray => match row.try_get::<Option<String>, _>(column.name)? {
                Some(text) => serde_json::from_str(&text)?,
                None => Value::Null,
            },
            ColumnKind::Text | ColumnKind::Timestamp => row
                .try_get::<Option<String>, _>(column.name)?
                .map(Value::String)
                .unwrap_or(Value::Null),
        };
        out.insert(column.name.to_string(), value);
    }

    Ok(out)
}

/// Builds the WHERE / ORDER BY / LIMIT tail of a select.
///
/// Only equality filters become SQL. SQLite's `lower()` folds ASCII only,
/// so substring filters run on decoded rows in [`retain_matching`], and the
/// limit moves there with them.
fn select_clauses(table: &TableSchema, query: &Query) -> StoreResult<(String, Vec<Bind>)> {
    let mut sql = String::new();
    let mut binds = Vec::new();
    let mut conditions = Vec::new();
    let mut filters_in_rust = false;

    for filter in &query.filters {
        match filter {
            Filter::Eq { column, value } => {
                table.column(column)?;
                conditions.push(format!("{} = ?", column));
                binds.push(encode_value(table, column, Value::String(value.clone()))?);
            }
            Filter::Contains { column, .. } => {
                table.column(column)?;
                filters_in_rust = true;
            }
        }
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    let mut keys = Vec::new();
    for order in &query.order {
        table.column(&order.column)?;
        keys.push(format!(
            "{} {}",
            order.column,
            if order.descending { "DESC" } else { "ASC" }
        ));
    }
    // Insertion order breaks remaining ties.
    keys.push("rowid ASC".to_string());
    sql.push_str(" ORDER BY ");
    sql.push_str(&keys.join(", "));

    if let (Some(limit), false) = (query.limit, filters_in_rust) {
        sql.push_str(" LIMIT ?");
        binds.push(Bind::Integer(i64::from(limit)));
    }

    Ok((sql, binds))
}

// =============================================================================
// RowStore
// =============================================================================

#[async_trait]
impl RowStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn select(&self, table: &TableSchema, query: &Query) -> StoreResult<Vec<Row>> {
        let (tail, binds) = select_clauses(table, query)?;
        let sql = format!("SELECT {} FROM {}{}", column_list(table), table.name, tail);
        debug!(sql = %sql, "SQLite select");

        let rows = bind_all(sqlx::query(&sql), binds)
            .fetch_all(&self.pool)
            .await?;

        let mut rows = rows
            .iter()
            .map(|r| decode_row(table, r))
            .collect::<StoreResult<Vec<Row>>>()?;
        retain_matching(&mut rows, query);
        Ok(rows)
    }

    async fn insert(&self, table: &TableSchema, mut row: Row) -> StoreResult<Row> {
        let id = match row.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                row.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };
        if table.column("created_at").is_ok() && !row.contains_key("created_at") {
            row.insert(
                "created_at".to_string(),
                Value::String(format_timestamp(Utc::now())),
            );
        }

        let mut columns = Vec::with_capacity(row.len());
        let mut binds = Vec::with_capacity(row.len());
        for (column, value) in row {
            binds.push(encode_value(table, &column, value)?);
            columns.push(column);
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            columns.join(", "),
            placeholders
        );

        bind_all(sqlx::query(&sql), binds)
            .execute(&self.pool)
            .await?;

        self.fetch_by_id(table, &id)
            .await?
            .ok_or_else(|| StoreError::not_found(table.entity, id))
    }

    async fn update(&self, table: &TableSchema, id: &str, changes: Row) -> StoreResult<Row> {
        let mut assignments = Vec::with_capacity(changes.len());
        let mut binds = Vec::with_capacity(changes.len() + 1);
        for (column, value) in changes {
            binds.push(encode_value(table, &column, value)?);
            assignments.push(format!("{} = ?", column));
        }
        binds.push(Bind::Text(Some(id.to_string())));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            table.name,
            assignments.join(", ")
        );

        let result = bind_all(sqlx::query(&sql), binds)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(table.entity, id));
        }

        self.fetch_by_id(table, id)
            .await?
            .ok_or_else(|| StoreError::not_found(table.entity, id))
    }

    async fn delete(&self, table: &TableSchema, id: &str) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table.name);
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        debug!(table = table.name, id = %id, rows = result.rows_affected(), "SQLite delete");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Table, DESTINATIONS, INQUIRIES};
    use chrono::TimeZone;
    use wanderlust_core::catalogue::sample_destinations;
    use wanderlust_core::rows::{
        DestinationInsert, DestinationPatchRow, DestinationRow, InquiryInsert, InquiryRow,
    };
    use wanderlust_core::{DestinationPatch, NewDestination, NewInquiry};

    async fn setup_store() -> SqliteStore {
        SqliteStore::connect(&SqliteConfig::in_memory())
            .await
            .expect("Failed to create test store")
    }

    async fn seed(store: &SqliteStore) -> Vec<DestinationRow> {
        let table = Table::new(store, &DESTINATIONS);
        let mut rows = Vec::new();
        for destination in sample_destinations() {
            let insert = DestinationInsert::from(&NewDestination::from(destination));
            rows.push(table.insert(&insert).await.unwrap());
        }
        rows
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(
            normalize_timestamp("2024-05-01T10:30:00+02:00").unwrap(),
            "2024-05-01T08:30:00.000000Z"
        );
        assert!(normalize_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_select_clauses() {
        let query = Query::all()
            .eq("continent", "Asia")
            .order_desc("rating")
            .limit(2);
        let (sql, binds) = select_clauses(&DESTINATIONS, &query).unwrap();

        assert_eq!(sql, " WHERE continent = ? ORDER BY rating DESC, rowid ASC LIMIT ?");
        assert_eq!(
            binds,
            vec![Bind::Text(Some("Asia".to_string())), Bind::Integer(2)]
        );
    }

    #[test]
    fn test_select_clauses_leave_substring_filters_to_rust() {
        let query = Query::all()
            .contains("country", "ind")
            .order_desc("rating")
            .limit(2);
        let (sql, binds) = select_clauses(&DESTINATIONS, &query).unwrap();

        assert_eq!(sql, " ORDER BY rating DESC, rowid ASC");
        assert!(binds.is_empty());

        let unknown = Query::all().contains("planet", "earth");
        assert!(select_clauses(&DESTINATIONS, &unknown).is_err());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let store = setup_store().await;
        let rows = seed(&store).await;

        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| !r.id.is_empty() && r.created_at.is_some()));
        assert_eq!(rows[0].activities.len(), 4);
    }

    #[tokio::test]
    async fn test_select_by_id_and_not_found() {
        let store = setup_store().await;
        let rows = seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        let tokyo: DestinationRow = table.select_by_id(&rows[3].id).await.unwrap();
        assert_eq!(tokyo.name, "Tokyo");

        let missing = table.select_by_id::<DestinationRow>("nope").await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_contains_is_case_insensitive_and_literal() {
        let store = setup_store().await;
        seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        let rows: Vec<DestinationRow> = table.select_matching("country", "JAP").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Tokyo");

        let rows: Vec<DestinationRow> = table.select_matching("country", "%").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_contains_folds_non_ascii_case() {
        let store = setup_store().await;
        seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        let mut abidjan = NewDestination::from(sample_destinations().remove(4));
        abidjan.name = "Abidjan".to_string();
        abidjan.country = "Côte d'Ivoire".to_string();
        abidjan.continent = "Africa".to_string();
        let _: DestinationRow = table
            .insert(&DestinationInsert::from(&abidjan))
            .await
            .unwrap();

        for needle in ["côte", "CÔTE", "Côte D'IVOIRE"] {
            let rows: Vec<DestinationRow> = table.select_matching("country", needle).await.unwrap();
            assert_eq!(rows.len(), 1, "needle {:?}", needle);
            assert_eq!(rows[0].name, "Abidjan");
        }
    }

    #[tokio::test]
    async fn test_contains_limit_applies_after_filtering() {
        let store = setup_store().await;
        seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        let query = Query::all()
            .contains("continent", "AS")
            .order_desc("rating")
            .limit(1);
        let rows: Vec<DestinationRow> = table.select(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Tokyo");

        let query = Query::all().contains("continent", "asia").limit(5);
        let rows: Vec<DestinationRow> = table.select(&query).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bali", "Tokyo"]);
    }

    #[tokio::test]
    async fn test_update_and_missing_update() {
        let store = setup_store().await;
        let rows = seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        let patch = DestinationPatchRow::from(
            &DestinationPatch::default()
                .price(0.0)
                .activities(vec!["Snorkeling".to_string()]),
        );
        let updated: DestinationRow = table.update(&rows[0].id, &patch).await.unwrap();
        assert_eq!(updated.price, 0.0);
        assert_eq!(updated.activities, vec!["Snorkeling".to_string()]);
        assert_eq!(updated.name, "Bali");

        let err = table
            .update::<_, DestinationRow>("ghost", &patch)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_id_change() {
        let store = setup_store().await;
        let rows = seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        let patch = serde_json::json!({ "id": "new-id" });
        let err = table
            .update::<_, DestinationRow>(&rows[0].id, &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableColumn { .. }));
    }

    #[tokio::test]
    async fn test_explicit_created_at_orders_newest_first() {
        let store = setup_store().await;
        let table = Table::new(&store, &INQUIRIES);

        for (day, name) in [(1, "first"), (3, "third"), (2, "second")] {
            let insert = InquiryInsert::from(&NewInquiry::new(
                name,
                "ada@example.com",
                "Paris",
                "Hello there, travel please",
            ))
            .created_at(Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap());
            let _: InquiryRow = table.insert(&insert).await.unwrap();
        }

        let rows: Vec<InquiryRow> = table.select_top("created_at", 10).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_is_silent_for_missing_rows() {
        let store = setup_store().await;
        let rows = seed(&store).await;
        let table = Table::new(&store, &DESTINATIONS);

        table.delete(&rows[0].id).await.unwrap();
        table.delete(&rows[0].id).await.unwrap();

        let remaining: Vec<DestinationRow> = table.select_all().await.unwrap();
        assert_eq!(remaining.len(), 5);
        assert!(store.health_check().await);
    }
}
