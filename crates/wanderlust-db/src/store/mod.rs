//! # Data Access Client
//!
//! Table-scoped reads and writes over whichever store backs the site.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Data Access Client                               │
//! │                                                                         │
//! │  Repository (destination.rs / inquiry.rs)                              │
//! │       │  typed records: DestinationRow, InquiryInsert, ...             │
//! │       ▼                                                                 │
//! │  Table<'_>  ← THIS MODULE: serde <-> Row, schema checks, logging       │
//! │       │  untyped rows: serde_json::Map                                 │
//! │       ▼                                                                 │
//! │  dyn RowStore                                                          │
//! │       ├── RestStore    (rest.rs)    hosted store, HTTP                 │
//! │       └── SqliteStore  (sqlite.rs)  local file, sqlx                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows cross the [`RowStore`] boundary as JSON objects keyed by snake_case
//! column names, exactly as the hosted store returns them. Each backend is
//! responsible for assigning `id` and `created_at` on insert when the row
//! does not carry them.

pub mod rest;
pub mod sqlite;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// One row as the store sees it: column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

// =============================================================================
// Table Schemas
// =============================================================================

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Real,
    /// Ordered list of strings.
    TextArray,
    /// UTC instant.
    Timestamp,
}

/// A column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn column(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

/// A table the client can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name in the store.
    pub name: &'static str,

    /// Label used in not-found errors (e.g., "Destination").
    pub entity: &'static str,

    /// Every column, `id` first.
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> StoreResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.name.to_string(),
                column: name.to_string(),
            })
    }

    /// Checks that every key of `row` is a column of this table.
    pub fn check_row(&self, row: &Row) -> StoreResult<()> {
        for key in row.keys() {
            self.column(key)?;
        }
        Ok(())
    }

    fn not_found(&self, id: &str) -> StoreError {
        StoreError::not_found(self.entity, id)
    }
}

/// The `destinations` table.
pub static DESTINATIONS: TableSchema = TableSchema {
    name: "destinations",
    entity: "Destination",
    columns: &[
        column("id", ColumnKind::Text),
        column("name", ColumnKind::Text),
        column("country", ColumnKind::Text),
        column("description", ColumnKind::Text),
        column("short_description", ColumnKind::Text),
        column("image_url", ColumnKind::Text),
        column("rating", ColumnKind::Real),
        column("activities", ColumnKind::TextArray),
        column("price", ColumnKind::Real),
        column("currency", ColumnKind::Text),
        column("continent", ColumnKind::Text),
        column("created_at", ColumnKind::Timestamp),
    ],
};

/// The `inquiries` table.
pub static INQUIRIES: TableSchema = TableSchema {
    name: "inquiries",
    entity: "Inquiry",
    columns: &[
        column("id", ColumnKind::Text),
        column("name", ColumnKind::Text),
        column("email", ColumnKind::Text),
        column("destination", ColumnKind::Text),
        column("message", ColumnKind::Text),
        column("created_at", ColumnKind::Timestamp),
    ],
};

// =============================================================================
// Queries
// =============================================================================

/// A row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: String },

    /// Case-insensitive substring match. `text` is matched literally.
    Contains { column: String, text: String },
}

impl Filter {
    /// Returns the filtered column.
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::Contains { column, .. } => column,
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// A select: filters (all must hold), sort keys in priority order, limit.
///
/// ## Example
/// ```rust
/// use wanderlust_db::store::Query;
///
/// let query = Query::all()
///     .order_desc("rating")
///     .order_asc("created_at")
///     .limit(3);
/// assert_eq!(query.limit, Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<u32>,
}

impl Query {
    /// Every row, store order.
    pub fn all() -> Self {
        Query::default()
    }

    /// Adds an equality filter on `column`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a case-insensitive substring filter on `column`.
    pub fn contains(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.filters.push(Filter::Contains {
            column: column.into(),
            text: text.into(),
        });
        self
    }

    /// Appends a descending sort key.
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(Order {
            column: column.into(),
            descending: true,
        });
        self
    }

    /// Appends an ascending sort key.
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order.push(Order {
            column: column.into(),
            descending: false,
        });
        self
    }

    /// Sets the maximum number of rows returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks every referenced column against the table.
    pub fn check(&self, table: &TableSchema) -> StoreResult<()> {
        for filter in &self.filters {
            table.column(filter.column())?;
        }
        for order in &self.order {
            table.column(&order.column)?;
        }
        Ok(())
    }
}

/// Escapes `%`, `_` and `\` so a needle matches literally inside a LIKE
/// pattern that uses `\` as its escape character.
///
/// `*` passes through unchanged. The REST dialect reads `*` as `%` in
/// `like`/`ilike` values and has no escape for it, so [`RestStore`] widens
/// it to `_` and re-checks the returned rows.
pub fn like_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Applies the substring filters of `query` to decoded rows, then its limit.
///
/// Matching folds case with [`str::to_lowercase`], so `CÔTE` finds
/// `Côte d'Ivoire`. Filter text is always literal.
pub(crate) fn retain_matching(rows: &mut Vec<Row>, query: &Query) {
    let needles: Vec<(&str, String)> = query
        .filters
        .iter()
        .filter_map(|filter| match filter {
            Filter::Contains { column, text } => Some((column.as_str(), text.to_lowercase())),
            Filter::Eq { .. } => None,
        })
        .collect();
    if needles.is_empty() {
        return;
    }

    rows.retain(|row| {
        needles.iter().all(|(column, needle)| {
            row.get(*column)
                .and_then(Value::as_str)
                .map_or(false, |value| value.to_lowercase().contains(needle.as_str()))
        })
    });
    if let Some(limit) = query.limit {
        rows.truncate(limit as usize);
    }
}

// =============================================================================
// RowStore Trait
// =============================================================================

/// A backend that stores rows.
///
/// Implementations map their own failures onto [`StoreError`]. Zero rows
/// matched by `update` is [`StoreError::NotFound`]; zero rows matched by
/// `delete` is success.
#[async_trait]
pub trait RowStore: Send + Sync + Debug {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn select(&self, table: &TableSchema, query: &Query) -> StoreResult<Vec<Row>>;

    /// Inserts one row and returns it as stored.
    async fn insert(&self, table: &TableSchema, row: Row) -> StoreResult<Row>;

    /// Applies `changes` to the row with `id` and returns it as stored.
    /// `changes` is never empty and never contains `id`.
    async fn update(&self, table: &TableSchema, id: &str, changes: Row) -> StoreResult<Row>;

    async fn delete(&self, table: &TableSchema, id: &str) -> StoreResult<()>;

    /// Returns true when the store answers.
    async fn health_check(&self) -> bool;
}

// =============================================================================
// Table Client
// =============================================================================

/// A [`RowStore`] scoped to one table, speaking typed records.
///
/// ## Usage
/// ```rust,ignore
/// let table = Table::new(store.as_ref(), &DESTINATIONS);
/// let rows: Vec<DestinationRow> = table.select_all().await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    store: &'a dyn RowStore,
    schema: &'static TableSchema,
}

impl<'a> Table<'a> {
    pub fn new(store: &'a dyn RowStore, schema: &'static TableSchema) -> Self {
        Table { store, schema }
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    /// Every row of the table.
    pub async fn select_all<T: DeserializeOwned>(&self) -> StoreResult<Vec<T>> {
        self.select(&Query::all()).await
    }

    /// The single row with `id`.
    ///
    /// ## Errors
    /// [`StoreError::NotFound`] when no row has that id.
    pub async fn select_by_id<T: DeserializeOwned>(&self, id: &str) -> StoreResult<T> {
        let mut rows = self.select_rows(&Query::all().eq("id", id).limit(1)).await?;
        match rows.pop() {
            Some(row) => from_row(row),
            None => Err(self.schema.not_found(id)),
        }
    }

    /// Rows whose `column` contains `text`, ignoring case.
    pub async fn select_matching<T: DeserializeOwned>(
        &self,
        column: &str,
        text: &str,
    ) -> StoreResult<Vec<T>> {
        self.select(&Query::all().contains(column, text)).await
    }

    /// At most `limit` rows, highest `column` first.
    pub async fn select_top<T: DeserializeOwned>(
        &self,
        column: &str,
        limit: u32,
    ) -> StoreResult<Vec<T>> {
        self.select(&Query::all().order_desc(column).limit(limit)).await
    }

    /// Rows matching an arbitrary query.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> StoreResult<Vec<T>> {
        self.select_rows(query)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    async fn select_rows(&self, query: &Query) -> StoreResult<Vec<Row>> {
        query.check(self.schema)?;

        let rows = self.store.select(self.schema, query).await?;
        debug!(
            backend = self.store.backend(),
            table = self.schema.name,
            count = rows.len(),
            limit = ?query.limit,
            "Selected rows"
        );
        Ok(rows)
    }

    /// Inserts `record` and returns the stored row.
    pub async fn insert<I, T>(&self, record: &I) -> StoreResult<T>
    where
        I: Serialize + Sync,
        T: DeserializeOwned,
    {
        let row = to_row(record)?;
        self.schema.check_row(&row)?;

        let stored = self.store.insert(self.schema, row).await?;
        debug!(
            backend = self.store.backend(),
            table = self.schema.name,
            id = ?stored.get("id"),
            "Inserted row"
        );
        from_row(stored)
    }

    /// Applies `patch` to the row with `id` and returns the stored row.
    ///
    /// An empty patch changes nothing and returns the current row.
    ///
    /// ## Errors
    /// - [`StoreError::NotFound`] when no row has that id
    /// - [`StoreError::ImmutableColumn`] when the patch carries `id`
    pub async fn update<P, T>(&self, id: &str, patch: &P) -> StoreResult<T>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let changes = to_row(patch)?;
        self.schema.check_row(&changes)?;

        if changes.contains_key("id") {
            return Err(StoreError::ImmutableColumn {
                table: self.schema.name.to_string(),
                column: "id".to_string(),
            });
        }

        if changes.is_empty() {
            return self.select_by_id(id).await;
        }

        let fields = changes.len();
        let stored = self.store.update(self.schema, id, changes).await?;
        debug!(
            backend = self.store.backend(),
            table = self.schema.name,
            id = %id,
            fields,
            "Updated row"
        );
        from_row(stored)
    }

    /// Deletes the row with `id`. Deleting a missing row succeeds.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(self.schema, id).await?;
        debug!(
            backend = self.store.backend(),
            table = self.schema.name,
            id = %id,
            "Deleted row"
        );
        Ok(())
    }
}

fn to_row<S: Serialize>(record: &S) -> StoreResult<Row> {
    match serde_json::to_value(record)? {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::Decode(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn from_row<T: DeserializeOwned>(row: Row) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wanderlust_core::rows::DestinationPatchRow;
    use wanderlust_core::DestinationPatch;

    #[test]
    fn test_like_escape() {
        assert_eq!(like_escape("new york"), "new york");
        assert_eq!(like_escape("100%"), "100\\%");
        assert_eq!(like_escape("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_retain_matching_folds_case_and_limits() {
        let row = |country: &str| {
            let mut row = Row::new();
            row.insert("country".to_string(), Value::String(country.to_string()));
            row
        };
        let mut rows = vec![row("Côte d'Ivoire"), row("Chile"), row("CÔTE"), row("a*b")];

        retain_matching(&mut rows, &Query::all().contains("country", "côte").limit(1));
        assert_eq!(rows, vec![row("Côte d'Ivoire")]);

        let mut rows = vec![row("a*b"), row("axb")];
        retain_matching(&mut rows, &Query::all().contains("country", "A*B"));
        assert_eq!(rows, vec![row("a*b")]);

        let mut rows = vec![row("Chile"), row("Peru")];
        retain_matching(&mut rows, &Query::all().eq("country", "Chile"));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_schema_column_lookup() {
        assert_eq!(DESTINATIONS.column("rating").unwrap().kind, ColumnKind::Real);
        assert_eq!(
            DESTINATIONS.column("activities").unwrap().kind,
            ColumnKind::TextArray
        );
        assert!(matches!(
            INQUIRIES.column("rating"),
            Err(StoreError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_query_check_rejects_unknown_columns() {
        let query = Query::all().contains("country", "ind").order_desc("rating");
        assert!(query.check(&DESTINATIONS).is_ok());

        let query = Query::all().order_desc("popularity");
        assert!(query.check(&DESTINATIONS).is_err());
    }

    #[test]
    fn test_patch_row_keys_are_columns() {
        let patch = DestinationPatch::default().image_url("x").price(0.0);
        let row = to_row(&DestinationPatchRow::from(&patch)).unwrap();
        assert_eq!(row.len(), 2);
        assert!(DESTINATIONS.check_row(&row).is_ok());
    }
}
