//! # REST Store
//!
//! [`RowStore`] over the hosted store's REST interface.
//!
//! ## Request Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  select  GET    /rest/v1/{table}?select=*&country=ilike.*ind*          │
//! │                                  &order=rating.desc,created_at.asc     │
//! │                                  &limit=3                              │
//! │  insert  POST   /rest/v1/{table}            body: row                  │
//! │  update  PATCH  /rest/v1/{table}?id=eq.{id} body: changed columns      │
//! │  delete  DELETE /rest/v1/{table}?id=eq.{id}                            │
//! │                                                                         │
//! │  Every request: apikey + Authorization: Bearer <anon key>              │
//! │  Writes:        Prefer: return=representation (rows echoed back)       │
//! │  Failures:      { "message", "code", "details", "hint" }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{like_escape, retain_matching, Filter, Query, Row, RowStore, TableSchema};
use crate::config::{ConfigError, StoreSettings};
use crate::error::{StoreError, StoreResult};

/// Path of the REST interface below the store URL.
const REST_PATH: &str = "/rest/v1";

/// Error body of a failed REST call.
#[derive(Debug, Default, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Hosted store client.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    base_url: String,
}

impl RestStore {
    /// Creates a client for the store at `url`.
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> StoreResult<Self> {
        let invalid_key = || {
            StoreError::Config(ConfigError::InvalidValue {
                key: "store.anon_key".to_string(),
                reason: "not a valid header value".to_string(),
            })
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(anon_key).map_err(|_| invalid_key())?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", anon_key)).map_err(|_| invalid_key())?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        let base_url = format!("{}{}", url.trim_end_matches('/'), REST_PATH);
        info!(base_url = %base_url, "REST store client created");

        Ok(RestStore { http, base_url })
    }

    /// Creates a client from the `[store]` settings.
    pub fn from_settings(settings: &StoreSettings) -> StoreResult<Self> {
        Self::new(&settings.url, &settings.anon_key, settings.timeout())
    }

    fn table_url(&self, table: &TableSchema) -> String {
        format!("{}/{}", self.base_url, table.name)
    }

    async fn send_rows(&self, request: RequestBuilder) -> StoreResult<Vec<Row>> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// True when a substring filter holds `*`, which the REST dialect cannot
/// express literally. Such selects are re-checked client side.
fn needs_recheck(query: &Query) -> bool {
    query
        .filters
        .iter()
        .any(|f| matches!(f, Filter::Contains { text, .. } if text.contains('*')))
}

/// Query-string pairs for a select.
///
/// A `*` in substring text is sent as `_`, which matches any one character
/// and so still admits the literal `*`. The limit is then left to
/// [`retain_matching`].
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];

    for filter in &query.filters {
        let pair = match filter {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{}", value)),
            Filter::Contains { column, text } => {
                let pattern = like_escape(text).replace('*', "_");
                (column.clone(), format!("ilike.*{}*", pattern))
            }
        };
        params.push(pair);
    }

    if !query.order.is_empty() {
        let keys: Vec<String> = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.descending { "desc" } else { "asc" }))
            .collect();
        params.push(("order".to_string(), keys.join(",")));
    }

    if let (Some(limit), false) = (query.limit, needs_recheck(query)) {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

/// Turns a non-2xx response into [`StoreError::Remote`].
async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body: RemoteErrorBody = serde_json::from_str(&text).unwrap_or_default();
    debug!(
        status = status.as_u16(),
        code = ?body.code,
        details = ?body.details,
        hint = ?body.hint,
        "REST store call failed"
    );

    let message = body
        .message
        .or_else(|| (!text.is_empty()).then(|| text.clone()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(StoreError::Remote {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RowStore for RestStore {
    fn backend(&self) -> &'static str {
        "rest"
    }

    async fn select(&self, table: &TableSchema, query: &Query) -> StoreResult<Vec<Row>> {
        let request = self.http.get(self.table_url(table)).query(&query_params(query));
        let mut rows = self.send_rows(request).await?;
        if needs_recheck(query) {
            retain_matching(&mut rows, query);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &TableSchema, row: Row) -> StoreResult<Row> {
        let request = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);

        self.send_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode(format!("insert into {} returned no row", table.name)))
    }

    async fn update(&self, table: &TableSchema, id: &str, changes: Row) -> StoreResult<Row> {
        let request = self
            .http
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&changes);

        self.send_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(table.entity, id))
    }

    async fn delete(&self, table: &TableSchema, id: &str) -> StoreResult<()> {
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))]);

        check_status(request.send().await?).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        match self.http.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Table, DESTINATIONS, INQUIRIES};
    use serde_json::json;
    use wanderlust_core::rows::{DestinationPatchRow, DestinationRow, InquiryInsert, InquiryRow};
    use wanderlust_core::{DestinationPatch, NewInquiry};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bali_row() -> serde_json::Value {
        json!({
            "id": "b1",
            "name": "Bali",
            "country": "Indonesia",
            "description": "Island",
            "short_description": "Tropical",
            "image_url": "https://example.com/bali.jpg",
            "rating": 4.7,
            "activities": ["Surfing"],
            "price": 1200,
            "currency": "USD",
            "continent": "Asia",
            "created_at": "2024-05-01T08:30:00+00:00"
        })
    }

    fn store_for(server: &MockServer) -> RestStore {
        RestStore::new(&server.uri(), "anon-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_query_params() {
        let query = Query::all()
            .contains("country", "50%")
            .order_desc("rating")
            .order_asc("created_at")
            .limit(3);

        assert_eq!(
            query_params(&query),
            vec![
                ("select".to_string(), "*".to_string()),
                ("country".to_string(), "ilike.*50\\%*".to_string()),
                ("order".to_string(), "rating.desc,created_at.asc".to_string()),
                ("limit".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_star_is_widened_and_limit_dropped() {
        let query = Query::all().contains("name", "5*").limit(1);
        assert!(needs_recheck(&query));

        assert_eq!(
            query_params(&query),
            vec![
                ("select".to_string(), "*".to_string()),
                ("name".to_string(), "ilike.*5_*".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_select_with_star_keeps_literal_matches_only() {
        let server = MockServer::start().await;
        let mut starred = bali_row();
        starred["name"] = json!("Bali 5* Resort");
        let mut other = bali_row();
        other["id"] = json!("b2");
        other["name"] = json!("Bali 50 Villas");
        Mock::given(method("GET"))
            .and(path("/rest/v1/destinations"))
            .and(query_param("name", "ilike.*5_*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([other, starred])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let query = Query::all().contains("name", "5*").limit(1);
        let rows: Vec<DestinationRow> = Table::new(&store, &DESTINATIONS)
            .select(&query)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bali 5* Resort");
    }

    #[tokio::test]
    async fn test_select_sends_auth_headers_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/destinations"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(query_param("continent", "ilike.*asia*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([bali_row()])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let rows: Vec<DestinationRow> = Table::new(&store, &DESTINATIONS)
            .select_matching("continent", "asia")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].short_description, "Tropical");
    }

    #[tokio::test]
    async fn test_select_by_id_empty_array_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/destinations"))
            .and(query_param("id", "eq.missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let result: StoreResult<DestinationRow> = Table::new(&store, &DESTINATIONS)
            .select_by_id("missing")
            .await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remote_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/destinations"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Invalid API key",
                "code": "PGRST301",
                "details": null,
                "hint": null
            })))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let err = Table::new(&store, &DESTINATIONS)
            .select_all::<DestinationRow>()
            .await
            .unwrap_err();

        match err {
            StoreError::Remote { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_sends_only_present_fields() {
        let server = MockServer::start().await;
        let mut updated = bali_row();
        updated["price"] = json!(0);

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/destinations"))
            .and(query_param("id", "eq.b1"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!({ "price": 0.0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let patch = DestinationPatchRow::from(&DestinationPatch::default().price(0.0));
        let row: DestinationRow = Table::new(&store, &DESTINATIONS)
            .update("b1", &patch)
            .await
            .unwrap();

        assert_eq!(row.price, 0.0);
        assert_eq!(row.name, "Bali");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/destinations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let patch = DestinationPatchRow::from(&DestinationPatch::default().name("Nowhere"));
        let err = Table::new(&store, &DESTINATIONS)
            .update::<_, DestinationRow>("ghost", &patch)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/inquiries"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "destination": "Cairo",
                "message": "Pyramid tour for two"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
                "id": "i-1",
                "name": "Ada",
                "email": "ada@example.com",
                "destination": "Cairo",
                "message": "Pyramid tour for two",
                "created_at": "2024-06-02T12:00:00+00:00"
            }])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let insert = InquiryInsert::from(&NewInquiry::new(
            "Ada",
            "ada@example.com",
            "Cairo",
            "Pyramid tour for two",
        ));
        let row: InquiryRow = Table::new(&store, &INQUIRIES).insert(&insert).await.unwrap();

        assert_eq!(row.id, "i-1");
    }

    #[tokio::test]
    async fn test_delete_missing_row_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/inquiries"))
            .and(query_param("id", "eq.gone"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(Table::new(&store, &INQUIRIES).delete("gone").await.is_ok());
    }
}
