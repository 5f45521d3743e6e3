//! # Inquiry Repository
//!
//! Contact form submissions. Two transports implement the same four
//! operations; which one is used is decided once, when the repository is
//! built.
//!
//! ## Transports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    InquiryRepository                                    │
//! │                           │                                             │
//! │            InquiryTransportMode (config, fixed at startup)             │
//! │                ┌──────────┴───────────┐                                 │
//! │                ▼                      ▼                                 │
//! │        StoreInquiries           EdgeInquiries                           │
//! │        inquiries table          POST   /inquiries     → { inquiry }    │
//! │        via RowStore             GET    /inquiries     → { inquiries }  │
//! │                                 GET    /inquiries/:id → { inquiry }    │
//! │                                 DELETE /inquiries/:id                  │
//! │                                                                         │
//! │  get_all is newest-first on both.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither transport validates the inquiry. Callers run
//! [`wanderlust_core::validation::validate_inquiry`] first; a caller that
//! does not can store malformed data.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use wanderlust_core::endpoints::{Endpoint, ErrorBody, InquiryEnvelope, InquiryListEnvelope};
use wanderlust_core::rows::{InquiryInsert, InquiryRow};
use wanderlust_core::{Inquiry, NewInquiry};

use super::logged;
use crate::config::{ConfigError, InquiryTransportMode, SiteConfig};
use crate::error::{StoreError, StoreResult};
use crate::store::{Query, RowStore, Table, INQUIRIES};

const ENTITY: &str = "Inquiry";

// =============================================================================
// Transport Trait
// =============================================================================

/// The four inquiry operations, as one transport performs them.
#[async_trait]
pub trait InquiryTransport: Send + Sync + Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Stores an inquiry; the transport assigns id and creation time.
    async fn create(&self, inquiry: &NewInquiry) -> StoreResult<Inquiry>;

    /// Every inquiry, newest first.
    async fn get_all(&self) -> StoreResult<Vec<Inquiry>>;

    /// One inquiry; [`StoreError::NotFound`] when the id is unknown.
    async fn get_by_id(&self, id: &str) -> StoreResult<Inquiry>;

    /// Removes an inquiry. Succeeds whether or not it existed.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

// =============================================================================
// Direct Store Transport
// =============================================================================

/// Inquiries read and written straight to the `inquiries` table.
#[derive(Debug, Clone)]
pub struct StoreInquiries {
    store: Arc<dyn RowStore>,
}

impl StoreInquiries {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        StoreInquiries { store }
    }

    fn table(&self) -> Table<'_> {
        Table::new(self.store.as_ref(), &INQUIRIES)
    }
}

#[async_trait]
impl InquiryTransport for StoreInquiries {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn create(&self, inquiry: &NewInquiry) -> StoreResult<Inquiry> {
        let insert = InquiryInsert::from(inquiry).created_at(Utc::now());
        let row: InquiryRow = self.table().insert(&insert).await?;
        Ok(row.into())
    }

    async fn get_all(&self) -> StoreResult<Vec<Inquiry>> {
        let rows: Vec<InquiryRow> = self
            .table()
            .select(&Query::all().order_desc("created_at"))
            .await?;
        Ok(rows.into_iter().map(Inquiry::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Inquiry> {
        let row: InquiryRow = self.table().select_by_id(id).await?;
        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.table().delete(id).await
    }
}

// =============================================================================
// Edge Function Transport
// =============================================================================

/// Inquiries through the edge function HTTP endpoints.
#[derive(Debug, Clone)]
pub struct EdgeInquiries {
    http: Client,
    base_url: String,
}

impl EdgeInquiries {
    /// Creates a client for the edge functions under `base_url`.
    ///
    /// A non-empty `anon_key` is sent as a bearer token.
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        if !anon_key.is_empty() {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", anon_key)).map_err(|_| {
                StoreError::Config(ConfigError::InvalidValue {
                    key: "store.anon_key".to_string(),
                    reason: "not a valid header value".to_string(),
                })
            })?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        info!(base_url = %base_url, "Edge function client created");
        Ok(EdgeInquiries {
            http,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> String {
        endpoint.url(&self.base_url, params)
    }
}

/// Maps a non-2xx answer to an error; 404 becomes not-found for `id`.
async fn check_edge_status(
    response: Response,
    id: Option<&str>,
    fallback: &str,
) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(StoreError::not_found(ENTITY, id));
        }
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    Err(StoreError::Remote {
        status: status.as_u16(),
        message: body.error.unwrap_or_else(|| fallback.to_string()),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    Ok(response.json().await?)
}

#[async_trait]
impl InquiryTransport for EdgeInquiries {
    fn name(&self) -> &'static str {
        "edge"
    }

    async fn create(&self, inquiry: &NewInquiry) -> StoreResult<Inquiry> {
        let response = self
            .http
            .post(self.url(Endpoint::CreateInquiry, &[]))
            .json(inquiry)
            .send()
            .await?;

        let response = check_edge_status(response, None, "Failed to submit inquiry").await?;
        let envelope: InquiryEnvelope = read_json(response).await?;
        Ok(envelope.inquiry)
    }

    async fn get_all(&self) -> StoreResult<Vec<Inquiry>> {
        let response = self
            .http
            .get(self.url(Endpoint::ListInquiries, &[]))
            .send()
            .await?;

        let response = check_edge_status(response, None, "Failed to fetch inquiries").await?;
        let mut inquiries = read_json::<InquiryListEnvelope>(response).await?.inquiries;
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inquiries)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Inquiry> {
        let response = self
            .http
            .get(self.url(Endpoint::GetInquiry, &[("id", id)]))
            .send()
            .await?;

        let response = check_edge_status(response, Some(id), "Failed to fetch inquiry").await?;
        let envelope: InquiryEnvelope = read_json(response).await?;
        Ok(envelope.inquiry)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let response = self
            .http
            .delete(self.url(Endpoint::DeleteInquiry, &[("id", id)]))
            .send()
            .await?;

        match check_edge_status(response, Some(id), "Failed to delete inquiry").await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(id = %id, "Inquiry already gone");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for inquiry operations.
///
/// ## Usage
/// ```rust,ignore
/// validate_inquiry(&form)?;
/// let stored = db.inquiries().create(&form).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InquiryRepository {
    transport: Arc<dyn InquiryTransport>,
}

impl InquiryRepository {
    /// Wraps an explicit transport.
    pub fn new(transport: Arc<dyn InquiryTransport>) -> Self {
        InquiryRepository { transport }
    }

    /// Builds the transport named by `config.inquiries.transport`.
    pub fn from_config(config: &SiteConfig, store: Arc<dyn RowStore>) -> StoreResult<Self> {
        let transport: Arc<dyn InquiryTransport> = match config.inquiries.transport {
            InquiryTransportMode::Direct => Arc::new(StoreInquiries::new(store)),
            InquiryTransportMode::Edge => Arc::new(EdgeInquiries::new(
                &config.edge_function_url(),
                &config.store.anon_key,
                config.store.timeout(),
            )?),
        };

        info!(transport = transport.name(), "Inquiry transport selected");
        Ok(InquiryRepository { transport })
    }

    /// Name of the active transport.
    pub fn transport(&self) -> &'static str {
        self.transport.name()
    }

    /// Stores an inquiry. Performs no validation.
    pub async fn create(&self, inquiry: &NewInquiry) -> StoreResult<Inquiry> {
        let stored = logged("inquiries.create", self.transport.create(inquiry).await)?;
        info!(
            id = %stored.id,
            destination = %stored.destination,
            transport = self.transport.name(),
            "Inquiry submitted"
        );
        Ok(stored)
    }

    /// Every inquiry, newest first.
    pub async fn get_all(&self) -> StoreResult<Vec<Inquiry>> {
        let inquiries = logged("inquiries.get_all", self.transport.get_all().await)?;
        debug!(count = inquiries.len(), "Listed inquiries");
        Ok(inquiries)
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Inquiry> {
        debug!(id = %id, "Getting inquiry");
        logged("inquiries.get_by_id", self.transport.get_by_id(id).await)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        logged("inquiries.delete", self.transport.delete(id).await)?;
        info!(id = %id, "Inquiry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SqliteConfig;
    use crate::store::SqliteStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> NewInquiry {
        NewInquiry::new(
            "Ada",
            "ada@example.com",
            "Tokyo",
            "Cherry blossom season trip",
        )
    }

    async fn direct_repo() -> (InquiryRepository, Arc<dyn RowStore>) {
        let store: Arc<dyn RowStore> = Arc::new(
            SqliteStore::connect(&SqliteConfig::in_memory())
                .await
                .expect("Failed to create test store"),
        );
        let repo = InquiryRepository::new(Arc::new(StoreInquiries::new(store.clone())));
        (repo, store)
    }

    fn edge_repo(server: &MockServer) -> InquiryRepository {
        let edge = EdgeInquiries::new(&server.uri(), "", Duration::from_secs(5)).unwrap();
        InquiryRepository::new(Arc::new(edge))
    }

    fn inquiry_json(id: &str, created_at: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Ada",
            "email": "ada@example.com",
            "destination": "Tokyo",
            "message": "Cherry blossom season trip",
            "createdAt": created_at
        })
    }

    #[tokio::test]
    async fn test_direct_create_then_get() {
        let (repo, _) = direct_repo().await;

        let stored = repo.create(&form()).await.unwrap();
        assert!(!stored.id.is_empty());

        let fetched = repo.get_by_id(&stored.id).await.unwrap();
        assert_eq!(fetched.name, "Ada");
        assert_eq!(fetched.email, "ada@example.com");
        assert_eq!(fetched.destination, "Tokyo");
        assert_eq!(fetched.message, "Cherry blossom season trip");
        assert_eq!(fetched.created_at, stored.created_at);
        assert_eq!(repo.transport(), "direct");
    }

    #[tokio::test]
    async fn test_direct_get_all_newest_first() {
        use chrono::TimeZone;

        let (repo, store) = direct_repo().await;
        let table = Table::new(store.as_ref(), &INQUIRIES);
        for (day, name) in [(5, "middle"), (9, "newest"), (1, "oldest")] {
            let insert = InquiryInsert::from(&NewInquiry::new(
                name,
                "ada@example.com",
                "Bali",
                "Somewhere warm please",
            ))
            .created_at(Utc.with_ymd_and_hms(2024, 7, day, 12, 0, 0).unwrap());
            let _: InquiryRow = table.insert(&insert).await.unwrap();
        }

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_direct_missing_and_delete() {
        let (repo, _) = direct_repo().await;
        assert!(repo.get_by_id("nope").await.unwrap_err().is_not_found());

        let stored = repo.create(&form()).await.unwrap();
        repo.delete(&stored.id).await.unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repository_stores_unvalidated_input() {
        let (repo, _) = direct_repo().await;
        let stored = repo
            .create(&NewInquiry::new("A", "not-an-email", "", "hi"))
            .await
            .unwrap();
        assert_eq!(stored.email, "not-an-email");
    }

    #[tokio::test]
    async fn test_edge_create_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inquiries"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "destination": "Tokyo",
                "message": "Cherry blossom season trip"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "inquiry": inquiry_json("e-1", "2024-03-01T10:00:00Z")
            })))
            .mount(&server)
            .await;

        let stored = edge_repo(&server).create(&form()).await.unwrap();
        assert_eq!(stored.id, "e-1");
        assert_eq!(stored.destination, "Tokyo");
    }

    #[tokio::test]
    async fn test_edge_get_all_is_sorted_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inquiries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "inquiries": [
                    inquiry_json("old", "2024-01-01T00:00:00Z"),
                    inquiry_json("new", "2024-03-01T00:00:00Z"),
                    inquiry_json("mid", "2024-02-01T00:00:00Z")
                ]
            })))
            .mount(&server)
            .await;

        let ids: Vec<String> = edge_repo(&server)
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_edge_not_found_and_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inquiries/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Inquiry not found" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/inquiries"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "database offline" })),
            )
            .mount(&server)
            .await;

        let repo = edge_repo(&server);
        assert!(repo.get_by_id("missing").await.unwrap_err().is_not_found());

        match repo.get_all().await.unwrap_err() {
            StoreError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_edge_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/inquiries/e-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        edge_repo(&server).delete("e-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_from_config_selects_transport() {
        let store: Arc<dyn RowStore> = Arc::new(
            SqliteStore::connect(&SqliteConfig::in_memory())
                .await
                .unwrap(),
        );

        let mut config = SiteConfig::default();
        let repo = InquiryRepository::from_config(&config, store.clone()).unwrap();
        assert_eq!(repo.transport(), "direct");

        config.inquiries.transport = InquiryTransportMode::Edge;
        let repo = InquiryRepository::from_config(&config, store).unwrap();
        assert_eq!(repo.transport(), "edge");
    }
}
