//! Pinecone data-plane client for integrated-embedding indexes.
//!
//! Both the dense and the sparse index speak the same records API:
//! - `POST {host}/records/namespaces/{ns}/search`
//! - `POST {host}/records/namespaces/{ns}/upsert` (NDJSON body)
//!
//! Embedding and reranking happen inside Pinecone; this client only shapes
//! requests and decodes hits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::memory::core::errors::{IndexError, IndexResult};
use crate::memory::core::record::IndexRecord;
use crate::memory::index::client::{Hit, IndexClient, IndexFuture, RerankOptions, SearchRequest};

/// Data-plane API version sent with every request.
pub const PINECONE_API_VERSION: &str = "2025-01";

/// HTTP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// HTTP request timeout; the effective timeout of every index call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SearchBody<'a> {
    query: QueryBody<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rerank: Option<&'a RerankOptions>,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    inputs: QueryInputs<'a>,
    top_k: usize,
    #[serde(skip_serializing_if = "Map::is_empty")]
    filter: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct QueryInputs<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: Vec<Hit>,
}

/// Async HTTP client bound to one Pinecone index host.
pub struct PineconeIndex {
    name: String,
    host: Url,
    api_key: String,
    client: Client,
    open: AtomicBool,
}

impl PineconeIndex {
    /// Open a client for the index served at `host`.
    ///
    /// # Errors
    /// Returns an error if the host is not a valid URL or the HTTP client cannot be built.
    pub fn new(
        name: impl Into<String>,
        host: &str,
        api_key: impl Into<String>,
    ) -> IndexResult<Self> {
        let mut host = Url::parse(host)?;
        // Endpoints are joined relative to the host path, which must end in '/'.
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            name: name.into(),
            host,
            api_key: api_key.into(),
            client,
            open: AtomicBool::new(true),
        })
    }

    fn endpoint(&self, namespace: &str, action: &str) -> IndexResult<Url> {
        let path = format!(
            "records/namespaces/{}/{action}",
            urlencoding::encode(namespace)
        );
        Ok(self.host.join(&path)?)
    }

    fn ensure_open(&self) -> IndexResult<()> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(IndexError::Closed(self.name.clone()))
        }
    }

    async fn post(&self, url: Url, request: reqwest::RequestBuilder) -> IndexResult<reqwest::Response> {
        let response = request
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(index = %self.name, %url, status = status.as_u16(), "index request rejected");
        Err(IndexError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl IndexClient for PineconeIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn search<'a>(
        &'a self,
        namespace: &'a str,
        request: &'a SearchRequest,
    ) -> IndexFuture<'a, IndexResult<Vec<Hit>>> {
        Box::pin(async move {
            self.ensure_open()?;
            let url = self.endpoint(namespace, "search")?;
            let body = search_body(request);
            let response = self
                .post(url.clone(), self.client.post(url).json(&body))
                .await?;
            let parsed: SearchResponse = response.json().await?;
            Ok(parsed.result.hits)
        })
    }

    fn upsert_records<'a>(
        &'a self,
        namespace: &'a str,
        records: &'a [IndexRecord],
    ) -> IndexFuture<'a, IndexResult<()>> {
        Box::pin(async move {
            self.ensure_open()?;
            if records.is_empty() {
                return Ok(());
            }
            let url = self.endpoint(namespace, "upsert")?;
            let body = to_ndjson(records)?;
            let request = self
                .client
                .post(url.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
                .body(body);
            self.post(url, request).await?;
            Ok(())
        })
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&self) -> IndexFuture<'_, IndexResult<()>> {
        Box::pin(async move {
            self.open.store(false, Ordering::Release);
            debug!(index = %self.name, "index client closed");
            Ok(())
        })
    }
}

fn search_body(request: &SearchRequest) -> SearchBody<'_> {
    SearchBody {
        query: QueryBody {
            inputs: QueryInputs {
                text: &request.text,
            },
            top_k: request.top_k,
            filter: &request.filter,
        },
        rerank: request.rerank.as_ref(),
    }
}

fn to_ndjson(records: &[IndexRecord]) -> IndexResult<String> {
    let lines = records
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_endpoint_joins_host_and_encodes_namespace() {
        let index = PineconeIndex::new("dense", "https://dense-abc.svc.pinecone.io", "key").unwrap();
        let url = index.endpoint("my space", "search").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dense-abc.svc.pinecone.io/records/namespaces/my%20space/search"
        );
    }

    #[test]
    fn test_host_path_is_kept_when_joining() {
        for host in ["https://proxy.example/pinecone", "https://proxy.example/pinecone/"] {
            let index = PineconeIndex::new("dense", host, "key").unwrap();
            let url = index.endpoint("ns", "upsert").unwrap();
            assert_eq!(
                url.as_str(),
                "https://proxy.example/pinecone/records/namespaces/ns/upsert"
            );
        }
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(matches!(
            PineconeIndex::new("dense", "not a url", "key"),
            Err(IndexError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_search_body_without_rerank() {
        let request = SearchRequest::new("favorite food", 3).with_category("memory");
        let body = serde_json::to_value(search_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "query": {
                    "inputs": {"text": "favorite food"},
                    "top_k": 3,
                    "filter": {"category": "memory"}
                }
            })
        );
    }

    #[test]
    fn test_search_body_with_rerank() {
        let request = SearchRequest::new("favorite food", 3)
            .with_rerank(RerankOptions::on_text("cohere-rerank-3.5", "favorite food"));
        let body = serde_json::to_value(search_body(&request)).unwrap();
        assert!(body["query"].get("filter").is_none());
        assert_eq!(body["rerank"]["model"], "cohere-rerank-3.5");
        assert_eq!(body["rerank"]["rank_fields"], json!(["chunk_text"]));
        assert_eq!(body["rerank"]["query"], "favorite food");
    }

    #[test]
    fn test_ndjson_one_record_per_line() {
        let records = vec![
            IndexRecord {
                id: "a".to_string(),
                chunk_text: "one".to_string(),
                category: Some("memory".to_string()),
            },
            IndexRecord {
                id: "b".to_string(),
                chunk_text: "two".to_string(),
                category: None,
            },
        ];
        let body = to_ndjson(&records).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second, json!({"_id": "b", "chunk_text": "two"}));
    }

    #[tokio::test]
    async fn test_closed_client_refuses_requests() {
        let index = PineconeIndex::new("sparse", "https://sparse.example", "key").unwrap();
        assert!(index.is_open());
        index.close().await.unwrap();
        assert!(!index.is_open());

        let request = SearchRequest::new("q", 1);
        let err = index.search("ns", &request).await.unwrap_err();
        assert!(matches!(err, IndexError::Closed(name) if name == "sparse"));
    }

    #[test]
    fn test_search_response_decodes_hits() {
        let parsed: SearchResponse = serde_json::from_value(json!({
            "result": {"hits": [{"_id": "x", "_score": 0.5, "fields": {"chunk_text": "t"}}]},
            "usage": {"read_units": 1}
        }))
        .unwrap();
        assert_eq!(parsed.result.hits.len(), 1);
        assert_eq!(parsed.result.hits[0].id, "x");
    }
}
