//! Retrieval Service
//!
//! Agents ground every answer in passages fetched from a content store. The
//! store is abstracted behind [`Retriever`] so the tutor can run against a live
//! Qdrant collection or against the built-in passage set used when no store is
//! configured.
//!
//! Retrieval never fails from an agent's point of view: a store that cannot be
//! reached, answers with garbage, or holds no points yields the static passage
//! set instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};

/// Score assigned to scrolled points, which carry no similarity of their own.
pub const SCROLL_SCORE: f32 = 0.95;

/// A passage of book text returned by the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    /// Relevance in `[0, 1]`, higher is more relevant.
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Size information about the backing collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub points_count: u64,
    pub vectors_count: Option<u64>,
    /// `false` when the numbers describe the fallback passage set.
    pub live: bool,
}

/// Defines the contract for any content store the agents can search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns at most `limit` passages for `query`, most relevant first.
    async fn search(&self, query: &str, limit: usize) -> Vec<RetrievedPassage>;

    /// Describes the collection behind this retriever.
    async fn stats(&self) -> CollectionStats;
}

/// A `Retriever` over a fixed, in-memory passage list.
///
/// Used directly when no content store is configured and as the degraded
/// result set of [`QdrantRetriever`].
#[derive(Debug, Clone)]
pub struct StaticRetriever {
    passages: Vec<RetrievedPassage>,
}

impl StaticRetriever {
    pub fn new(passages: Vec<RetrievedPassage>) -> Self {
        Self { passages }
    }

    /// Key passages from *Rich Dad Poor Dad*.
    pub fn rich_dad_poor_dad() -> Self {
        Self::new(vec![
            RetrievedPassage::new(
                "Rich Dad taught that assets put money in your pocket, while liabilities take money out. Most people mistakenly believe their home is an asset, but if it takes money from your pocket every month, it's actually a liability.",
                0.92,
            )
            .with_metadata("chapter", "Lesson 2"),
            RetrievedPassage::new(
                "The rich don't work for money - they have their money work for them. Poor and middle class work for money. The wealthy build assets that generate passive income.",
                0.89,
            )
            .with_metadata("chapter", "Lesson 1"),
            RetrievedPassage::new(
                "Financial literacy is the ability to read and understand financial statements. This allows you to identify the strengths and weaknesses of any business. Rich Dad emphasized this as fundamental knowledge.",
                0.87,
            )
            .with_metadata("chapter", "Lesson 2"),
            RetrievedPassage::new(
                "Mind your own business means building your own asset column, not just working to build someone else's business. Focus on acquiring income-generating assets.",
                0.85,
            )
            .with_metadata("chapter", "Lesson 3"),
            RetrievedPassage::new(
                "The rich understand how to use corporations to protect their assets and minimize taxes legally. The knowledge of corporate structure and tax law is a powerful advantage.",
                0.83,
            )
            .with_metadata("chapter", "Lesson 4"),
        ])
    }

    fn take(&self, limit: usize) -> Vec<RetrievedPassage> {
        self.passages.iter().take(limit).cloned().collect()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search(&self, _query: &str, limit: usize) -> Vec<RetrievedPassage> {
        self.take(limit)
    }

    async fn stats(&self) -> CollectionStats {
        CollectionStats {
            points_count: self.passages.len() as u64,
            vectors_count: Some(self.passages.len() as u64),
            live: false,
        }
    }
}

/// Connection settings for a Qdrant instance.
#[derive(Debug, Clone, PartialEq)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

#[derive(Deserialize)]
struct QdrantEnvelope<T> {
    result: T,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<ScrollPoint>,
}

#[derive(Deserialize)]
struct ScrollPoint {
    #[serde(default)]
    payload: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct CollectionInfo {
    #[serde(default)]
    points_count: Option<u64>,
    #[serde(default)]
    vectors_count: Option<u64>,
}

/// A `Retriever` that reads passages from a Qdrant collection over REST.
///
/// Points are scrolled in storage order; ranking is left to the store's
/// ingestion order.
pub struct QdrantRetriever {
    http: reqwest::Client,
    config: QdrantConfig,
    fallback: StaticRetriever,
}

impl QdrantRetriever {
    pub fn new(config: QdrantConfig, fallback: StaticRetriever) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            fallback,
        }
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/collections/{}",
            self.config.url.trim_end_matches('/'),
            self.config.collection
        )
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    async fn scroll(&self, limit: usize) -> anyhow::Result<Vec<RetrievedPassage>> {
        let body = json!({
            "limit": limit,
            "with_payload": true,
            "with_vector": false,
        });
        let envelope: QdrantEnvelope<ScrollResult> = self
            .authorize(
                self.http
                    .post(format!("{}/points/scroll", self.collection_url()))
                    .json(&body),
            )
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope
            .result
            .points
            .into_iter()
            .filter_map(|point| point.payload.map(passage_from_payload))
            .take(limit)
            .collect())
    }

    async fn collection_info(&self) -> anyhow::Result<CollectionInfo> {
        let envelope: QdrantEnvelope<CollectionInfo> = self
            .authorize(self.http.get(self.collection_url()))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.result)
    }
}

/// Builds a passage from a point payload, reading `text` then `content`.
fn passage_from_payload(mut payload: Map<String, Value>) -> RetrievedPassage {
    let text = ["text", "content"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    let metadata = match payload.remove("metadata") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    RetrievedPassage {
        text,
        score: SCROLL_SCORE,
        metadata,
    }
}

#[async_trait]
impl Retriever for QdrantRetriever {
    #[instrument(skip(self), fields(collection = %self.config.collection))]
    async fn search(&self, query: &str, limit: usize) -> Vec<RetrievedPassage> {
        match self.scroll(limit).await {
            Ok(passages) if !passages.is_empty() => {
                debug!(count = passages.len(), "Qdrant search succeeded");
                passages
            }
            Ok(_) => {
                warn!("Qdrant collection returned no points, using fallback passages");
                self.fallback.take(limit)
            }
            Err(e) => {
                warn!(error = %e, "Qdrant search error, using fallback passages");
                self.fallback.take(limit)
            }
        }
    }

    async fn stats(&self) -> CollectionStats {
        match self.collection_info().await {
            Ok(info) => CollectionStats {
                points_count: info.points_count.unwrap_or_default(),
                vectors_count: info.vectors_count,
                live: true,
            },
            Err(e) => {
                warn!(error = %e, "Qdrant stats unavailable, reporting fallback set");
                self.fallback.stats().await
            }
        }
    }
}
