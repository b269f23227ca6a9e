use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lexmate_core::research::DocumentRetriever;
use serde::{Deserialize, Serialize};
use tracing::info;

const COHERE_BASE: &str = "https://api.cohere.com/v1";

/// Retrieval over a Chroma vector store with Cohere query embeddings.
///
/// Chroma only answers vector queries, so each lookup is two calls: embed
/// the query text with Cohere, then run a nearest-neighbour search against
/// the pre-vectorized statute corpus.
pub struct ChromaRetriever {
    chroma_url: String,
    collection: String,
    embed_model: String,
    cohere_api_key: String,
    top_k: usize,
    http: reqwest::Client,
}

impl ChromaRetriever {
    pub fn new(
        chroma_url: &str,
        collection: &str,
        embed_model: &str,
        cohere_api_key: &str,
        top_k: usize,
        timeout_secs: u64,
    ) -> Self {
        Self {
            chroma_url: chroma_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            embed_model: embed_model.to_string(),
            cohere_api_key: cohere_api_key.to_string(),
            top_k,
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            texts: Vec<&'a str>,
            model: &'a str,
            input_type: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let body = EmbedRequest {
            texts: vec![query],
            model: &self.embed_model,
            input_type: "search_query",
        };

        let resp: EmbedResponse = self
            .http
            .post(format!("{COHERE_BASE}/embed"))
            .bearer_auth(&self.cohere_api_key)
            .json(&body)
            .send()
            .await
            .context("cohere embed request failed")?
            .error_for_status()
            .context("cohere embed returned an error status")?
            .json()
            .await
            .context("failed to parse cohere embed response")?;

        resp.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("cohere returned no embedding"))
    }

    async fn collection_id(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct CollectionInfo {
            id: String,
        }

        let info: CollectionInfo = self
            .http
            .get(format!(
                "{}/api/v1/collections/{}",
                self.chroma_url, self.collection
            ))
            .send()
            .await
            .context("chroma collection lookup failed")?
            .error_for_status()
            .context("chroma collection not found")?
            .json()
            .await
            .context("failed to parse chroma collection info")?;

        Ok(info.id)
    }
}

#[async_trait]
impl DocumentRetriever for ChromaRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        #[derive(Serialize)]
        struct QueryRequest {
            query_embeddings: Vec<Vec<f32>>,
            n_results: usize,
            include: Vec<&'static str>,
        }

        #[derive(Deserialize)]
        struct QueryResponse {
            /// One inner list per query embedding; we send exactly one.
            #[serde(default)]
            documents: Vec<Vec<String>>,
        }

        let embedding = self.embed_query(query).await?;
        let collection_id = self.collection_id().await?;

        let body = QueryRequest {
            query_embeddings: vec![embedding],
            n_results: self.top_k,
            include: vec!["documents"],
        };

        let resp: QueryResponse = self
            .http
            .post(format!(
                "{}/api/v1/collections/{}/query",
                self.chroma_url, collection_id
            ))
            .json(&body)
            .send()
            .await
            .context("chroma query failed")?
            .error_for_status()
            .context("chroma query returned an error status")?
            .json()
            .await
            .context("failed to parse chroma query response")?;

        let chunks = resp.documents.into_iter().next().unwrap_or_default();
        info!(
            collection = %self.collection,
            chunks = chunks.len(),
            "document retrieval complete"
        );
        Ok(chunks)
    }
}
