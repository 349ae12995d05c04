use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;

use crate::error::DirectoryError;
use crate::state::FilterSelection;

pub const EXPORT_ENDPOINT: &str = "/plugin/directory/export";

/// Export payload handed to the negotiation service. Field names are the
/// negotiator's wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct NegotiatorQuery {
    #[serde(rename = "URL")]
    pub url: String,
    pub collections: Vec<Value>,
    #[serde(rename = "humanReadable")]
    pub human_readable: String,
    #[serde(rename = "nToken", skip_serializing_if = "Option::is_none")]
    pub n_token: Option<String>,
}

/// External collaborators computing the exported collection list and the
/// human-readable rendering of the current selection.
pub trait QuerySummarizer: Send + Sync {
    fn filtered_collections(&self, selection: &FilterSelection) -> Vec<Value>;
    fn human_readable(&self, selection: &FilterSelection) -> String;
}

/// Strip the session-token query parameter from a shareable URL. The token
/// would otherwise be duplicated on the negotiator side when a query is
/// edited more than once.
pub fn strip_session_token(url: &str) -> String {
    let token = Regex::new(r"&nToken=\w{32}").unwrap();
    token.replace(url, "").into_owned()
}

/// Build the export payload from the current selection.
pub fn build_negotiator_query(
    selection: &FilterSelection,
    summarizer: &dyn QuerySummarizer,
) -> NegotiatorQuery {
    NegotiatorQuery {
        url: strip_session_token(&selection.current_url),
        collections: summarizer.filtered_collections(selection),
        human_readable: summarizer.human_readable(selection),
        n_token: selection.n_token.clone(),
    }
}

/// Submission of the export payload. The response body is the redirect
/// target the negotiation workflow continues at.
#[async_trait]
pub trait NegotiatorClient: Send + Sync {
    async fn export(&self, query: &NegotiatorQuery) -> Result<String, DirectoryError>;
}

#[derive(Clone)]
pub struct NegotiatorHttpClient {
    client: Client,
    base_url: String,
    endpoint: String,
}

impl NegotiatorHttpClient {
    pub fn new(base_url: &str, endpoint: &str) -> Result<Self, DirectoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("bbdir/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DirectoryError::ClientBuild(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| DirectoryError::ClientBuild(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl NegotiatorClient for NegotiatorHttpClient {
    async fn export(&self, query: &NegotiatorQuery) -> Result<String, DirectoryError> {
        let url = format!("{}{}", self.base_url, self.endpoint);
        let body = serde_json::to_string(query)
            .map_err(|err| DirectoryError::NegotiatorHttp(err.to_string()))?;
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| DirectoryError::NegotiatorHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "negotiator request failed".to_string());
            return Err(DirectoryError::NegotiatorStatus { status, message });
        }
        response
            .text()
            .await
            .map_err(|err| DirectoryError::NegotiatorHttp(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_session_token_parameter() {
        let url = "https://directory.example.org/#/?diseases=C18&nToken=0123456789abcdef0123456789abcdef";
        assert_eq!(
            strip_session_token(url),
            "https://directory.example.org/#/?diseases=C18"
        );
    }

    #[test]
    fn keeps_other_parameters_intact() {
        let url = "https://directory.example.org/#/?materials=RNA&nToken=aaaabbbbccccddddaaaabbbbccccdddd&countries=NL";
        assert_eq!(
            strip_session_token(url),
            "https://directory.example.org/#/?materials=RNA&countries=NL"
        );
    }

    #[test]
    fn leaves_short_tokens_alone() {
        let url = "https://directory.example.org/#/?materials=RNA&nToken=short";
        assert_eq!(strip_session_token(url), url);
    }

    #[test]
    fn payload_uses_negotiator_field_names() {
        let query = NegotiatorQuery {
            url: "https://directory.example.org/#/".to_string(),
            collections: vec![],
            human_readable: "materials: RNA".to_string(),
            n_token: Some("0123456789abcdef0123456789abcdef".to_string()),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("URL").is_some());
        assert!(json.get("humanReadable").is_some());
        assert!(json.get("nToken").is_some());
        assert!(json.get("url").is_none());
    }

    #[test]
    fn payload_omits_missing_token() {
        let query = NegotiatorQuery {
            url: String::new(),
            collections: vec![],
            human_readable: String::new(),
            n_token: None,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("nToken").is_none());
    }
}
