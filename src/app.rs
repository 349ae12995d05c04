use serde_json::Value;

use crate::directory::DirectoryClient;
use crate::domain::{FacetFilter, unique_biobank_ids};
use crate::negotiator::{NegotiatorClient, QuerySummarizer, build_negotiator_query};
use crate::query;
use crate::state::{FilterSelection, StateSink};

/// Closed set of operations the orchestration layer exposes.
#[derive(Debug, Clone)]
pub enum DirectoryCommand {
    FetchBiobanksAndCollections,
    FetchBiobanksById { collections: Vec<Value> },
    FetchBiobankIdentifiers { filter: FacetFilter },
    FetchCountries,
    FetchMaterialTypes,
    FetchQuality,
    QueryDiseaseTypes { query: String },
    SendToNegotiator { selection: FilterSelection },
}

/// What a dispatched command produced. Retrieval commands report through
/// the sink and yield `Committed`; the negotiator export yields the
/// redirect target, or `ExportFailed` on its log-only failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    Redirect(String),
    ExportFailed,
}

#[derive(Clone)]
pub struct App<D: DirectoryClient, N: NegotiatorClient, S: QuerySummarizer> {
    directory: D,
    negotiator: N,
    summarizer: S,
}

impl<D: DirectoryClient, N: NegotiatorClient, S: QuerySummarizer> App<D, N, S> {
    pub fn new(directory: D, negotiator: N, summarizer: S) -> Self {
        Self {
            directory,
            negotiator,
            summarizer,
        }
    }

    /// Explicit invoker over the closed command set.
    pub async fn dispatch(&self, command: DirectoryCommand, sink: &dyn StateSink) -> Outcome {
        match command {
            DirectoryCommand::FetchBiobanksAndCollections => {
                self.fetch_biobanks_and_collections(sink).await;
                Outcome::Committed
            }
            DirectoryCommand::FetchBiobanksById { collections } => {
                self.fetch_biobanks_by_id(&collections, sink).await;
                Outcome::Committed
            }
            DirectoryCommand::FetchBiobankIdentifiers { filter } => {
                self.fetch_biobank_identifiers(&filter, sink).await;
                Outcome::Committed
            }
            DirectoryCommand::FetchCountries => {
                self.fetch_countries(sink).await;
                Outcome::Committed
            }
            DirectoryCommand::FetchMaterialTypes => {
                self.fetch_material_types(sink).await;
                Outcome::Committed
            }
            DirectoryCommand::FetchQuality => {
                self.fetch_quality(sink).await;
                Outcome::Committed
            }
            DirectoryCommand::QueryDiseaseTypes { query } => {
                self.query_disease_types(&query, sink).await;
                Outcome::Committed
            }
            DirectoryCommand::SendToNegotiator { selection } => {
                match self.send_to_negotiator(&selection).await {
                    Some(redirect) => Outcome::Redirect(redirect),
                    None => Outcome::ExportFailed,
                }
            }
        }
    }

    /// Retrieve the full biobank catalog with expanded collections.
    pub async fn fetch_biobanks_and_collections(&self, sink: &dyn StateSink) {
        sink.set_loading(true);
        match self.directory.get(&query::biobank_catalog_uri()).await {
            Ok(response) => {
                sink.set_biobanks(response);
                sink.set_loading(false);
            }
            Err(error) => sink.set_error(error),
        }
    }

    /// Retrieve expanded records for the biobanks referenced by a list of
    /// collection records. Continuation of the identifier lookup; clears
    /// the loading flag the lookup set.
    pub async fn fetch_biobanks_by_id(&self, collections: &[Value], sink: &dyn StateSink) {
        let ids = unique_biobank_ids(collections);
        match self.directory.get(&query::biobanks_by_id_uri(&ids)).await {
            Ok(response) => {
                sink.set_biobanks(response);
                sink.set_loading(false);
            }
            Err(error) => sink.set_error(error),
        }
    }

    /// Look up the biobanks whose collections match one facet filter, then
    /// expand them via `fetch_biobanks_by_id`. On lookup failure the
    /// continuation never runs and the loading flag stays set.
    pub async fn fetch_biobank_identifiers(&self, filter: &FacetFilter, sink: &dyn StateSink) {
        sink.set_loading(true);
        let uri = query::collections_by_facet_uri(filter.attribute, &filter.options);
        match self.directory.get(&uri).await {
            Ok(response) => {
                let items = items_of(response);
                self.fetch_biobanks_by_id(&items, sink).await;
            }
            Err(error) => sink.set_error(error),
        }
    }

    pub async fn fetch_countries(&self, sink: &dyn StateSink) {
        match self.directory.get(query::COUNTRY_CATALOG).await {
            Ok(response) => sink.set_countries(items_of(response)),
            Err(error) => sink.set_error(error),
        }
    }

    pub async fn fetch_material_types(&self, sink: &dyn StateSink) {
        match self.directory.get(query::MATERIAL_TYPE_CATALOG).await {
            Ok(response) => sink.set_material_types(items_of(response)),
            Err(error) => sink.set_error(error),
        }
    }

    pub async fn fetch_quality(&self, sink: &dyn StateSink) {
        match self.directory.get(query::QUALITY_CATALOG).await {
            Ok(response) => sink.set_quality(items_of(response)),
            Err(error) => sink.set_error(error),
        }
    }

    /// Suggest disease types for a free-text query. An empty query commits
    /// an empty list without touching the transport.
    pub async fn query_disease_types(&self, text: &str, sink: &dyn StateSink) {
        if text.is_empty() {
            sink.set_disease_types(Vec::new());
            return;
        }
        match self.directory.get(&query::disease_types_uri(text)).await {
            Ok(response) => sink.set_disease_types(items_of(response)),
            Err(error) => sink.set_error(error),
        }
    }

    /// Submit the current selection to the negotiator and return the
    /// redirect target. Failures are logged and swallowed; they do not
    /// reach the error sink.
    pub async fn send_to_negotiator(&self, selection: &FilterSelection) -> Option<String> {
        let payload = build_negotiator_query(selection, &self.summarizer);
        match self.negotiator.export(&payload).await {
            Ok(redirect) => Some(redirect),
            Err(error) => {
                tracing::error!(%error, "negotiator export failed");
                None
            }
        }
    }
}

fn items_of(response: Value) -> Vec<Value> {
    response
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::DirectoryError;

    #[derive(Default)]
    struct MockDirectory {
        requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DirectoryClient for MockDirectory {
        async fn get(&self, uri: &str) -> Result<Value, DirectoryError> {
            self.requests.lock().unwrap().push(uri.to_string());
            Ok(json!({"items": []}))
        }
    }

    struct NopNegotiator;

    #[async_trait]
    impl NegotiatorClient for NopNegotiator {
        async fn export(
            &self,
            _query: &crate::negotiator::NegotiatorQuery,
        ) -> Result<String, DirectoryError> {
            Err(DirectoryError::NegotiatorHttp("not used".to_string()))
        }
    }

    struct NopSummarizer;

    impl QuerySummarizer for NopSummarizer {
        fn filtered_collections(&self, _selection: &FilterSelection) -> Vec<Value> {
            Vec::new()
        }

        fn human_readable(&self, _selection: &FilterSelection) -> String {
            String::new()
        }
    }

    #[derive(Default)]
    struct NullSink {
        disease_commits: Mutex<usize>,
    }

    impl StateSink for NullSink {
        fn set_biobanks(&self, _response: Value) {}
        fn set_countries(&self, _items: Vec<Value>) {}
        fn set_material_types(&self, _items: Vec<Value>) {}
        fn set_quality(&self, _items: Vec<Value>) {}
        fn set_disease_types(&self, _items: Vec<Value>) {
            *self.disease_commits.lock().unwrap() += 1;
        }
        fn set_loading(&self, _loading: bool) {}
        fn set_error(&self, _error: DirectoryError) {}
    }

    #[tokio::test]
    async fn empty_disease_query_skips_transport() {
        let directory = MockDirectory::default();
        let sink = NullSink::default();
        let app = App::new(directory, NopNegotiator, NopSummarizer);

        app.query_disease_types("", &sink).await;

        assert_eq!(*sink.disease_commits.lock().unwrap(), 1);
        assert!(app.directory.requests.lock().unwrap().is_empty());
    }
}
