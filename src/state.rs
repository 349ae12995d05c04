use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::error::DirectoryError;

/// The user's current selection: option identifiers per facet, the session
/// token carried through the negotiation workflow, and the page URL the
/// export payload is derived from.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    pub material_types: Vec<String>,
    pub quality: Vec<String>,
    pub countries: Vec<String>,
    pub disease_types: Vec<String>,
    pub n_token: Option<String>,
    pub current_url: String,
}

/// Commit surface for retrieval commands. Each method replaces one state
/// slice wholesale; commands never partially update a slice.
pub trait StateSink: Send + Sync {
    fn set_biobanks(&self, response: Value);
    fn set_countries(&self, items: Vec<Value>);
    fn set_material_types(&self, items: Vec<Value>);
    fn set_quality(&self, items: Vec<Value>);
    fn set_disease_types(&self, items: Vec<Value>);
    fn set_loading(&self, loading: bool);
    fn set_error(&self, error: DirectoryError);
}

/// State the sinks commit into.
#[derive(Debug, Default)]
pub struct DirectoryState {
    pub biobanks: Option<Value>,
    pub countries: Vec<Value>,
    pub material_types: Vec<Value>,
    pub quality: Vec<Value>,
    pub disease_types: Vec<Value>,
    pub loading: bool,
    pub error: Option<DirectoryError>,
}

/// Process-wide application state behind a mutex. Individual commits are
/// serialized; concurrent commands still race at the slice level and the
/// last commit wins.
#[derive(Debug, Default)]
pub struct DirectoryStore {
    inner: Mutex<DirectoryState>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.inner.lock().unwrap();
        Snapshot {
            biobanks: state.biobanks.clone(),
            countries: state.countries.clone(),
            material_types: state.material_types.clone(),
            quality: state.quality.clone(),
            disease_types: state.disease_types.clone(),
            loading: state.loading,
            error: state.error.as_ref().map(|err| err.to_string()),
        }
    }
}

impl StateSink for DirectoryStore {
    fn set_biobanks(&self, response: Value) {
        self.inner.lock().unwrap().biobanks = Some(response);
    }

    fn set_countries(&self, items: Vec<Value>) {
        self.inner.lock().unwrap().countries = items;
    }

    fn set_material_types(&self, items: Vec<Value>) {
        self.inner.lock().unwrap().material_types = items;
    }

    fn set_quality(&self, items: Vec<Value>) {
        self.inner.lock().unwrap().quality = items;
    }

    fn set_disease_types(&self, items: Vec<Value>) {
        self.inner.lock().unwrap().disease_types = items;
    }

    fn set_loading(&self, loading: bool) {
        self.inner.lock().unwrap().loading = loading;
    }

    fn set_error(&self, error: DirectoryError) {
        self.inner.lock().unwrap().error = Some(error);
    }
}

/// Serializable copy of the committed state, for CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub biobanks: Option<Value>,
    pub countries: Vec<Value>,
    pub material_types: Vec<Value>,
    pub quality: Vec<Value>,
    pub disease_types: Vec<Value>,
    pub loading: bool,
    pub error: Option<String>,
}
