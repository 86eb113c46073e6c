//! In-memory collaborators for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};

use crate::memory::core::config::{DEFAULT_RERANK_MODEL, Settings};
use crate::memory::core::errors::{ClassifierError, IndexError, IndexResult};
use crate::memory::core::record::{IndexRecord, TEXT_FIELD};
use crate::memory::gate::classifier::TextClassifier;
use crate::memory::index::client::{Hit, IndexClient, IndexFuture, SearchRequest};

/// Settings pointing at unreachable hosts, with no classifier.
pub fn settings(top_k: usize) -> Settings {
    Settings {
        dense_index_host: "https://dense.example".to_string(),
        sparse_index_host: "https://sparse.example".to_string(),
        namespace: "ns".to_string(),
        top_k,
        pinecone_api_key: "key".to_string(),
        rerank_model: DEFAULT_RERANK_MODEL.to_string(),
        openai_api_key: None,
        openai_model: "model".to_string(),
        openai_base_url: "https://api.example/v1".to_string(),
        port: 0,
    }
}

/// Build a hit carrying only a text field.
pub fn hit(id: &str, score: f64) -> Hit {
    let mut fields = Map::new();
    fields.insert(TEXT_FIELD.to_string(), Value::String(format!("text of {id}")));
    Hit {
        id: id.to_string(),
        score,
        fields,
        metadata: None,
    }
}

/// Index stub returning canned hits and recording every call.
pub struct StubIndex {
    name: String,
    hits: Vec<Hit>,
    fail_search: bool,
    fail_upsert: bool,
    fail_close: bool,
    open: AtomicBool,
    pub searches: Mutex<Vec<(String, SearchRequest)>>,
    pub upserts: Mutex<Vec<(String, Vec<IndexRecord>)>>,
}

impl StubIndex {
    pub fn new(name: &str, hits: Vec<Hit>) -> Self {
        Self {
            name: name.to_string(),
            hits,
            fail_search: false,
            fail_upsert: false,
            fail_close: false,
            open: AtomicBool::new(true),
            searches: Mutex::new(Vec::new()),
            upserts: Mutex::new(Vec::new()),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_upsert(mut self) -> Self {
        self.fail_upsert = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn last_search(&self) -> Option<(String, SearchRequest)> {
        self.searches.lock().unwrap().last().cloned()
    }

    pub fn upserted(&self) -> Vec<(String, Vec<IndexRecord>)> {
        self.upserts.lock().unwrap().clone()
    }

    fn failure(&self) -> IndexError {
        IndexError::Status {
            status: 503,
            body: format!("{} unavailable", self.name),
        }
    }
}

impl IndexClient for StubIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn search<'a>(
        &'a self,
        namespace: &'a str,
        request: &'a SearchRequest,
    ) -> IndexFuture<'a, IndexResult<Vec<Hit>>> {
        Box::pin(async move {
            self.searches
                .lock()
                .unwrap()
                .push((namespace.to_string(), request.clone()));
            if self.fail_search {
                return Err(self.failure());
            }
            Ok(self.hits.iter().take(request.top_k).cloned().collect())
        })
    }

    fn upsert_records<'a>(
        &'a self,
        namespace: &'a str,
        records: &'a [IndexRecord],
    ) -> IndexFuture<'a, IndexResult<()>> {
        Box::pin(async move {
            self.upserts
                .lock()
                .unwrap()
                .push((namespace.to_string(), records.to_vec()));
            if self.fail_upsert {
                return Err(self.failure());
            }
            Ok(())
        })
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&self) -> IndexFuture<'_, IndexResult<()>> {
        Box::pin(async move {
            if self.fail_close {
                return Err(self.failure());
            }
            self.open.store(false, Ordering::Release);
            Ok(())
        })
    }
}

/// Classifier stub with a fixed reply.
pub enum StubClassifier {
    Reply(String),
    Fail,
    Panic,
}

impl StubClassifier {
    pub fn reply(text: &str) -> Self {
        Self::Reply(text.to_string())
    }
}

impl TextClassifier for StubClassifier {
    fn model(&self) -> &str {
        "stub-classifier"
    }

    fn classify(&self, _system_prompt: &str, _user_text: &str) -> Result<String, ClassifierError> {
        match self {
            Self::Reply(text) => Ok(text.clone()),
            Self::Fail => Err(ClassifierError::Status {
                status: 500,
                body: "model overloaded".to_string(),
            }),
            #[allow(clippy::panic)]
            Self::Panic => panic!("classifier crashed"),
        }
    }
}
