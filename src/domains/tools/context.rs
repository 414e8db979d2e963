//! Shared state handed to every tool handler.

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::api::RequestDispatcher;
use crate::domains::session::{SessionError, SessionState};
use crate::domains::spec::{EndpointIndex, HttpMethod, LoadedSpec, SpecStore};

/// Everything a handler may read or mutate. Cheap to clone.
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<Config>,
    pub specs: Arc<SpecStore>,
    pub session: Arc<SessionState>,
    pub dispatcher: RequestDispatcher,
}

impl ToolContext {
    /// Build the context from configuration, sharing one HTTP client
    /// between spec fetching and live calls.
    pub fn new(config: Arc<Config>, client: reqwest::Client) -> Result<Self, SessionError> {
        let session = Arc::new(SessionState::new(
            &config.api.base_url,
            config.api.token.as_deref(),
        )?);
        let specs = Arc::new(SpecStore::new(client.clone()));
        let dispatcher = RequestDispatcher::new(client, session.clone(), config.api.timeout());

        Ok(Self {
            config,
            specs,
            session,
            dispatcher,
        })
    }

    /// Methods that produce operations.
    pub fn recognized_methods(&self) -> &[HttpMethod] {
        &self.config.api.recognized_methods
    }

    /// Run `query` against one consistent spec snapshot and the current
    /// base URL.
    pub fn with_index<R>(&self, query: impl FnOnce(&EndpointIndex<'_>) -> R) -> R {
        let loaded: Arc<LoadedSpec> = self.specs.current();
        let base_url = self.session.base_url();
        let index = EndpointIndex::new(&loaded.spec, &base_url, self.recognized_methods());
        query(&index)
    }

    /// Source to use for a reload without an explicit one: the last loaded
    /// source, else the configured primary.
    pub fn default_spec_source(&self) -> String {
        self.specs
            .current()
            .source
            .clone()
            .or_else(|| self.session.snapshot().spec_source.clone())
            .unwrap_or_else(|| self.config.api.spec_source.clone())
    }
}
