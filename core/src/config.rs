//! Client configuration.
//!
//! A `ClientConfig` is assembled once and then shared read-only (behind an
//! `Arc`) by every dispatcher and transport created from it. There are no
//! setters on a live client: toggling diagnostics means building a new
//! config.

use std::time::Duration;

use crate::error::{PineconeError, Result};

pub const ENV_API_KEY: &str = "PINECONE_API_KEY";
pub const ENV_ENVIRONMENT: &str = "PINECONE_ENVIRONMENT";
pub const ENV_PROJECT_NAME: &str = "PINECONE_PROJECT_NAME";
pub const ENV_DEBUG: &str = "PINECONE_DEBUG";

#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    environment: String,
    project_name: Option<String>,
    debug: bool,
    timeout: Option<Duration>,
    controller_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: environment.into(),
            project_name: None,
            debug: false,
            timeout: None,
            controller_url: None,
        }
    }

    /// Read the configuration from `PINECONE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from `PINECONE_*` values returned by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| PineconeError::Config(format!("{ENV_API_KEY} not set")))?;
        let environment = lookup(ENV_ENVIRONMENT)
            .ok_or_else(|| PineconeError::Config(format!("{ENV_ENVIRONMENT} not set")))?;

        let mut config = Self::new(api_key, environment);
        if let Some(project) = lookup(ENV_PROJECT_NAME) {
            config = config.with_project_name(project);
        }
        if let Some(flag) = lookup(ENV_DEBUG) {
            config = config.with_debug(flag == "1" || flag.eq_ignore_ascii_case("true"));
        }
        Ok(config)
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    /// Log full request and response dumps at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Per-request timeout applied by the transports.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Point the controller API at a different base URL (proxies, local mocks).
    pub fn with_controller_url(mut self, url: impl Into<String>) -> Self {
        self.controller_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn controller_url(&self) -> String {
        match &self.controller_url {
            Some(url) => url.clone(),
            None => format!("https://controller.{}.pinecone.io", self.environment),
        }
    }

    /// Host name of an index's data plane, without scheme or port.
    pub fn index_host(&self, index_name: &str) -> Result<String> {
        let project = self.project_name.as_deref().ok_or_else(|| {
            PineconeError::Config("project name is required to address an index".to_string())
        })?;
        Ok(format!(
            "{index_name}-{project}.svc.{}.pinecone.io",
            self.environment
        ))
    }

    pub fn index_url(&self, index_name: &str) -> Result<String> {
        Ok(format!("https://{}", self.index_host(index_name)?))
    }
}

// Keep the API key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("project_name", &self.project_name)
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .field("controller_url", &self.controller_url)
            .finish()
    }
}
