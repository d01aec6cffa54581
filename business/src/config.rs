use std::env::vars;

use log::info;
use serde::Deserialize;
use ustr::Ustr;

/// Rows per page when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Bearer token attached to every API call when present.
    pub access_token: Option<String>,
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    clientside_api_domain: Option<String>,
    admin_access_token: Option<String>,
    table_page_size: Option<u32>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            access_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn api_url(&self) -> Ustr {
        let base = self.api_base_url.trim_end_matches('/');
        if base.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{base}/api"))
        }
    }

    /// Base resource of the users table.
    pub fn users_url(&self) -> String {
        format!("{}/v1/users", self.api_url())
    }

    pub fn users_count_url(&self) -> String {
        format!("{}/v1/users/count", self.api_url())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Build-time defaults overridden by `CLIENTSIDE_API_DOMAIN`,
    /// `ADMIN_ACCESS_TOKEN` and `TABLE_PAGE_SIZE`.
    pub fn from_env() -> anyhow::Result<Self> {
        info!("Loading business configuration from environment variables");
        Self::from_vars(vars())
    }

    pub fn from_vars<S: AsRef<str>>(vars: impl IntoIterator<Item = (S, S)>) -> anyhow::Result<Self> {
        let raw: RawConfig = serde_env::from_iter(vars)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            clientside_api_domain,
            admin_access_token,
            table_page_size,
        } = raw;

        let mut config = Self::default();
        if let Some(domain) = clientside_api_domain {
            info!("Using provided CLIENTSIDE_API_DOMAIN: {domain}");
            config.api_base_url = domain;
        }
        config.access_token = admin_access_token.filter(|token| !token.trim().is_empty());
        if let Some(size) = table_page_size {
            if size == 0 {
                anyhow::bail!("TABLE_PAGE_SIZE must be greater than zero");
            }
            config.page_size = size;
        }
        Ok(config)
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(if cfg!(feature = "env_local") {
            "http://localhost:3000"
        } else if cfg!(feature = "env_test") {
            "https://test.reduced.to"
        } else {
            "https://reduced.to"
        })
    }
}
