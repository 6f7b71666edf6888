//! HTTP transport for the Conduit API.
//!
//! Construction is offline. [`ConduitClient::authenticate`] performs the first
//! network call, so tests and tooling can build a client without a server.

use crate::domain::{StackError, StackResult, UserIdentity};
use crate::infra::app_config::AppConfig;
use crate::infra::conduit::cache::RevisionExistsCache;
use crate::infra::conduit::envelope::parse_envelope;
use crate::infra::conduit::traits::Conduit;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::{Map, Value, json};

pub const MOZILLA_PHABRICATOR_PROD: &str = "https://phabricator.services.mozilla.com/api/";
pub const HGMO_JSON_REV_URL_TEMPLATE: &str = "https://hg.mozilla.org/mozilla-central/json-rev/{}";

pub struct ConduitClient {
    url: Url,
    token: String,
    http: Client,
    user: Option<UserIdentity>,
    canonical_rev_url: String,
    canonical_cache: RevisionExistsCache,
}

impl std::fmt::Debug for ConduitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConduitClient")
            .field("url", &self.url.as_str())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl ConduitClient {
    /// Build an unauthenticated client. `url` must end with `/api/`.
    pub fn new(url: &str, token: impl Into<String>) -> StackResult<Self> {
        let url = parse_api_url(url)?;
        let http = Client::builder()
            .user_agent(concat!("phabstack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StackError::InvalidConfig(format!("build http client: {err}")))?;

        Ok(Self {
            url,
            token: token.into(),
            http,
            user: None,
            canonical_rev_url: HGMO_JSON_REV_URL_TEMPLATE.to_string(),
            canonical_cache: RevisionExistsCache::default(),
        })
    }

    pub fn from_config(config: &AppConfig) -> StackResult<Self> {
        let token = config.api_token.clone().ok_or_else(|| {
            StackError::InvalidConfig("no API token configured (set PHABSTACK_API_TOKEN)".into())
        })?;
        Self::new(&config.api_url, token)?
            .with_canonical_history(&config.canonical_rev_url, config.cache_capacity)
    }

    /// Point the canonical history lookup at `url_template` (`{}` is replaced
    /// by the revision) with a cache holding at most `capacity` revisions.
    pub fn with_canonical_history(
        mut self,
        url_template: &str,
        capacity: usize,
    ) -> StackResult<Self> {
        if !url_template.contains("{}") {
            return Err(StackError::InvalidConfig(format!(
                "canonical revision url {url_template:?} has no {{}} placeholder"
            )));
        }
        self.canonical_rev_url = url_template.to_string();
        self.canonical_cache = RevisionExistsCache::new(capacity)?;
        Ok(self)
    }

    /// Check the token against `user.whoami` and remember the identity.
    pub fn authenticate(&mut self) -> StackResult<&UserIdentity> {
        let user = self.whoami()?;
        log::info!("Authenticated on {} as {}", self.url, user.real_name);
        Ok(&*self.user.insert(user))
    }

    /// Identity from the last successful [`ConduitClient::authenticate`].
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Whether `revision` has landed on canonical history.
    ///
    /// A 404 answers `false` instead of failing; every other non-2xx status is
    /// an error. Positive answers are served from a bounded LRU cache
    /// afterwards, negative ones are asked again.
    pub fn revision_exists_on_canonical(&self, revision: &str) -> StackResult<bool> {
        if self.canonical_cache.contains(revision) {
            return Ok(true);
        }

        let url = self.canonical_rev_url.replace("{}", revision);
        let response = self.http.get(&url).send().map_err(|err| StackError::Transport {
            method: url.clone(),
            message: err.to_string(),
        })?;

        match response.status() {
            status if status.is_success() => {
                self.canonical_cache.insert(revision);
                Ok(true)
            }
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StackError::HttpStatus {
                method: url,
                status: status.as_u16(),
            }),
        }
    }
}

impl Conduit for ConduitClient {
    fn call(&self, method: &str, params: Value) -> StackResult<Value> {
        let endpoint = self
            .url
            .join(method)
            .map_err(|err| StackError::InvalidConfig(format!("bad method {method:?}: {err}")))?;
        let payload = with_token(method, params, &self.token)?;

        log::debug!("Conduit call {method}");
        let response = self
            .http
            .post(endpoint)
            .form(&[("params", payload.to_string()), ("output", "json".to_string())])
            .send()
            .map_err(|err| StackError::Transport {
                method: method.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StackError::HttpStatus {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|err| StackError::Transport {
            method: method.to_string(),
            message: err.to_string(),
        })?;
        parse_envelope(method, &body)
    }
}

fn parse_api_url(url: &str) -> StackResult<Url> {
    if !url.ends_with("/api/") {
        return Err(StackError::InvalidConfig(format!(
            "Phabricator API url must end with /api/, got {url:?}"
        )));
    }
    Url::parse(url).map_err(|err| StackError::InvalidConfig(format!("bad API url {url:?}: {err}")))
}

/// Attach the `__conduit__` auth block to the call parameters.
fn with_token(method: &str, params: Value, token: &str) -> StackResult<Value> {
    let mut object = match params {
        Value::Object(object) => object,
        Value::Null => Map::new(),
        other => {
            return Err(StackError::Transport {
                method: method.to_string(),
                message: format!("params must be a JSON object, got {other}"),
            });
        }
    };
    object.insert("__conduit__".to_string(), json!({ "token": token }));
    Ok(Value::Object(object))
}
