//! Connection configuration for the FalkorDB gateway.
//!
//! Every field is resolved once, at construction time, in priority order:
//! 1. Explicit arguments ([`ConnectionOptions`])
//! 2. Environment variables (`FALKORDB_` prefix)
//! 3. Config file (optional, top-level keys)
//! 4. Defaults
//!
//! Empty strings, a zero port and zero timeouts count as "not given",
//! matching how tool callers usually pass blanks. A zero that survives to the
//! resolved config (from the environment or the file) falls back to the
//! default; a zero query timeout means no timeout.

use std::fmt;

use serde::Deserialize;

use crate::error::CoreError;

pub const ENV_PREFIX: &str = "FALKORDB";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_GRAPH: &str = "agno";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Caller-supplied connection arguments. Anything left `None` falls back.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub graph_name: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub query_timeout_ms: Option<u64>,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn graph_name(mut self, graph_name: impl Into<String>) -> Self {
        self.graph_name = Some(graph_name.into());
        self
    }

    pub fn connect_timeout_ms(mut self, millis: u64) -> Self {
        self.connect_timeout_ms = Some(millis);
        self
    }

    pub fn query_timeout_ms(mut self, millis: u64) -> Self {
        self.query_timeout_ms = Some(millis);
        self
    }
}

/// Fully resolved connection settings. Immutable once built.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(rename = "graph")]
    pub graph_name: String,
    pub connect_timeout_ms: u64,
    /// No timeout when unset; the query runs as long as the server lets it.
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,
}

impl ConnectionConfig {
    /// Resolve against the process environment, without a config file.
    pub fn resolve(options: &ConnectionOptions) -> Result<Self, CoreError> {
        ConfigLoader::new().resolve(options)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            graph_name: DEFAULT_GRAPH.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            query_timeout_ms: None,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("graph_name", &self.graph_name)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("query_timeout_ms", &self.query_timeout_ms)
            .finish()
    }
}

/// Builds a [`ConnectionConfig`] from layered sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file_prefix: Option<String>,
    env: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a config file (e.g. `graphgate` for `graphgate.toml`) if it exists.
    pub fn with_file(mut self, file_prefix: impl Into<String>) -> Self {
        self.file_prefix = Some(file_prefix.into());
        self
    }

    /// Use these variables instead of the process environment.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn resolve(&self, options: &ConnectionOptions) -> Result<ConnectionConfig, CoreError> {
        let mut builder = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("graph", DEFAULT_GRAPH)?
            .set_default("connect_timeout_ms", DEFAULT_CONNECT_TIMEOUT_MS as i64)?;

        if let Some(prefix) = &self.file_prefix {
            builder = builder.add_source(config::File::with_name(prefix).required(false));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .ignore_empty(true)
                    .source(self.env.clone()),
            )
            .set_override_option("host", non_empty(&options.host))?
            .set_override_option("port", options.port.filter(|p| *p != 0).map(i64::from))?
            .set_override_option("username", non_empty(&options.username))?
            .set_override_option("password", non_empty(&options.password))?
            .set_override_option("graph", non_empty(&options.graph_name))?
            .set_override_option("connect_timeout_ms", non_zero(options.connect_timeout_ms))?
            .set_override_option("query_timeout_ms", non_zero(options.query_timeout_ms))?;

        let mut resolved: ConnectionConfig = builder.build()?.try_deserialize()?;
        if resolved.port == 0 {
            resolved.port = DEFAULT_PORT;
        }
        if resolved.connect_timeout_ms == 0 {
            resolved.connect_timeout_ms = DEFAULT_CONNECT_TIMEOUT_MS;
        }
        resolved.query_timeout_ms = resolved.query_timeout_ms.filter(|ms| *ms != 0);

        tracing::debug!(config = ?resolved, "Resolved FalkorDB connection config");
        Ok(resolved)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

fn non_zero(millis: Option<u64>) -> Option<i64> {
    millis.filter(|ms| *ms != 0).map(|ms| ms as i64)
}
