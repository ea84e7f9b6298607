//! Connection parameters and client construction.
//!
//! Each request carries its own connection parameters; nothing here is shared
//! or reused across requests.

use std::time::Duration;

use anyhow::{Context, Result};
use mongodb::{
    Client,
    bson::doc,
    options::{ClientOptions, Tls, TlsOptions},
};

/// Shape of the `url` query parameter, resolved once before validation.
///
/// A query string may carry `url` zero times, once, or repeatedly for
/// multi-host clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlParam {
    Missing,
    Single(String),
    Multi(Vec<String>),
}

impl UrlParam {
    /// Collect every `url` value from the raw query pairs, preserving order.
    pub fn from_query(params: &[(String, String)]) -> Self {
        let mut values: Vec<String> = params
            .iter()
            .filter(|(key, _)| key == "url")
            .map(|(_, value)| value.clone())
            .collect();

        match values.len() {
            0 => Self::Missing,
            1 => Self::Single(values.remove(0)),
            _ => Self::Multi(values),
        }
    }
}

/// The `url` parameter was missing, empty, or contained an empty host entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid URL parameter")]
pub struct InvalidUrlParameter;

/// Validated connection parameters for a single request.
///
/// Built once from the query string, immutable afterwards, and discarded when
/// the request closes its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    hosts: Vec<String>,
    replica_set: Option<String>,
    max_pool_size: Option<u32>,
    ssl: bool,
    tls: bool,
}

impl ConnectionDescriptor {
    /// Build a descriptor from the raw query pairs.
    ///
    /// `replicaSet` is passed through verbatim. A non-numeric or
    /// non-positive `maxPoolSize` is ignored with a warning rather than
    /// rejected. `ssl` and `tls` are true only when byte-equal to the
    /// literal `"true"`.
    pub fn from_query(params: &[(String, String)]) -> Result<Self, InvalidUrlParameter> {
        let hosts = match UrlParam::from_query(params) {
            UrlParam::Missing => return Err(InvalidUrlParameter),
            UrlParam::Single(host) => vec![host],
            UrlParam::Multi(hosts) => hosts,
        };

        if hosts.iter().any(String::is_empty) {
            return Err(InvalidUrlParameter);
        }

        let replica_set = first_value(params, "replicaSet").map(str::to_string);

        let max_pool_size = first_value(params, "maxPoolSize")
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match raw.parse::<u32>() {
                Ok(size) if size > 0 => Some(size),
                Ok(_) | Err(_) => {
                    tracing::warn!("Ignoring invalid maxPoolSize value '{}'", raw);
                    None
                }
            });

        let ssl = first_value(params, "ssl") == Some("true");
        let tls = first_value(params, "tls") == Some("true");

        Ok(Self {
            hosts,
            replica_set,
            max_pool_size,
            ssl,
            tls,
        })
    }

    /// Render the host list as a `mongodb://` connection string.
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}", self.hosts.join(","))
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// The Rust driver has a single TLS switch; either flag enables it.
    fn tls_requested(&self) -> bool {
        self.ssl || self.tls
    }
}

/// First value for a query key; repeated keys beyond the first are ignored
/// except for `url`.
pub fn first_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.as_str())
}

/// Open one client for this request and verify connectivity eagerly.
///
/// The ping makes unreachable hosts fail here rather than partway through a
/// scan.
pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<Client> {
    tracing::info!("Connecting to MongoDB at {}", descriptor.hosts().join(","));

    let mut options = ClientOptions::parse(descriptor.connection_string())
        .await
        .context("Failed to parse MongoDB connection URL")?;

    options.repl_set_name = descriptor.replica_set.clone();
    options.max_pool_size = descriptor.max_pool_size;
    if descriptor.tls_requested() {
        options.tls = Some(Tls::Enabled(TlsOptions::default()));
    }
    options.connect_timeout = Some(Duration::from_secs(10));
    options.server_selection_timeout = Some(Duration::from_secs(30));

    let client = Client::with_options(options).context("Failed to create MongoDB client")?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .context("Failed to reach MongoDB")?;

    tracing::info!("Connection established successfully");

    Ok(client)
}
