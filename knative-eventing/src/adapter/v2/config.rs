use super::error::Error;
use crate::observability;
use knative::leaderelection::ComponentConfig;
use knative::logging::{self, Logger};
use knative::source_types::CloudEventOverrides;
use knative::types::NamespacedName;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub const ENV_CONFIG_COMPONENT: &str = "K_COMPONENT";
pub const ENV_CONFIG_NAMESPACE: &str = "NAMESPACE";
pub const ENV_CONFIG_NAME: &str = "NAME";
pub const ENV_CONFIG_RESOURCE_GROUP: &str = "K_RESOURCE_GROUP";
pub const ENV_CONFIG_SINK: &str = "K_SINK";
pub const ENV_CONFIG_AUDIENCE: &str = "K_AUDIENCE";
pub const ENV_CONFIG_OIDC_SERVICE_ACCOUNT: &str = "K_OIDC_SERVICE_ACCOUNT";
pub const ENV_CONFIG_CA_CERT: &str = "K_CA_CERTS";
pub const ENV_CONFIG_CE_OVERRIDES: &str = "K_CE_OVERRIDES";
pub const ENV_CONFIG_LOGGING_CONFIG: &str = "K_LOGGING_CONFIG";
pub const ENV_CONFIG_OBSERVABILITY_CONFIG: &str = "K_OBSERVABILITY_CONFIG";
pub const ENV_CONFIG_LEADER_ELECTION_CONFIG: &str = "K_LEADER_ELECTION_CONFIG";
pub const ENV_SINK_TIMEOUT: &str = "K_SINK_TIMEOUT";

pub const DEFAULT_NAME: &str = "adapter";
pub const DEFAULT_RESOURCE_GROUP: &str = "adapter.sources.knative.dev";

/// Sink timeout meaning no timeout is applied.
pub const NO_SINK_TIMEOUT: i64 = -1;

/// Builds the [`EnvConfigAccessor`] of an adapter, usually from the process environment.
pub type EnvConfigConstructor = fn() -> Box<dyn EnvConfigAccessor>;

/// EnvConfig is the minimal set of configuration parameters
/// source adapters should support.
#[derive(Debug)]
pub struct EnvConfig {
    /// Component is the kind of this adapter.
    pub component: String,
    /// The namespace of the adapter.
    pub namespace: String,
    /// The name of the adapter.
    pub name: String,
    /// The resource group of the adapter, used for metrics.
    pub resource_group: String,
    /// Sink is the URI messages will be sent.
    pub sink: String,
    /// Audience is the audience of the target sink.
    pub audience: Option<String>,
    /// The name of the service account the adapter authenticates as.
    pub oidc_service_account_name: Option<String>,
    /// CACerts are the Certification Authority (CA) certificates in PEM format
    /// according to https://www.rfc-editor.org/rfc/rfc7468.
    pub ca_certs: Option<String>,
    /// CEOverrides are the CloudEvents overrides to be applied to the outbound event.
    pub ce_overrides: String,
    /// A JSON encoded [`logging::Config`], copied from the controller's namespace.
    pub logging_config_json: String,
    /// A JSON encoded [`observability::Config`], copied from the controller's namespace.
    pub observability_config_json: String,
    /// A JSON encoded [`ComponentConfig`].
    pub leader_election_config_json: String,
    /// Time in seconds to wait for the sink to respond.
    pub env_sink_timeout: String,

    logger: Mutex<Option<Logger>>,
}

/// Accessors for the minimal set of source adapter configuration parameters.
pub trait EnvConfigAccessor: Send + Sync {
    /// Set the component name.
    fn set_component(&mut self, component: &str);

    /// Get the URI where messages will be forwarded to.
    fn sink(&self) -> &str;

    /// The CA certificates of the sink.
    fn ca_certs(&self) -> Option<&str>;

    /// The audience of the target sink.
    fn audience(&self) -> Option<&str>;

    /// The service account of the adapter, qualified by the adapter's namespace.
    fn oidc_service_account_name(&self) -> Option<NamespacedName>;

    /// Get the namespace of the adapter.
    fn namespace(&self) -> &str;

    /// Get the name of the adapter.
    fn name(&self) -> &str;

    /// Get the parsed logger.
    fn logger(&self) -> Logger;

    fn cloud_event_overrides(&self) -> Result<CloudEventOverrides, Error>;

    fn observability_config(&self) -> Result<observability::Config, Error>;

    /// Returns the leader election configuration.
    ///
    /// A malformed configuration yields the default configuration together with
    /// the decode error, so callers may decide whether to carry on with it.
    /// Negative durations decode as zero.
    fn leader_election_config(&self) -> (ComponentConfig, Option<Error>);

    /// Get the timeout to apply on a request to a sink, [`NO_SINK_TIMEOUT`] if unset.
    fn sink_timeout(&self) -> i64;
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig::from_lookup(|_| None)
    }
}

impl EnvConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> EnvConfig {
        EnvConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable or `None` if it is unset. Defaults replace unset and empty values.
    pub fn from_lookup<F>(lookup: F) -> EnvConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).unwrap_or_default();
        let value_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        EnvConfig {
            component: value(ENV_CONFIG_COMPONENT),
            namespace: value(ENV_CONFIG_NAMESPACE),
            name: value_or(ENV_CONFIG_NAME, DEFAULT_NAME),
            resource_group: value_or(ENV_CONFIG_RESOURCE_GROUP, DEFAULT_RESOURCE_GROUP),
            sink: value(ENV_CONFIG_SINK),
            audience: lookup(ENV_CONFIG_AUDIENCE),
            oidc_service_account_name: lookup(ENV_CONFIG_OIDC_SERVICE_ACCOUNT),
            ca_certs: lookup(ENV_CONFIG_CA_CERT),
            ce_overrides: value(ENV_CONFIG_CE_OVERRIDES),
            logging_config_json: value_or(ENV_CONFIG_LOGGING_CONFIG, "{}"),
            observability_config_json: value_or(ENV_CONFIG_OBSERVABILITY_CONFIG, "{}"),
            leader_election_config_json: value(ENV_CONFIG_LEADER_ELECTION_CONFIG),
            env_sink_timeout: value(ENV_SINK_TIMEOUT),
            logger: Mutex::new(None),
        }
    }

    /// Use `logger` instead of building one from the logging config.
    pub fn with_logger(mut self, logger: Logger) -> EnvConfig {
        self.logger = Mutex::new(Some(logger));
        self
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// The decoded logging config, or the default config if it is malformed.
    fn logging_config(&self) -> logging::Config {
        match logging::json_to_config(&self.logging_config_json) {
            Ok(config) => config,
            Err(_) => match logging::Config::from_map(&BTreeMap::new()) {
                Ok(config) => config,
                // nothing can be reported without a logger
                Err(err) => panic!("unable to build default logging config: {err}"),
            },
        }
    }

    fn default_leader_election_config(&self) -> ComponentConfig {
        ComponentConfig {
            component: self.component.clone(),
            buckets: 1,
            lease_duration: Duration::from_secs(15),
            renew_deadline: Duration::from_secs(10),
            retry_period: Duration::from_secs(2),
            identity: None,
        }
    }
}

impl EnvConfigAccessor for EnvConfig {
    fn set_component(&mut self, component: &str) {
        self.component = component.to_string();
    }

    fn sink(&self) -> &str {
        &self.sink
    }

    fn ca_certs(&self) -> Option<&str> {
        self.ca_certs.as_deref()
    }

    fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    fn oidc_service_account_name(&self) -> Option<NamespacedName> {
        self.oidc_service_account_name
            .as_ref()
            .map(|name| NamespacedName::new(self.namespace.as_str(), name.as_str()))
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn logger(&self) -> Logger {
        // the lock is held while building so concurrent first calls build one logger
        let mut cached = self.logger.lock().unwrap_or_else(PoisonError::into_inner);
        cached
            .get_or_insert_with(|| {
                logging::new_logger_from_config(&self.logging_config(), &self.component)
            })
            .clone()
    }

    fn cloud_event_overrides(&self) -> Result<CloudEventOverrides, Error> {
        if self.ce_overrides.is_empty() {
            return Ok(CloudEventOverrides::default());
        }
        decode(ENV_CONFIG_CE_OVERRIDES, &self.ce_overrides)
    }

    fn observability_config(&self) -> Result<observability::Config, Error> {
        decode(ENV_CONFIG_OBSERVABILITY_CONFIG, &self.observability_config_json)
    }

    fn leader_election_config(&self) -> (ComponentConfig, Option<Error>) {
        if self.leader_election_config_json.is_empty() {
            return (self.default_leader_election_config(), None);
        }

        let decoded = decode::<ComponentConfig>(
            ENV_CONFIG_LEADER_ELECTION_CONFIG,
            &self.leader_election_config_json,
        );
        match decoded {
            Ok(config) => (
                ComponentConfig {
                    component: self.component.clone(),
                    ..config
                },
                None,
            ),
            Err(err) => (self.default_leader_election_config(), Some(err)),
        }
    }

    fn sink_timeout(&self) -> i64 {
        match self.env_sink_timeout.parse::<i64>() {
            Ok(timeout) => timeout,
            Err(_) => {
                self.logger()
                    .warn("Sink timeout configuration is invalid, default to -1 (no timeout)");
                NO_SINK_TIMEOUT
            }
        }
    }
}

/// Decode the JSON value of `var`. A JSON `null` decodes to the zero value.
fn decode<T>(var: &'static str, raw: &str) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    serde_json::from_str::<Option<T>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|source| Error::Decode { var, source })
}

/// Encode a leader election config for [`ENV_CONFIG_LEADER_ELECTION_CONFIG`].
/// `None` encodes to the empty string, which decodes back to the default config.
pub fn leader_election_component_config_to_json(
    config: Option<&ComponentConfig>,
) -> Result<String, Error> {
    match config {
        Some(config) => serde_json::to_string(config).map_err(Error::Encode),
        None => Ok(String::new()),
    }
}

/// Read the sink timeout straight from the process environment, see [`parse_sink_timeout`].
pub fn get_sink_timeout(logger: Option<&Logger>) -> i64 {
    let raw = std::env::var(ENV_SINK_TIMEOUT).unwrap_or_default();
    parse_sink_timeout(&raw, logger)
}

/// Parse a raw sink timeout in seconds. An empty value is silently treated as
/// unset; a value that is not a non-negative integer is logged as an error.
/// Both yield [`NO_SINK_TIMEOUT`].
pub fn parse_sink_timeout(raw: &str, logger: Option<&Logger>) -> i64 {
    if raw.is_empty() {
        return NO_SINK_TIMEOUT;
    }

    match raw.parse::<i64>() {
        Ok(timeout) if timeout >= 0 => timeout,
        _ => {
            if let Some(logger) = logger {
                logger.error(format_args!(
                    "{ENV_SINK_TIMEOUT} environment value is invalid. \
                     It must be an integer greater than or equal to zero. (got {raw})"
                ));
            }
            NO_SINK_TIMEOUT
        }
    }
}
