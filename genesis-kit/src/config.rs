//! Gateway credentials and environment selection.
//!
//! A [`Config`] is an explicit value handed to the request pipeline and to
//! the notification verifier; nothing here is global.

use std::{fmt::Display, str::FromStr, time::Duration};

use base64::{Engine, prelude::BASE64_STANDARD};
use bon::Builder;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::{
    errors::{Error, Result},
    request::Endpoint,
};

/// Version of this client library, reported in the `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base domain of the Genesis gateway.
pub const DEFAULT_DOMAIN: &str = "e-comprocessing.net";

/// Default protocol for gateway requests.
pub const DEFAULT_PROTOCOL: &str = "https";

/// Default port for gateway requests.
pub const DEFAULT_PORT: u16 = 443;

const NETWORK_TIMEOUT: Duration = Duration::from_secs(60);

/// Target environment of the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    /// `prod`, `production` and `live` (any case) select production;
    /// everything else is staging.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let production = ["prod", "production", "live"]
            .iter()
            .any(|name| value.trim().eq_ignore_ascii_case(name));
        Ok(if production {
            Environment::Production
        } else {
            Environment::Staging
        })
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Gateway service a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubDomain {
    /// The processing gateway.
    Gateway,
    /// The hosted web payment form.
    Wpf,
}

impl SubDomain {
    /// Host prefix of this service in `environment`.
    pub fn prefix(&self, environment: Environment) -> &'static str {
        match (self, environment) {
            (SubDomain::Gateway, Environment::Production) => "gate.",
            (SubDomain::Gateway, Environment::Staging) => "staging.gate.",
            (SubDomain::Wpf, Environment::Production) => "wpf.",
            (SubDomain::Wpf, Environment::Staging) => "staging.wpf.",
        }
    }
}

/// Merchant credentials and gateway location.
///
/// ```
/// use genesis_kit::config::{Config, Environment, SubDomain};
///
/// let config = Config::builder()
///     .username("merchant")
///     .password("secret")
///     .token("terminal-token")
///     .environment("live".parse().unwrap())
///     .build();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.environment, Environment::Production);
/// assert_eq!(
///     config.environment_url(SubDomain::Gateway).unwrap().as_str(),
///     "https://gate.e-comprocessing.net/"
/// );
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// API username.
    #[builder(into)]
    pub username: String,
    /// API password, also the shared secret of notification signatures.
    #[builder(into)]
    pub password: String,
    /// Terminal token, appended to token-scoped request URLs.
    #[builder(into)]
    pub token: Option<String>,
    /// Target environment.
    #[builder(default)]
    #[serde(default)]
    pub environment: Environment,
    /// Base domain of the gateway.
    #[builder(into, default = DEFAULT_DOMAIN.to_string())]
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Request protocol.
    #[builder(into, default = DEFAULT_PROTOCOL.to_string())]
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Request port.
    #[builder(default = DEFAULT_PORT)]
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_protocol() -> String {
    DEFAULT_PROTOCOL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    /// Rejects blank credentials.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidArgument("username must not be blank".to_string()));
        }
        if self.password.trim().is_empty() {
            return Err(Error::InvalidArgument("password must not be blank".to_string()));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::InvalidArgument("domain must not be blank".to_string()));
        }
        Ok(())
    }

    /// Base URL of `sub_domain` in the configured environment.
    pub fn environment_url(&self, sub_domain: SubDomain) -> Result<Url> {
        let raw = format!(
            "{}://{}{}:{}",
            self.protocol,
            sub_domain.prefix(self.environment),
            self.domain,
            self.port
        );
        Url::parse(&raw).map_err(|err| Error::InvalidArgument(format!("invalid gateway URL {raw}: {err}")))
    }

    /// Full URL of `endpoint`, with the terminal token appended when the
    /// endpoint is token-scoped.
    pub fn request_url(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self.environment_url(endpoint.sub_domain)?;
        let path = if endpoint.append_token {
            let token = self
                .token
                .as_deref()
                .filter(|token| !token.trim().is_empty())
                .ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "a terminal token is required for /{}",
                        endpoint.path
                    ))
                })?;
            format!("{}/{}", endpoint.path, token)
        } else {
            endpoint.path.to_string()
        };
        url.set_path(&path);
        Ok(url)
    }

    /// Value of the `Authorization` header.
    pub fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }

    /// Value of the `User-Agent` header.
    pub fn user_agent(&self) -> String {
        format!("Genesis Rust Client {VERSION}")
    }

    /// Timeout transports should apply to a gateway call.
    pub fn network_timeout(&self) -> Duration {
        NETWORK_TIMEOUT
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> Config {
        Config::builder()
            .username("merchant")
            .password("secret")
            .token("terminal")
            .build()
    }

    #[test]
    fn environment_names() {
        for name in ["prod", "Production", "LIVE", " live "] {
            assert_eq!(name.parse::<Environment>().unwrap(), Environment::Production);
        }
        for name in ["sandbox", "staging", "", "develop"] {
            assert_eq!(name.parse::<Environment>().unwrap(), Environment::Staging);
        }
    }

    #[test]
    fn staging_urls() {
        let config = config();

        assert_eq!(
            config.environment_url(SubDomain::Gateway).unwrap().as_str(),
            "https://staging.gate.e-comprocessing.net/"
        );
        assert_eq!(
            config.environment_url(SubDomain::Wpf).unwrap().as_str(),
            "https://staging.wpf.e-comprocessing.net/"
        );
    }

    #[test]
    fn request_url_appends_token() {
        let config = config();

        let url = config.request_url(&Endpoint::gateway("process", true)).unwrap();
        assert_eq!(url.as_str(), "https://staging.gate.e-comprocessing.net/process/terminal");

        let url = config
            .request_url(&Endpoint::gateway("retrieval_requests/by_date", false))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://staging.gate.e-comprocessing.net/retrieval_requests/by_date"
        );
    }

    #[test]
    fn token_scoped_url_without_token() {
        let config = Config::builder().username("u").password("p").build();
        assert!(matches!(
            config.request_url(&Endpoint::gateway("process", true)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn custom_port_is_kept() {
        let config = Config::builder()
            .username("u")
            .password("p")
            .port(8443)
            .build();
        assert_eq!(
            config.environment_url(SubDomain::Gateway).unwrap().as_str(),
            "https://staging.gate.e-comprocessing.net:8443/"
        );
    }

    #[test]
    fn basic_auth_header() {
        assert_eq!(config().basic_auth(), "Basic bWVyY2hhbnQ6c2VjcmV0");
    }

    #[test]
    fn validate_rejects_blank_credentials() {
        let config = Config::builder().username(" ").password("p").build();
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));

        let config = Config::builder().username("u").password("").build();
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_value(json!({
            "username": "merchant",
            "password": "secret",
            "environment": "production"
        }))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.domain, DEFAULT_DOMAIN);
        assert_eq!(config.port, 443);
        assert_eq!(config.token, None);
    }
}
