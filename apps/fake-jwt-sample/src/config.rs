//! Service configuration.
//!
//! Layered with figment: built-in defaults, then the optional YAML file, then
//! `FAKE_JWT__`-prefixed environment variables (`__` separates nested keys,
//! e.g. `FAKE_JWT__AUTH__BEARER_VALUE_TYPE=jwt`).

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use fake_jwt_bearer::FakeJwtBearerConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "FAKE_JWT__";

const DEFAULT_PORT: u16 = 8087;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Fake JWT bearer scheme settings.
    pub auth: FakeJwtBearerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            auth: FakeJwtBearerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Provider chain for the configuration, lowest precedence first.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a source holds a malformed value or an unknown key.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}
