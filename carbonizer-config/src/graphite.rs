//! Graphite/Carbon endpoint configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// The `graphite` section: where metrics go and their namespace root.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct GraphiteConfig {
    /// Carbon host.
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Carbon plaintext port.
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Namespace root prepended to every metric name.
    #[serde(default = "default_prefix")]
    #[validate(length(min = 1))]
    pub prefix: String,
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    2003
}

fn default_prefix() -> String {
    "pglog".into()
}

impl Default for GraphiteConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefix: default_prefix(),
        }
    }
}
