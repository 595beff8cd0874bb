use std::net::SocketAddr;
use std::path::Path;

use folio_sdk::PortfolioConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Room for the JSON envelope and text fields around the image.
const BODY_HEADROOM: usize = 64 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub portfolio: PortfolioConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            portfolio: PortfolioConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.portfolio.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Largest request body accepted: a base64-encoded image at the
    /// configured limit plus headroom.
    pub fn body_limit(&self) -> usize {
        body_limit_for(self.portfolio.max_image_bytes)
    }
}

pub(crate) fn body_limit_for(max_image_bytes: u64) -> usize {
    let encoded = max_image_bytes.div_ceil(3).saturating_mul(4);
    usize::try_from(encoded)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_HEADROOM)
}
