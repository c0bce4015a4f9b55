//! Target registry - the list of monitored endpoints
//!
//! Loaded once at startup and never changed afterwards. A registry that failed
//! to load is simply empty; callers decide what "no targets" means for them.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::Endpoint;
use crate::config::{Config, ConfigError, read_config_file};

/// Immutable, cheaply cloneable list of endpoints
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Arc<[Endpoint]>,
}

impl TargetRegistry {
    /// Build a registry from an explicit list of endpoints
    ///
    /// Blank entries are dropped and duplicates are kept only once, in order of
    /// first appearance.
    pub fn new(targets: impl IntoIterator<Item = Endpoint>) -> Self {
        let mut seen = HashSet::new();
        let targets: Vec<Endpoint> = targets
            .into_iter()
            .filter(|endpoint| {
                if endpoint.as_str().trim().is_empty() {
                    warn!("ignoring blank target entry");
                    return false;
                }
                if !seen.insert(endpoint.clone()) {
                    warn!("{endpoint}: ignoring duplicate target entry");
                    return false;
                }
                true
            })
            .collect();

        Self {
            targets: targets.into(),
        }
    }

    /// Read the endpoints defined in the configuration file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Endpoint>, ConfigError> {
        read_config_file(path).map(|config| config.urls)
    }

    /// Load the registry from `path`, degrading to an empty registry on error
    ///
    /// Also returns the rest of the configuration (interval, timeout); its
    /// `urls` have been moved into the registry. A file that fails to load
    /// yields the default settings.
    pub fn from_file(path: impl AsRef<Path>) -> (Self, Config) {
        let path = path.as_ref();
        match read_config_file(path) {
            Ok(mut config) => {
                let registry = Self::new(std::mem::take(&mut config.urls));
                if registry.is_empty() {
                    warn!("{}: no targets configured", path.display());
                } else {
                    debug!("{}: loaded {} targets", path.display(), registry.len());
                }
                (registry, config)
            }
            Err(e) => {
                warn!("{}: {e}; starting without targets", path.display());
                (Self::default(), Config::default())
            }
        }
    }

    pub fn targets(&self) -> &[Endpoint] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}
