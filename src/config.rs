use std::fmt;
use std::path::Path;

use tracing::trace;

use crate::Endpoint;

/// Default location of the target list, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "urls.yaml";

/// Monitor configuration
///
/// The target list lives under the single `urls` key. `interval` and `timeout`
/// are optional and fall back to the fixed defaults.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub urls: Vec<Endpoint>,

    /// Seconds between the end of one check cycle and the start of the next
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Per-probe timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: vec![],
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_interval() -> u64 {
    30
}

fn default_timeout() -> u64 {
    5
}

/// Errors raised while reading the target list definition
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read (missing, permissions, ...)
    Io(std::io::Error),

    /// The file was read but its content does not describe a target list
    Malformed(String),

    /// The file extension does not map to a known format
    UnsupportedFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read configuration: {}", err),
            ConfigError::Malformed(msg) => write!(f, "invalid configuration: {}", msg),
            ConfigError::UnsupportedFormat(ext) => {
                write!(f, "unsupported configuration format: '{}'", ext)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            _ => Err(ConfigError::UnsupportedFormat(ext)),
        }
    }
}

impl Config {
    /// Reject settings the monitor cannot run with
    fn validate(self) -> Result<Self, ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::Malformed(
                "'interval' must be at least 1 second".to_string(),
            ));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Malformed(
                "'timeout' must be at least 1 second".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Parse a configuration document in the given format
fn parse(content: &str, format: Format) -> Result<Config, ConfigError> {
    let config: Config = match format {
        Format::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))?
        }
        Format::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))?
        }
        Format::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))?
        }
    };
    config.validate()
}

/// Read and parse the configuration file at `path`
///
/// The format is picked from the file extension (`.json`, `.yaml`/`.yml` or `.toml`).
pub fn read_config_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let file_content = std::fs::read_to_string(path)?;
    parse(&file_content, format).inspect(|config| trace!("loaded config: {config:?}"))
}
