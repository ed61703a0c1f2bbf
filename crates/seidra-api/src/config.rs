//! Server configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use seidra_media::CommandTemplate;
use seidra_store::StoreLayout;

use crate::error::AppError;

/// Everything the binary needs to open its stores and register backends.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Root directory of the record stores.
    pub data_dir: PathBuf,
    /// Directory backends write artifacts into.
    pub artifacts_dir: PathBuf,
    /// On-disk layout of the record stores.
    pub store_layout: StoreLayout,
    /// Backend used when a render request names none.
    pub default_model_name: String,
    /// Command for the `local` image backend, if any.
    pub local_image_command: Option<CommandTemplate>,
    /// Command for the `local` video backend, if any.
    pub local_video_command: Option<CommandTemplate>,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, applying defaults for unset
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let data_dir = PathBuf::from(lookup("SEIDRA_DATA_DIR").unwrap_or_else(|| "data".into()));
        let artifacts_dir = lookup("SEIDRA_ARTIFACTS_DIR")
            .map_or_else(|| data_dir.join("artifacts"), PathBuf::from);
        let store_layout = match lookup("SEIDRA_STORE_LAYOUT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("SEIDRA_STORE_LAYOUT: {e}")))?,
            None => StoreLayout::default(),
        };
        let default_model_name = lookup("SEIDRA_DEFAULT_MODEL_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "stub".to_string());

        Ok(Self {
            host,
            port,
            data_dir,
            artifacts_dir,
            store_layout,
            default_model_name,
            local_image_command: command(&lookup, "SEIDRA_LOCAL_IMAGE_COMMAND")?,
            local_video_command: command(&lookup, "SEIDRA_LOCAL_VIDEO_COMMAND")?,
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if host and port do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

/// An unset or blank variable disables the backend.
fn command(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<CommandTemplate>, AppError> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => CommandTemplate::new(raw)
            .map(Some)
            .map_err(|e| AppError::Config(format!("{name}: {e}"))),
        _ => Ok(None),
    }
}
