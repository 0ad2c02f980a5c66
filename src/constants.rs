//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Name given to the request the panel starts with
pub const DEFAULT_REQUEST_NAME: &str = "New Request";

/// Content type that switches the response viewer into JSON mode.
/// Matched as a case-sensitive substring of the raw header value.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Label shown when no environment is selected
pub const NO_ENVIRONMENT_LABEL: &str = "No Environment";

/// Environment variable that overrides the configured host command
pub const HOST_COMMAND_ENV: &str = "REQUEST_PANEL_HOST";

/// Directory name used under the platform config dir
pub const CONFIG_DIR_NAME: &str = "request-panel";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default log file (the terminal belongs to the view)
pub const DEFAULT_LOG_FILE: &str = "request-panel.log";

/// Application name
pub const APP_NAME: &str = "Request Panel";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
