use std::env;

/// Backend origin used when `API_BASE_URL` is not set outside production.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// AppConfig
///
/// Holds the dashboard host's configuration. Loaded once at startup and shared
/// read-only through the application state via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which variables are mandatory.
    pub env: Env,
    // Single backend origin every Gateway request is prefixed with.
    pub api_base_url: String,
    // Socket address the dashboard host listens on.
    pub bind_addr: String,
    // Directory holding the built SPA bundle (index.html plus assets).
    pub dist_dir: String,
}

/// Env
///
/// Runtime context: local development or a production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests. Does not touch the environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            dist_dir: "dist".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `API_BASE_URL` is missing. The backend origin is a
    /// deploy-time decision and must not silently default to localhost.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => env::var("API_BASE_URL")
                .expect("FATAL: API_BASE_URL must be set in production."),
            Env::Local => {
                env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            }
        };

        Self {
            env,
            api_base_url,
            bind_addr: env::var("DASHBOARD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            dist_dir: env::var("DASHBOARD_DIST_DIR").unwrap_or_else(|_| "dist".to_string()),
        }
    }
}
