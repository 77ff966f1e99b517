use {std::env, std::time::Duration, thiserror::Error};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent means the in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub max_connections: u32,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: "0.0.0.0:3000".into(),
            max_connections: 10,
            request_timeout: Duration::from_secs(10),
            max_upload_bytes: 1024 * 1024,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Read configuration from the process environment, after loading `.env`
    /// if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            bind_addr: env::var("AUDIT_FLOW_BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parsed("AUDIT_FLOW_MAX_CONNECTIONS", defaults.max_connections)?,
            request_timeout: Duration::from_secs(parsed(
                "AUDIT_FLOW_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            max_upload_bytes: parsed("AUDIT_FLOW_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}
