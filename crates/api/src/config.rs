//! Application configuration loaded from environment variables.

/// Server and collaborator configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `UPSTREAM_BASE_URL` — base URL the collaborator URLs derive from
///   (default: `"http://localhost:7000"`)
/// - `CART_URL`, `CATALOG_URL`, `CURRENCY_URL`, `SHIPPING_URL`,
///   `PAYMENT_URL`, `EMAIL_URL` — per-collaborator overrides
/// - `UPSTREAM_TIMEOUT_SECS` — timeout for every collaborator call
///   (default: `10`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cart_url: String,
    pub catalog_url: String,
    pub currency_url: String,
    pub shipping_url: String,
    pub payment_url: String,
    pub email_url: String,
    pub upstream_timeout_secs: u64,
}

const DEFAULT_UPSTREAM_BASE: &str = "http://localhost:7000";

fn collaborator_url(var: &str, base: &str, path: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| format!("{base}{path}"))
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let base = std::env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE.to_string());

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cart_url: collaborator_url("CART_URL", &base, "/cart"),
            catalog_url: collaborator_url("CATALOG_URL", &base, "/product"),
            currency_url: collaborator_url("CURRENCY_URL", &base, "/currency"),
            shipping_url: collaborator_url("SHIPPING_URL", &base, "/shipping"),
            payment_url: collaborator_url("PAYMENT_URL", &base, "/payment"),
            email_url: collaborator_url("EMAIL_URL", &base, "/email"),
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            cart_url: format!("{DEFAULT_UPSTREAM_BASE}/cart"),
            catalog_url: format!("{DEFAULT_UPSTREAM_BASE}/product"),
            currency_url: format!("{DEFAULT_UPSTREAM_BASE}/currency"),
            shipping_url: format!("{DEFAULT_UPSTREAM_BASE}/shipping"),
            payment_url: format!("{DEFAULT_UPSTREAM_BASE}/payment"),
            email_url: format!("{DEFAULT_UPSTREAM_BASE}/email"),
            upstream_timeout_secs: 10,
        }
    }
}
