//! Server configuration

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_HMS_API_URL: &str = "https://api.100ms.live/v2";

/// Server configuration.
///
/// Resolved from environment variables, every value with a fallback:
/// - `HMS_MANAGEMENT_TOKEN`: management credential for room administration (default: empty)
/// - `HMS_ACCESS_KEY`: app access key used inside issued tokens (default: empty)
/// - `HMS_APP_SECRET`: app secret used to sign issued tokens (default: empty)
/// - `HMS_API_URL`: base URL of the 100ms management API (default: `https://api.100ms.live/v2`)
/// - `SUPABASE_URL`: Supabase project URL for credential rows (default: empty, disables the store)
/// - `SUPABASE_ANON_KEY`: Supabase API key (default: empty)
/// - `PORT`: HTTP listening port (default: 10000)
#[derive(Debug, Clone)]
pub struct Config {
    pub management_token: String,
    pub access_key: String,
    pub app_secret: String,
    pub hms_api_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            management_token: get("HMS_MANAGEMENT_TOKEN").unwrap_or_default(),
            access_key: get("HMS_ACCESS_KEY").unwrap_or_default(),
            app_secret: get("HMS_APP_SECRET").unwrap_or_default(),
            hms_api_url: get("HMS_API_URL")
                .filter(|url| !url.is_empty())
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_HMS_API_URL.to_string()),
            supabase_url: get("SUPABASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            supabase_anon_key: get("SUPABASE_ANON_KEY").unwrap_or_default(),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// Whether a database-backed credential store is configured.
    pub fn has_settings_store(&self) -> bool {
        !self.supabase_url.is_empty()
    }

    /// Get the socket address string.
    pub fn socket_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
