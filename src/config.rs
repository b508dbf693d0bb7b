use std::str::FromStr;
use std::time::Duration;

/// Object-storage connection settings. Absent endpoint means "use the in-memory store".
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub window: Duration,
    pub max_anonymous: u64,
    pub max_authenticated: u64,
    pub sweep_interval: Duration,
    /// Key clients by `Forwarded`/`X-Forwarded-For` instead of the socket peer.
    /// Only safe behind a reverse proxy that overwrites those headers.
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: Duration::from_secs(60),
            max_anonymous: 100,
            max_authenticated: 300,
            sweep_interval: Duration::from_secs(60),
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: parse_bool("RATE_LIMIT_ENABLED", defaults.enabled),
            window: parse_duration_secs("RATE_LIMIT_WINDOW_SECS", 60).max(Duration::from_secs(1)),
            max_anonymous: parse_env("RATE_LIMIT_MAX_ANON", defaults.max_anonymous),
            max_authenticated: parse_env("RATE_LIMIT_MAX_AUTH", defaults.max_authenticated),
            sweep_interval: parse_duration_secs("RATE_LIMIT_SWEEP_SECS", 60),
            trust_proxy: parse_bool("RATE_LIMIT_TRUST_PROXY", defaults.trust_proxy),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    /// Base URL used when building `/api/images/...` proxy links.
    pub public_api_url: String,
    pub allowed_origins: Vec<String>,
    pub redis_url: Option<String>,
    pub theme_not_found_ttl: Duration,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Read configuration from the environment. `DATABASE_URL` and `JWT_SECRET` are required.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;
        if jwt_secret.len() < 32 {
            tracing::warn!("JWT_SECRET is shorter than 32 bytes");
        }

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            port: parse_env::<u16>("PORT", 8080),
            jwt_secret,
            jwt_expires_in: parse_duration_secs("JWT_EXPIRES_IN_SECS", 7 * 24 * 3600),
            public_api_url: std::env::var("PUBLIC_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            allowed_origins,
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            theme_not_found_ttl: parse_duration_secs("THEME_NOT_FOUND_TTL_SECS", 300),
            storage: StorageConfig {
                endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key: std::env::var("S3_ACCESS_KEY").unwrap_or_default(),
                secret_key: std::env::var("S3_SECRET_KEY").unwrap_or_default(),
                bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "portfolio".to_string()),
            },
            rate_limit: RateLimitConfig::from_env(),
        })
    }

    /// A self-contained configuration for tests and local tooling.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: String::new(),
            port: 0,
            jwt_secret: jwt_secret.to_string(),
            jwt_expires_in: Duration::from_secs(3600),
            public_api_url: "http://localhost:8080".to_string(),
            allowed_origins: Vec::new(),
            redis_url: None,
            theme_not_found_ttl: Duration::from_secs(300),
            storage: StorageConfig {
                endpoint: None,
                region: "us-east-1".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                bucket: "portfolio".to_string(),
            },
            rate_limit: RateLimitConfig {
                enabled: false,
                ..RateLimitConfig::default()
            },
        }
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    Duration::from_secs(parse_env(env_var, default))
}

/// Out-of-range values (e.g. `PORT=70000`) fail to parse and fall back to the default.
fn parse_env<T: FromStr>(env_var: &str, default: T) -> T {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_bool(env_var: &str, default: bool) -> bool {
    match std::env::var(env_var).ok().as_deref().map(str::trim) {
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
        Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
        _ => default,
    }
}
