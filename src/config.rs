use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub openai: OpenAiConfig,
    pub session: SessionConfig,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// None leaves the HTTP client's default in place
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
    pub cookie_secure: bool,
}

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// One year; keeps token expiry and cookie max-age well inside chrono's range
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String, String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{} is not set", key))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = optional("PORT", "5000")
            .parse::<u16>()
            .map_err(|e| format!("PORT must be a valid port number: {}", e))?;

        let timeout = match lookup("OPENAI_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| format!("OPENAI_TIMEOUT_SECS must be a whole number: {}", e))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let ttl_hours = optional("SESSION_TTL_HOURS", "24")
            .parse::<i64>()
            .map_err(|e| format!("SESSION_TTL_HOURS must be a whole number: {}", e))?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            return Err(format!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            ));
        }

        let cookie_secure = parse_bool(&optional("SESSION_COOKIE_SECURE", "false"))
            .ok_or_else(|| "SESSION_COOKIE_SECURE must be true or false".to_string())?;

        let cors_allowed_origins = optional("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: optional("HOST", "0.0.0.0"),
            port,
            database_url: require("DATABASE_URL")?,
            openai: OpenAiConfig {
                api_key: require("OPENAI_API_KEY")?,
                model: optional("OPENAI_MODEL", DEFAULT_MODEL),
                base_url: optional("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
                    .trim_end_matches('/')
                    .to_string(),
                timeout,
            },
            session: SessionConfig {
                jwt_secret: require("JWT_SECRET")?,
                issuer: optional("JWT_ISSUER", "job-recommender"),
                audience: optional("JWT_AUDIENCE", "job-recommender-web"),
                ttl_hours,
                cookie_secure,
            },
            cors_allowed_origins,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
