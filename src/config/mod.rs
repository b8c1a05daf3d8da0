use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub query: QueryConfig,
    pub smtp: SmtpConfig,
    pub geocoder: GeocoderConfig,
    pub uploads: UploadConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cookie_expire_days: u64,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub email: String,
    pub password: String,
    pub from_name: String,
    pub from_email: String,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_bytes: usize,
    pub dir: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub rate_limit_window_secs: u64,
    pub rate_limit_max: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        Self {
            environment,
            server: ServerConfig {
                port: env_parse("PORT", 5000),
            },
            security: SecurityConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
                jwt_expiry_hours: env_parse("JWT_EXPIRE_HOURS", 24 * 30),
                cookie_expire_days: env_parse("JWT_COOKIE_EXPIRE_DAYS", 30),
            },
            query: QueryConfig {
                default_limit: env_parse("QUERY_DEFAULT_LIMIT", 25),
                max_limit: env_parse("QUERY_MAX_LIMIT", 100),
            },
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_default(),
                port: env_parse("SMTP_PORT", 587),
                email: env::var("SMTP_EMAIL").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Bootcamp API".to_string()),
                from_email: env::var("FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@bootcamp.dev".to_string()),
            },
            geocoder: GeocoderConfig {
                url: env::var("GEOCODER_URL")
                    .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),
                api_key: env::var("GEOCODER_API_KEY").unwrap_or_default(),
            },
            uploads: UploadConfig {
                max_bytes: env_parse("MAX_FILE_UPLOAD", 1_000_000),
                dir: env::var("FILE_UPLOAD_PATH").unwrap_or_else(|_| "./public/uploads".to_string()),
            },
            api: ApiConfig {
                rate_limit_window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", 600),
                rate_limit_max: env_parse("RATE_LIMIT_MAX", 100),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let config = AppConfig::from_env();
        assert_eq!(config.api.rate_limit_window_secs, 600);
        assert!(config.query.max_limit >= config.query.default_limit);
    }

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("TEST_ENV_PARSE_GARBAGE", "not-a-number");
        let v: u16 = env_parse("TEST_ENV_PARSE_GARBAGE", 42);
        assert_eq!(v, 42);
        std::env::remove_var("TEST_ENV_PARSE_GARBAGE");
    }
}
