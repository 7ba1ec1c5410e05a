use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address on outgoing notification mail.
    pub from: String,
    /// Operator inbox that receives form submissions.
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct GooglePlacesConfig {
    pub api_key: String,
    pub place_id: String,
}

/// One quota/window pair per rate-limit policy.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub auth_max: u32,
    pub auth_window_secs: u64,
    pub form_max: u32,
    pub form_window_secs: u64,
    pub api_max: u32,
    pub api_window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_max: 5,
            auth_window_secs: 15 * 60,
            form_max: 5,
            form_window_secs: 60 * 60,
            api_max: 100,
            api_window_secs: 15 * 60,
        }
    }
}

impl RateLimitConfig {
    pub fn auth_window(&self) -> Duration {
        Duration::from_secs(self.auth_window_secs)
    }
    pub fn form_window(&self) -> Duration {
        Duration::from_secs(self.form_window_secs)
    }
    pub fn api_window(&self) -> Duration {
        Duration::from_secs(self.api_window_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub production: bool,
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub smtp: Option<SmtpConfig>,
    pub weather_api_key: Option<String>,
    pub google_places: Option<GooglePlacesConfig>,
    pub limits: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) => s,
            Err(_) if production => {
                anyhow::bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            Err(_) => {
                warn!("JWT_SECRET not set, using development secret");
                "norrsken-dev-secret".into()
            }
        };

        let smtp = match (
            std::env::var("SMTP_HOST"),
            std::env::var("SMTP_USER"),
            std::env::var("SMTP_PASS"),
        ) {
            (Ok(host), Ok(username), Ok(password)) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(587),
                from: std::env::var("SMTP_FROM")
                    .unwrap_or_else(|_| "noreply@norrsken.example".into()),
                to: std::env::var("CONTACT_EMAIL").unwrap_or_else(|_| username.clone()),
                username,
                password,
            }),
            _ => None,
        };

        let google_places = match (
            std::env::var("GOOGLE_PLACES_API_KEY"),
            std::env::var("GOOGLE_PLACE_ID"),
        ) {
            (Ok(api_key), Ok(place_id)) => Some(GooglePlacesConfig { api_key, place_id }),
            _ => None,
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            production,
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt: JwtConfig {
                secret,
                ttl_hours: std::env::var("JWT_TTL_HOURS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(24),
            },
            smtp,
            weather_api_key: std::env::var("WEATHER_API_KEY").ok(),
            google_places,
            limits: RateLimitConfig::default(),
        })
    }
}
