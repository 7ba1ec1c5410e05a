use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::AppConfig,
    notify::{LogMailer, Mailer, SmtpMailer},
    rate_limit::Limiters,
    store::{MemoryStore, PgStore, SubmissionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SubmissionStore>,
    pub mailer: Arc<dyn Mailer>,
    pub http: reqwest::Client,
    pub limiters: Limiters,
}

impl AppState {
    /// Selects the store and mail transport from config presence. Falling
    /// back to the in-memory store / log mailer is a deliberate developer
    /// mode, announced loudly at startup.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let store: Arc<dyn SubmissionStore> = match config.database_url.as_deref() {
            Some(url) => {
                info!("using Postgres submission store");
                Arc::new(PgStore::connect(url).await?)
            }
            None => {
                warn!("DATABASE_URL not set, using in-memory store (submissions are lost on restart)");
                Arc::new(MemoryStore::new())
            }
        };

        let mailer: Arc<dyn Mailer> = match config.smtp.as_ref() {
            Some(smtp) => {
                info!(host = %smtp.host, "using SMTP mail transport");
                Arc::new(SmtpMailer::from_config(smtp)?)
            }
            None => {
                warn!("SMTP_HOST/SMTP_USER/SMTP_PASS not set, notifications will only be logged");
                Arc::new(LogMailer)
            }
        };

        Ok(Self::from_parts(config, store, mailer))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn SubmissionStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let limiters = Limiters::from_config(&config.limits);
        Self {
            config,
            store,
            mailer,
            http: reqwest::Client::new(),
            limiters,
        }
    }

    /// Memory-backed state for tests: no database, no SMTP, no env reads.
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, RateLimitConfig};

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            production: false,
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_hours: 24,
            },
            smtp: None,
            weather_api_key: None,
            google_places: None,
            limits: RateLimitConfig::default(),
        });

        Self::from_parts(config, Arc::new(MemoryStore::new()), Arc::new(LogMailer))
    }
}
