use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::auth::supabase::SupabaseAuth;
use crate::chat::llm::ChatClient;
use crate::chat::mcp::McpScraper;
use crate::config::Config;
use crate::email::Mailer;
use crate::rate_limit::{IpRateLimiter, LoginRateLimiter};

pub type SharedState = Arc<AppState>;

/// Password reset requests allowed per client IP per hour.
const RESET_REQUESTS_PER_HOUR: u32 = 5;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub auth: SupabaseAuth,
    pub mailer: Option<Mailer>,
    pub chat: Option<ChatClient>,
    pub scraper: Option<McpScraper>,
    pub chat_limiter: IpRateLimiter,
    pub reset_limiter: IpRateLimiter,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self, String> {
        let auth = SupabaseAuth::new(&config.supabase)?;

        let mailer = match &config.email {
            Some(email) => match Mailer::from_config(email) {
                Ok(mailer) => {
                    tracing::info!("Email delivery configured ({})", mailer.transport_name());
                    Some(mailer)
                }
                Err(e) => {
                    tracing::warn!("Email delivery not available: {e}");
                    None
                }
            },
            None => {
                tracing::warn!("No email provider configured; invites and resets are disabled");
                None
            }
        };

        let chat = config.llm.as_ref().map(ChatClient::new).transpose()?;
        let scraper = config.scraper.as_ref().map(McpScraper::new).transpose()?;

        Ok(Self {
            pool,
            chat_limiter: IpRateLimiter::new(config.chat_rate_limit, Duration::from_secs(60)),
            reset_limiter: IpRateLimiter::new(RESET_REQUESTS_PER_HOUR, Duration::from_secs(3600)),
            login_limiter: LoginRateLimiter::new(),
            config,
            auth,
            mailer,
            chat,
            scraper,
        })
    }

    pub fn cleanup_limiters(&self) {
        self.chat_limiter.cleanup();
        self.reset_limiter.cleanup();
        self.login_limiter.cleanup();
    }
}
