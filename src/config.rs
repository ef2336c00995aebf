use std::net::IpAddr;

use ipnet::IpNet;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the assistant for a university student \
organization's website and career portal. Answer questions about the organization, its \
events, membership and the job board concisely. If page content is provided, use it to \
answer and say when it does not contain the answer.";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub supabase: SupabaseConfig,
    pub admin_emails: Vec<String>,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub token_ttl_hours: i64,
    pub chat_rate_limit: u32,
    pub log_level: String,
    pub email: Option<EmailConfig>,
    pub llm: Option<LlmConfig>,
    pub scraper: Option<ScraperConfig>,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub enum EmailConfig {
    Resend(ResendConfig),
    Smtp(SmtpConfig),
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub mcp_url: String,
    pub api_token: String,
    pub max_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;

        let supabase = SupabaseConfig {
            url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            anon_key: required("SUPABASE_ANON_KEY")?,
            service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            jwt_secret: required("SUPABASE_JWT_SECRET")?,
        };

        let host: IpAddr = or("PORTAL_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_HOST: {e}"))?;

        let port: u16 = or("PORTAL_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_PORT: {e}"))?;

        let base_url = or("PORTAL_BASE_URL", &format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let admin_emails = or("PORTAL_ADMIN_EMAILS", "")
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let max_body_size: usize = or("PORTAL_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = or("PORTAL_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid PORTAL_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let token_ttl_hours: i64 = or("PORTAL_TOKEN_TTL_HOURS", "24")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_TOKEN_TTL_HOURS: {e}"))?;
        if token_ttl_hours <= 0 {
            return Err("PORTAL_TOKEN_TTL_HOURS must be positive".to_string());
        }

        let chat_rate_limit: u32 = or("PORTAL_CHAT_RATE_LIMIT", "20")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_CHAT_RATE_LIMIT: {e}"))?;

        let log_level = or("PORTAL_LOG_LEVEL", "info");

        let email = match (get("RESEND_API_KEY"), get("RESEND_FROM")) {
            (Some(api_key), Some(from)) => Some(EmailConfig::Resend(ResendConfig {
                api_url: or("RESEND_API_URL", "https://api.resend.com")
                    .trim_end_matches('/')
                    .to_string(),
                api_key,
                from,
            })),
            _ => match (
                get("PORTAL_SMTP_HOST"),
                get("PORTAL_SMTP_PORT"),
                get("PORTAL_SMTP_USER"),
                get("PORTAL_SMTP_PASS"),
                get("PORTAL_SMTP_FROM"),
            ) {
                (Some(host), Some(port), Some(user), Some(pass), Some(from)) => {
                    Some(EmailConfig::Smtp(SmtpConfig {
                        host,
                        port: port
                            .parse()
                            .map_err(|e| format!("Invalid PORTAL_SMTP_PORT: {e}"))?,
                        user,
                        pass,
                        from,
                    }))
                }
                _ => None,
            },
        };

        let llm = get("NEARAI_API_KEY").map(|api_key| LlmConfig {
            base_url: or("NEARAI_BASE_URL", "https://cloud-api.near.ai/v1")
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: or("NEARAI_MODEL", "deepseek-ai/DeepSeek-V3.1"),
            system_prompt: or("PORTAL_CHAT_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        });

        let scraper = match get("BRIGHTDATA_API_TOKEN") {
            Some(api_token) => Some(ScraperConfig {
                mcp_url: or("BRIGHTDATA_MCP_URL", "https://mcp.brightdata.com/mcp"),
                api_token,
                max_chars: or("PORTAL_SCRAPE_MAX_CHARS", "8000")
                    .parse()
                    .map_err(|e| format!("Invalid PORTAL_SCRAPE_MAX_CHARS: {e}"))?,
            }),
            None => None,
        };

        Ok(Config {
            database_url,
            host,
            port,
            base_url,
            supabase,
            admin_emails,
            max_body_size,
            trusted_proxies,
            token_ttl_hours,
            chat_rate_limit,
            log_level,
            email,
            llm,
            scraper,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}
