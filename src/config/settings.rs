use anyhow::{Context, Result};

const DEFAULT_DATABASE_PATH: &str = "fpl_stats.db";
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Credentials that unlock the admin flag on `/login`
#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub username: String,
    pub password: String,
}

impl AdminSettings {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let username = std::env::var("ADMIN_USERNAME").context("ADMIN_USERNAME is not set")?;
        let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
        Ok(Self::new(username, password))
    }

    /// Exact match against both configured secrets.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[derive(Debug, Clone)]
pub struct RankingSettings {
    pub min_ranked_matches: u32,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            min_ranked_matches: 3,
        }
    }
}

impl RankingSettings {
    /// Reads `MIN_RANKED_MATCHES`, keeping the default when unset or unparsable.
    pub fn from_env() -> Self {
        match std::env::var("MIN_RANKED_MATCHES").map(|raw| raw.trim().parse::<u32>()) {
            Ok(Ok(min_ranked_matches)) => Self { min_ranked_matches },
            Ok(Err(e)) => {
                log::warn!("Ignoring invalid MIN_RANKED_MATCHES: {}", e);
                Self::default()
            }
            Err(_) => Self::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl DatabaseSettings {
    pub fn from_env() -> Self {
        let path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        Self { path }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub api_url: String,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub roster_size: usize,
    pub ranking: RankingSettings,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: "FplDashboard/1.0",
            timeout_secs: 10,
            roster_size: 10,
            ranking: RankingSettings::default(),
        }
    }
}

impl DashboardSettings {
    pub fn from_env() -> Self {
        let mut settings = Self {
            ranking: RankingSettings::from_env(),
            ..Self::default()
        };
        if let Ok(url) = std::env::var("FPL_API_URL") {
            settings.api_url = url.trim_end_matches('/').to_string();
        }
        settings
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub admin: AdminSettings,
    pub ranking: RankingSettings,
    pub database: DatabaseSettings,
}

impl AppConfig {
    pub fn new(admin: AdminSettings, database: DatabaseSettings) -> Self {
        Self {
            admin,
            ranking: RankingSettings::default(),
            database,
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(AdminSettings::from_env()?, DatabaseSettings::from_env());
        config.ranking = RankingSettings::from_env();
        Ok(config)
    }
}
