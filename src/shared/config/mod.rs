//! Application configuration module
//!
//! `AppConfig` is read once at startup from the environment (after `.env`
//! has been loaded) or assembled with `AppConfig::builder()` in tests.
//!
//! | Variable | Default |
//! |---|---|
//! | `SERVER_PORT` | `8000` |
//! | `DATABASE_URL` | unset: in-memory store |
//! | `JWT_SECRET` | required |
//! | `APP_ENV` | `development` |
//! | `FRONTEND_URL` | unset: any origin |
//! | `PRESENCE_INTERVAL_SECS` | `8` |
//! | `BCRYPT_COST` | `bcrypt::DEFAULT_COST` |
//! | `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM` | unset: mail is logged |
//! | `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET` | unset: uploads fail |

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PRESENCE_INTERVAL: Duration = Duration::from_secs(8);
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub app_env: String,
    pub frontend_url: Option<String>,
    pub presence_interval: Duration,
    pub bcrypt_cost: u32,
    pub smtp: Option<SmtpSettings>,
    pub cloudinary: Option<CloudinarySettings>,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct CloudinarySettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = AppConfig::builder();

        if let Some(port) = get("SERVER_PORT") {
            let port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port))?;
            builder = builder.server_port(port);
        }
        if let Some(url) = get("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(secret) = get("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Some(env) = get("APP_ENV") {
            builder = builder.app_env(env);
        }
        if let Some(url) = get("FRONTEND_URL") {
            builder = builder.frontend_url(url);
        }
        if let Some(secs) = get("PRESENCE_INTERVAL_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("PRESENCE_INTERVAL_SECS", secs))?;
            builder = builder.presence_interval(Duration::from_secs(secs));
        }
        if let Some(cost) = get("BCRYPT_COST") {
            let cost = cost
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue("BCRYPT_COST", cost))?;
            builder = builder.bcrypt_cost(cost);
        }
        if let (Some(host), Some(username), Some(password)) =
            (get("SMTP_HOST"), get("SMTP_USERNAME"), get("SMTP_PASSWORD"))
        {
            let from = get("SMTP_FROM").unwrap_or_else(|| username.clone());
            builder = builder.smtp(SmtpSettings { host, username, password, from });
        }
        if let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            builder = builder.cloudinary(CloudinarySettings { cloud_name, api_key, api_secret });
        }

        builder.build()
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue("BCRYPT_COST", self.bcrypt_cost.to_string()));
        }
        if self.presence_interval.is_zero() {
            return Err(ConfigError::InvalidValue("PRESENCE_INTERVAL_SECS", "0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    app_env: Option<String>,
    frontend_url: Option<String>,
    presence_interval: Option<Duration>,
    bcrypt_cost: Option<u32>,
    smtp: Option<SmtpSettings>,
    cloudinary: Option<CloudinarySettings>,
}

impl AppConfigBuilder {
    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn app_env(mut self, env: impl Into<String>) -> Self {
        self.app_env = Some(env.into());
        self
    }

    pub fn frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = Some(url.into());
        self
    }

    pub fn presence_interval(mut self, interval: Duration) -> Self {
        self.presence_interval = Some(interval);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn smtp(mut self, settings: SmtpSettings) -> Self {
        self.smtp = Some(settings);
        self
    }

    pub fn cloudinary(mut self, settings: CloudinarySettings) -> Self {
        self.cloudinary = Some(settings);
        self
    }

    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_port: self.server_port.unwrap_or(DEFAULT_PORT),
            database_url: self.database_url,
            jwt_secret: self.jwt_secret.ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            app_env: self.app_env.unwrap_or_else(|| "development".to_string()),
            frontend_url: self.frontend_url,
            presence_interval: self.presence_interval.unwrap_or(DEFAULT_PRESENCE_INTERVAL),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST),
            smtp: self.smtp,
            cloudinary: self.cloudinary,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
