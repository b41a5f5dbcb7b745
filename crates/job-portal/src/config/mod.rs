use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .or_else(|_| env::var("APP_PORT"))
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let allowed_origins = env::var("WEB_URL")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let rate_limit_per_second = match env::var("RATE_LIMIT_PER_SECOND") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidRateLimit)?,
            Err(_) => 100,
        };

        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DB_URL"))
            .unwrap_or_else(|_| "job_portal.db".to_string());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sender = env::var("MAIL_SENDER").unwrap_or_else(|_| "noreply@jobportal.local".to_string());
        let queue_capacity = match env::var("MAIL_QUEUE_CAPACITY") {
            Ok(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidMailQueueCapacity)?,
            Err(_) => 256,
        };

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => {
                let port = match env::var("SMTP_PORT") {
                    Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidSmtpPort)?,
                    Err(_) => 587,
                };
                let credentials = match (env::var("SMTP_USERNAME"), env::var("SMTP_PASSWORD")) {
                    (Ok(username), Ok(password)) if !username.is_empty() => {
                        Some(SmtpCredentials { username, password })
                    }
                    _ => None,
                };
                Some(SmtpConfig {
                    host: host.trim().to_string(),
                    port,
                    credentials,
                })
            }
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                allowed_origins,
                rate_limit_per_second,
            },
            database: DatabaseConfig { url: database_url },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig {
                sender,
                queue_capacity,
                smtp,
            },
        })
    }
}

/// Settings controlling the HTTP server binding and edge policies.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; `*` allows any origin.
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_second: u32,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Location of the SQLite database file (`:memory:` for a throwaway store).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender: String,
    pub queue_capacity: usize,
    /// Relay used for delivery; `None` keeps mail in the log.
    pub smtp: Option<SmtpConfig>,
}

/// STARTTLS relay settings read from `SMTP_*`.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<SmtpCredentials>,
}

#[derive(Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "username",
                &self.credentials.as_ref().map(|creds| creds.username.as_str()),
            )
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRateLimit,
    InvalidMailQueueCapacity,
    InvalidSmtpPort,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT/APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRateLimit => {
                write!(f, "RATE_LIMIT_PER_SECOND must be a positive integer")
            }
            ConfigError::InvalidMailQueueCapacity => {
                write!(f, "MAIL_QUEUE_CAPACITY must be a positive integer")
            }
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRateLimit
            | ConfigError::InvalidMailQueueCapacity
            | ConfigError::InvalidSmtpPort => None,
        }
    }
}
