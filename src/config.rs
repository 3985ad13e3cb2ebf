use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Either a full `DATABASE_URL` or the individual `DB_*` parts.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    /// Prefix for the event link embedded in invitations.
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: or("DB_HOST", "localhost"),
            port: parse_or(&get, "DB_PORT", 5432)?,
            user: or("DB_USER", "postgres"),
            password: or("DB_PASS", ""),
            name: or("DB_NAME", "event_planner"),
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
        };

        let jwt = JwtConfig {
            secret: get("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: or("JWT_ISSUER", "event-planner"),
            audience: or("JWT_AUDIENCE", "event-planner-users"),
        };

        let email = EmailConfig {
            enabled: parse_or(&get, "EMAIL_ENABLED", true)?,
            smtp_host: or("SMTP_HOST", "live.smtp.mailtrap.io"),
            smtp_port: parse_or(&get, "SMTP_PORT", 587)?,
            smtp_username: or("EMAIL_USER", ""),
            smtp_password: or("EMAIL_PASS", ""),
            from_address: or("EMAIL_FROM", "no-reply@event-planner.local"),
            public_base_url: or("PUBLIC_BASE_URL", "http://localhost:5173")
                .trim_end_matches('/')
                .to_string(),
        };

        let server = ServerConfig {
            host: or("APP_HOST", "0.0.0.0"),
            port: parse_or(&get, "APP_PORT", 5000)?,
        };

        Ok(Self {
            database,
            jwt,
            email,
            server,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value {raw:?}: {e}")),
        None => Ok(default),
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse::<PgConnectOptions>().context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}
