use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub connection_lifetime_secs: u64,
    pub app_env: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = var("DATABASE_URL")
            .ok_or_else(|| "DATABASE_URL must be set in .env file".to_string())?;
        if !database_url.starts_with("sqlite:") {
            return Err("Invalid DATABASE_URL: only sqlite: URLs are supported".to_string());
        }

        let max_connections: u32 = setting(&var, "MAX_DB_CONNECTIONS", 10)?;
        if max_connections == 0 {
            return Err("Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string());
        }

        Ok(Config {
            database_url,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: setting(&var, "SERVER_PORT", 3000)?,
            max_connections,
            connection_lifetime_secs: setting(&var, "DB_CONNECTION_LIFETIME_SECS", 1800)?,
            app_env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// File del database senza schema né parametri (`sqlite://villas.db?mode=rwc` -> `villas.db`)
    pub fn database_file(&self) -> &str {
        let path = self.database_url.trim_start_matches("sqlite:");
        let path = path.strip_prefix("//").unwrap_or(path);
        path.split('?').next().unwrap_or(path)
    }

    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}", self.server_address());
        info!("   Database: {}", self.database_file());
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Connection Lifetime: {}s", self.connection_lifetime_secs);
        if self.database_file() == ":memory:" && self.max_connections > 1 {
            warn!("In-memory database with more than one connection: every connection sees its own database");
        }
    }
}

/// Valore opzionale: default se assente, errore se non si parsa
fn setting<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, String> {
    match var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid {}: '{}'", name, raw)),
    }
}
