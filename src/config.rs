use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string. Absent means the in-memory backend.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Wipe thoughts and reseed from the bundled data file at startup.
    pub reset_db: bool,
    /// Allowed cross-origin callers. Absent means permissive CORS.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok();
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let reset_db = std::env::var("RESET_DB")
            .map(|v| v == "true")
            .unwrap_or(false);
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS").ok().map(|v| {
            v.split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        });
        Ok(Self {
            database_url,
            host,
            port,
            reset_db,
            cors_allowed_origins,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".into(),
            port: 8080,
            reset_db: false,
            cors_allowed_origins: None,
        }
    }
}
