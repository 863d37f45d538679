use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            port,
            jwt_secret,
        })
    }
}
