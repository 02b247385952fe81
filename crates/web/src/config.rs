use anyhow::{Context, Result, ensure};

const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            jwt_secret: std::env::var("JWT_SECRET")
                .context("Cannot load JWT_SECRET env variable")?,
            token_ttl_days: parse_token_ttl(std::env::var("TOKEN_TTL_DAYS").ok().as_deref())?,
        })
    }
}

fn parse_token_ttl(value: Option<&str>) -> Result<i64> {
    let Some(value) = value else {
        return Ok(DEFAULT_TOKEN_TTL_DAYS);
    };

    let days: i64 = value
        .trim()
        .parse()
        .context("TOKEN_TTL_DAYS must be a number")?;
    ensure!(
        (1..=MAX_TOKEN_TTL_DAYS).contains(&days),
        "TOKEN_TTL_DAYS must be between 1 and {}",
        MAX_TOKEN_TTL_DAYS
    );

    Ok(days)
}
