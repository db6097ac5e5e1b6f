use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub tmdb_image_base_url: String,
    pub tmdb_rps: u32,
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_cookie: String,
    pub session_ttl_days: i64,
    pub session_issuer_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let tmdb_api_key = std::env::var("TMDB_API_KEY").unwrap_or_else(|_| "".to_string());
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());
        let tmdb_language =
            std::env::var("TMDB_LANGUAGE").unwrap_or_else(|_| "ko-KR".to_string());
        let tmdb_image_base_url = std::env::var("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|_| "https://image.tmdb.org/t/p/original".to_string());

        let tmdb_rps: u32 =
            std::env::var("TMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movieview.db?mode=rwc".to_string());

        let db_max_connections: u32 =
            std::env::var("DB_MAX_CONNECTIONS").ok().and_then(|s| s.parse().ok()).unwrap_or(10);

        let session_cookie =
            std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "movieview_session".to_string());

        let session_ttl_days: i64 =
            std::env::var("SESSION_TTL_DAYS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let session_issuer_secret =
            std::env::var("SESSION_ISSUER_SECRET").ok().filter(|s| !s.trim().is_empty());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            tmdb_api_key,
            tmdb_base_url,
            tmdb_language,
            tmdb_image_base_url,
            tmdb_rps,
            database_url,
            db_max_connections,
            session_cookie,
            session_ttl_days,
            session_issuer_secret,
        })
    }
}
