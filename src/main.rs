mod config;
mod db;
mod entities;
mod error;
mod likes;
#[cfg(test)]
mod memory;
mod models;
mod reviews;
mod routes;
mod session;
mod templates;
mod tmdb;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    likes::{DbLikeStore, LikeStore},
    reviews::{DbReviewStore, ReviewStore},
    session::{DbSessionStore, SessionStore},
    tmdb::TmdbClient,
};

pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
    pub likes: Arc<dyn LikeStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub sessions: Arc<dyn SessionStore>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movie/{movie_id}", get(routes::movie_page))
        .route("/api/movie/{movie_id}", get(routes::movie))
        .route("/api/movie/{movie_id}/similar", get(routes::similar))
        .route(
            "/api/movie/{movie_id}/reviews",
            get(routes::list_reviews).post(routes::create_review),
        )
        .route(
            "/api/movie/like/{movie_id}",
            get(routes::get_like).post(routes::post_like).delete(routes::delete_like),
        )
        .route("/api/review/{review_id}", put(routes::update_review).delete(routes::delete_review))
        .route("/api/user/likes", get(routes::my_likes))
        .route(
            "/api/auth/session",
            get(routes::current_session).post(routes::issue_session).delete(routes::end_session),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movieview=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("movieview/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url, config.db_max_connections).await?;

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_language.clone(),
        config.tmdb_rps,
    );

    if config.session_issuer_secret.is_none() {
        tracing::warn!("SESSION_ISSUER_SECRET not set, sessions cannot be issued");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        tmdb: Arc::new(tmdb),
        likes: Arc::new(DbLikeStore::new(db.clone())),
        reviews: Arc::new(DbReviewStore::new(db.clone())),
        sessions: Arc::new(DbSessionStore::new(db)),
    });

    let app = app(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
