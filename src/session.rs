use std::{fmt, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;

use crate::{
    AppState,
    entities::session,
    error::{AppError, AppResult},
};

/// Stable internal identity of a user: auth provider plus the provider's own uid.
///
/// This is the value stored as `social_accounts_uid` on likes and reviews, so
/// two sessions from the same provider account always compare equal.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Provider names may not contain `_`, so the first `_` always ends the
    /// provider and distinct (provider, uid) pairs never share an id.
    pub fn from_parts(provider: Option<&str>, uid: Option<&str>) -> Option<Self> {
        let provider = provider.map(str::trim).filter(|p| !p.is_empty() && !p.contains('_'))?;
        let uid = uid.map(str::trim).filter(|u| !u.is_empty())?;
        Some(Self(format!("{provider}_{uid}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Session {
    pub provider: Option<String>,
    pub uid: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    NoSession,
    /// A session exists but its fields do not form a user id.
    Unidentified,
    User(UserId),
}

pub fn resolve(session: Option<&Session>) -> SessionState {
    let Some(session) = session else {
        return SessionState::NoSession;
    };
    if session.provider.is_none() && session.uid.is_none() {
        return SessionState::NoSession;
    }
    match UserId::from_parts(session.provider.as_deref(), session.uid.as_deref()) {
        Some(id) => SessionState::User(id),
        None => SessionState::Unidentified,
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn issue(&self, session: &Session, ttl_seconds: i64) -> AppResult<String>;
    /// Expired sessions are reported as absent.
    async fn find(&self, token: &str) -> AppResult<Option<Session>>;
    async fn revoke(&self, token: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct DbSessionStore {
    db: DatabaseConnection,
}

impl DbSessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for DbSessionStore {
    async fn issue(&self, session: &Session, ttl_seconds: i64) -> AppResult<String> {
        let now = now_sec();
        session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;

        let token = new_token();
        let model = session::ActiveModel {
            token: Set(token.clone()),
            provider: Set(session.provider.clone()),
            uid: Set(session.uid.clone()),
            expires_at: Set(now.saturating_add(ttl_seconds)),
        };
        session::Entity::insert(model).exec_without_returning(&self.db).await?;
        Ok(token)
    }

    async fn find(&self, token: &str) -> AppResult<Option<Session>> {
        let row = session::Entity::find_by_id(token.to_string())
            .filter(session::Column::ExpiresAt.gt(now_sec()))
            .one(&self.db)
            .await?;
        Ok(row.map(|r| Session { provider: r.provider, uid: r.uid }))
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        session::Entity::delete_many()
            .filter(session::Column::Token.eq(token))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

pub fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

/// Session token from the session cookie, falling back to a bearer header.
pub fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Authenticated caller. Rejects with 401 unless the session resolves to a user.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub session: Session,
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from_parts(parts, &state.config.session_cookie) else {
            return Err(AppError::Unauthorized);
        };

        let session = state.sessions.find(&token).await?;
        match resolve(session.as_ref()) {
            SessionState::User(user_id) => Ok(Self {
                user_id,
                session: session.unwrap_or_default(),
                token,
            }),
            SessionState::NoSession => Err(AppError::Unauthorized),
            SessionState::Unidentified => {
                tracing::debug!("session present but carries no usable user id");
                Err(AppError::Unauthorized)
            },
        }
    }
}
