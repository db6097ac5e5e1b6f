use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        LikeRequest, LikeSummary, MovieDetails, MovieId, NewLike, Review, ReviewDraft, ReviewSort,
        WriteResult,
    },
    session::{CurrentUser, Session, UserId},
    templates,
};

pub const SESSION_SECRET_HEADER: &str = "x-session-secret";

/// `Json` body whose rejections go through `AppError`, so a bad body gets the
/// same `{"message": ...}` shape as every other error.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

pub async fn movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<MovieDetails>> {
    let movie_id = MovieId::parse(&movie_id)?;
    let (movie, credits) = futures::try_join!(
        state.tmdb.fetch_movie(&movie_id),
        state.tmdb.fetch_credits(&movie_id)
    )?;
    Ok(Json(MovieDetails { movie, credits }))
}

pub async fn similar(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Value>> {
    let movie_id = MovieId::parse(&movie_id)?;
    let similar = state.tmdb.fetch_similar(&movie_id).await?;
    Ok(Json(json!({ "similar": similar })))
}

pub async fn movie_page(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Response {
    let result = async {
        let id = MovieId::parse(&movie_id)?;
        futures::try_join!(state.tmdb.fetch_movie(&id), state.tmdb.fetch_credits(&id))
    }
    .await;

    match result {
        Ok((Some(movie), credits)) => Html(templates::movie_page(
            &movie,
            credits.as_ref(),
            &state.config.tmdb_image_base_url,
        ))
        .into_response(),
        Ok((None, _)) => {
            (StatusCode::NOT_FOUND, Html(templates::not_found_page(&movie_id))).into_response()
        },
        Err(AppError::BadRequest(message)) => {
            (StatusCode::BAD_REQUEST, Html(templates::error_page(&message))).into_response()
        },
        Err(err) => {
            tracing::error!(movie_id = %movie_id, error = %err, "failed to render movie page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(templates::error_page("Internal Server Error")),
            )
                .into_response()
        },
    }
}

pub async fn get_like(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<LikeSummary>> {
    let movie_id = MovieId::parse(&movie_id)?;
    Ok(Json(state.likes.read(&movie_id, &user.user_id).await?))
}

pub async fn post_like(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    user: CurrentUser,
    JsonBody(req): JsonBody<LikeRequest>,
) -> AppResult<(StatusCode, Json<WriteResult>)> {
    let movie_id = MovieId::parse(&movie_id)?;
    let movie_title = req.movie_title.trim().to_string();
    if movie_title.is_empty() {
        return Err(AppError::bad_request("movieTitle is required"));
    }

    let like = NewLike {
        id: Uuid::new_v4(),
        movie_id,
        movie_title,
        poster_path: req.poster_path.filter(|p| !p.trim().is_empty()),
        user_id: user.user_id,
    };
    let result = state.likes.create(like).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn delete_like(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<WriteResult>> {
    let movie_id = MovieId::parse(&movie_id)?;
    Ok(Json(state.likes.delete(&movie_id, &user.user_id).await?))
}

pub async fn my_likes(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> AppResult<Json<Value>> {
    let likes = state.likes.list_by_user(&user.user_id).await?;
    Ok(Json(json!({ "likes": likes })))
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    sort: Option<String>,
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Query(q): Query<ReviewsQuery>,
) -> AppResult<Json<Value>> {
    let movie_id = MovieId::parse(&movie_id)?;
    let sort = ReviewSort::parse(q.sort.as_deref())?;
    let reviews = state.reviews.list(&movie_id, sort).await?;
    Ok(Json(json!({ "reviews": reviews })))
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    user: CurrentUser,
    JsonBody(draft): JsonBody<ReviewDraft>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let movie_id = MovieId::parse(&movie_id)?;
    let draft = draft.validate()?;
    let review = state.reviews.create(&movie_id, &user.user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
    user: CurrentUser,
    JsonBody(draft): JsonBody<ReviewDraft>,
) -> AppResult<Json<Review>> {
    let review_id = parse_review_id(&review_id)?;
    let draft = draft.validate()?;
    Ok(Json(state.reviews.update(review_id, &user.user_id, draft).await?))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<WriteResult>> {
    let review_id = parse_review_id(&review_id)?;
    Ok(Json(state.reviews.delete(review_id, &user.user_id).await?))
}

fn parse_review_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request("invalid review id"))
}

#[derive(Debug, Deserialize)]
pub struct IssueSessionRequest {
    provider: Option<String>,
    uid: Option<String>,
}

/// Called by the auth provider once it has authenticated a user.
pub async fn issue_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    JsonBody(req): JsonBody<IssueSessionRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<Value>)> {
    let Some(secret) = state.config.session_issuer_secret.as_deref() else {
        return Err(AppError::Forbidden);
    };
    let presented = headers.get(SESSION_SECRET_HEADER).and_then(|v| v.to_str().ok());
    if presented != Some(secret) {
        return Err(AppError::Forbidden);
    }

    let Some(user_id) = UserId::from_parts(req.provider.as_deref(), req.uid.as_deref()) else {
        return Err(AppError::bad_request("valid provider and uid are required"));
    };

    let session = Session { provider: req.provider, uid: req.uid };
    let ttl_days = state.config.session_ttl_days;
    let token = state.sessions.issue(&session, ttl_days.saturating_mul(86_400)).await?;
    tracing::info!(user_id = %user_id, "session issued");

    let cookie = Cookie::build((state.config.session_cookie.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(ttl_days));

    Ok((StatusCode::CREATED, jar.add(cookie), Json(json!({ "userId": user_id }))))
}

pub async fn current_session(user: CurrentUser) -> Json<Value> {
    Json(json!({
        "provider": user.session.provider,
        "uid": user.session.uid,
        "userId": user.user_id,
    }))
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    user: CurrentUser,
) -> AppResult<(StatusCode, CookieJar)> {
    state.sessions.revoke(&user.token).await?;
    let jar = jar.remove(Cookie::build(state.config.session_cookie.clone()).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}
