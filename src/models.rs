use std::fmt;

use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{movies_like, movies_review},
    error::{AppError, AppResult},
    session::UserId,
};

pub const MAX_RATING: i32 = 5;

/// Upstream movie id, checked to be plain ASCII digits.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MovieId(String);

impl MovieId {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > 12 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::bad_request("invalid movie id"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Cast {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<Cast>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimilarMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimilarMovies {
    #[serde(default)]
    pub page: i32,
    #[serde(default)]
    pub results: Vec<SimilarMovie>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetails {
    pub movie: Option<Movie>,
    pub credits: Option<Credits>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, FromQueryResult)]
pub struct LikeSummary {
    pub liked: i64,
    pub likes: i64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub affected_rows: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    pub movie_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewLike {
    pub id: Uuid,
    pub movie_id: MovieId,
    pub movie_title: String,
    pub poster_path: Option<String>,
    pub user_id: UserId,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedMovie {
    pub movie_id: String,
    pub movie_title: String,
    pub poster_path: Option<String>,
    pub liked_at: i64,
}

impl From<movies_like::Model> for LikedMovie {
    fn from(m: movies_like::Model) -> Self {
        Self {
            movie_id: m.movies_id,
            movie_title: m.movie_title,
            poster_path: m.poster_path,
            liked_at: m.created_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub title: String,
    pub rating: i32,
    #[serde(default)]
    pub content: String,
}

impl ReviewDraft {
    /// Trims title and content and rejects drafts that must never reach storage.
    pub fn validate(self) -> AppResult<Self> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();

        if title.is_empty() || content.is_empty() {
            return Err(AppError::bad_request("review title and content must not be empty"));
        }
        if !(0..=MAX_RATING).contains(&self.rating) {
            return Err(AppError::bad_request(format!("rating must be between 0 and {MAX_RATING}")));
        }

        Ok(Self { title, rating: self.rating, content })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub movie_id: String,
    pub user_id: String,
    pub title: String,
    pub rating: i32,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<movies_review::Model> for Review {
    fn from(m: movies_review::Model) -> Self {
        Self {
            id: m.id,
            movie_id: m.movies_id,
            user_id: m.social_accounts_uid,
            title: m.title,
            rating: m.rating,
            content: m.content,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReviewSort {
    #[default]
    Latest,
    Oldest,
    Rating,
}

impl ReviewSort {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("latest") => Ok(ReviewSort::Latest),
            Some("oldest") => Ok(ReviewSort::Oldest),
            Some("rating") => Ok(ReviewSort::Rating),
            Some(other) => Err(AppError::bad_request(format!("unknown sort: {other}"))),
        }
    }
}

pub fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
