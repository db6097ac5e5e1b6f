//! In-memory stores used to exercise the HTTP layer without a database.
//!
//! They mirror the database semantics: one like per (movie, user), ownership
//! checks on review writes, expiry on sessions.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{self, AtomicI64},
    },
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    likes::LikeStore,
    models::{
        LikeSummary, LikedMovie, MovieId, NewLike, Review, ReviewDraft, ReviewSort, WriteResult,
    },
    reviews::{ReviewStore, check_owner},
    session::{Session, SessionStore, UserId, new_token},
};

#[derive(Default)]
pub struct MemoryLikeStore {
    rows: Mutex<Vec<(NewLike, i64)>>,
    clock: AtomicI64,
}

impl MemoryLikeStore {
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl LikeStore for MemoryLikeStore {
    async fn read(&self, movie_id: &MovieId, user_id: &UserId) -> AppResult<LikeSummary> {
        let rows = self.rows.lock().unwrap();
        let for_movie = rows.iter().filter(|(l, _)| &l.movie_id == movie_id);
        let (mut liked, mut likes) = (0, 0);
        for (like, _) in for_movie {
            likes += 1;
            if &like.user_id == user_id {
                liked = 1;
            }
        }
        Ok(LikeSummary { liked, likes })
    }

    async fn create(&self, like: NewLike) -> AppResult<WriteResult> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(l, _)| l.movie_id == like.movie_id && l.user_id == like.user_id) {
            return Ok(WriteResult { affected_rows: 0 });
        }
        let tick = self.clock.fetch_add(1, atomic::Ordering::SeqCst);
        rows.push((like, tick));
        Ok(WriteResult { affected_rows: 1 })
    }

    async fn delete(&self, movie_id: &MovieId, user_id: &UserId) -> AppResult<WriteResult> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(l, _)| !(&l.movie_id == movie_id && &l.user_id == user_id));
        Ok(WriteResult { affected_rows: (before - rows.len()) as u64 })
    }

    async fn list_by_user(&self, user_id: &UserId) -> AppResult<Vec<LikedMovie>> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<LikedMovie> = rows
            .iter()
            .filter(|(l, _)| &l.user_id == user_id)
            .map(|(l, at)| LikedMovie {
                movie_id: l.movie_id.as_str().to_string(),
                movie_title: l.movie_title.clone(),
                poster_path: l.poster_path.clone(),
                liked_at: *at,
            })
            .collect();
        out.sort_by(|a, b| b.liked_at.cmp(&a.liked_at));
        Ok(out)
    }
}

/// Same ordering the database query applies.
fn compare(sort: ReviewSort, a: &Review, b: &Review) -> Ordering {
    match sort {
        ReviewSort::Latest => (b.created_at, b.id).cmp(&(a.created_at, a.id)),
        ReviewSort::Oldest => (a.created_at, a.id).cmp(&(b.created_at, b.id)),
        ReviewSort::Rating => (b.rating, b.created_at, b.id).cmp(&(a.rating, a.created_at, a.id)),
    }
}

#[derive(Default)]
pub struct MemoryReviewStore {
    rows: Mutex<HashMap<Uuid, Review>>,
    clock: AtomicI64,
}

impl MemoryReviewStore {
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn create(
        &self,
        movie_id: &MovieId,
        user_id: &UserId,
        draft: ReviewDraft,
    ) -> AppResult<Review> {
        let now = self.clock.fetch_add(1, atomic::Ordering::SeqCst);
        let review = Review {
            id: Uuid::now_v7(),
            movie_id: movie_id.as_str().to_string(),
            user_id: user_id.to_string(),
            title: draft.title,
            rating: draft.rating,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(review.id, review.clone());
        Ok(review)
    }

    async fn list(&self, movie_id: &MovieId, sort: ReviewSort) -> AppResult<Vec<Review>> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<Review> =
            rows.values().filter(|r| r.movie_id == movie_id.as_str()).cloned().collect();
        out.sort_by(|a, b| compare(sort, a, b));
        Ok(out)
    }

    async fn update(&self, id: Uuid, user_id: &UserId, draft: ReviewDraft) -> AppResult<Review> {
        let mut rows = self.rows.lock().unwrap();
        check_owner(rows.get(&id), id, user_id)?;
        let now = self.clock.fetch_add(1, atomic::Ordering::SeqCst);
        let review = rows.get_mut(&id).expect("checked above");
        review.title = draft.title;
        review.rating = draft.rating;
        review.content = draft.content;
        review.updated_at = now;
        Ok(review.clone())
    }

    async fn delete(&self, id: Uuid, user_id: &UserId) -> AppResult<WriteResult> {
        let mut rows = self.rows.lock().unwrap();
        check_owner(rows.get(&id), id, user_id)?;
        rows.remove(&id);
        Ok(WriteResult { affected_rows: 1 })
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Registers a session directly, the way the auth provider bridge would.
    pub fn insert(&self, provider: Option<&str>, uid: Option<&str>) -> String {
        let token = new_token();
        let session = Session { provider: provider.map(Into::into), uid: uid.map(Into::into) };
        self.sessions.lock().unwrap().insert(token.clone(), session);
        token
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn issue(&self, session: &Session, ttl_seconds: i64) -> AppResult<String> {
        let token = new_token();
        if ttl_seconds > 0 {
            self.sessions.lock().unwrap().insert(token.clone(), session.clone());
        }
        Ok(token)
    }

    async fn find(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }
}
