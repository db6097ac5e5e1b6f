use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, Set, Statement, sea_query::OnConflict,
};

use crate::{
    entities::movies_like,
    error::AppResult,
    models::{LikeSummary, LikedMovie, MovieId, NewLike, WriteResult, now_ms},
    session::UserId,
};

/// Storage for likes. At most one like exists per (movie, user).
///
/// `create` on an existing pair and `delete` on a missing pair both succeed
/// with zero affected rows; callers treat like/unlike as idempotent.
#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn read(&self, movie_id: &MovieId, user_id: &UserId) -> AppResult<LikeSummary>;
    async fn create(&self, like: NewLike) -> AppResult<WriteResult>;
    async fn delete(&self, movie_id: &MovieId, user_id: &UserId) -> AppResult<WriteResult>;
    async fn list_by_user(&self, user_id: &UserId) -> AppResult<Vec<LikedMovie>>;
}

const READ_SQL: &str = "SELECT \
        COALESCE(MAX(CASE WHEN social_accounts_uid = ? THEN 1 ELSE 0 END), 0) AS liked, \
        COUNT(*) AS likes \
    FROM movies_likes \
    WHERE movies_id = ?";

#[derive(Clone)]
pub struct DbLikeStore {
    db: DatabaseConnection,
}

impl DbLikeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeStore for DbLikeStore {
    async fn read(&self, movie_id: &MovieId, user_id: &UserId) -> AppResult<LikeSummary> {
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            READ_SQL,
            [user_id.as_str().into(), movie_id.as_str().into()],
        );
        let summary = LikeSummary::find_by_statement(stmt)
            .one(&self.db)
            .await
            .with_context(|| format!("reading likes for movie {movie_id}"))?;
        Ok(summary.unwrap_or_default())
    }

    async fn create(&self, like: NewLike) -> AppResult<WriteResult> {
        let movie_id = like.movie_id.clone();
        let model = movies_like::ActiveModel {
            id: Set(like.id),
            movies_id: Set(like.movie_id.as_str().to_string()),
            movie_title: Set(like.movie_title),
            poster_path: Set(like.poster_path),
            social_accounts_uid: Set(like.user_id.to_string()),
            created_at: Set(now_ms()),
        };

        let affected_rows = movies_like::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    movies_like::Column::MoviesId,
                    movies_like::Column::SocialAccountsUid,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .with_context(|| format!("inserting like for movie {movie_id}"))?;

        Ok(WriteResult { affected_rows })
    }

    async fn delete(&self, movie_id: &MovieId, user_id: &UserId) -> AppResult<WriteResult> {
        let res = movies_like::Entity::delete_many()
            .filter(movies_like::Column::MoviesId.eq(movie_id.as_str()))
            .filter(movies_like::Column::SocialAccountsUid.eq(user_id.as_str()))
            .exec(&self.db)
            .await
            .with_context(|| format!("deleting like for movie {movie_id}"))?;

        Ok(WriteResult { affected_rows: res.rows_affected })
    }

    async fn list_by_user(&self, user_id: &UserId) -> AppResult<Vec<LikedMovie>> {
        let rows = movies_like::Entity::find()
            .filter(movies_like::Column::SocialAccountsUid.eq(user_id.as_str()))
            .order_by_desc(movies_like::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("listing liked movies")?;

        Ok(rows.into_iter().map(LikedMovie::from).collect())
    }
}
