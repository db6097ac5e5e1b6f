use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    entities::movies_review,
    error::{AppError, AppResult},
    models::{MovieId, Review, ReviewDraft, ReviewSort, WriteResult, now_ms},
    session::UserId,
};

/// Storage for reviews. Drafts are validated before they get here.
///
/// `update` and `delete` only touch rows owned by `user_id`: a foreign row
/// yields `Forbidden`, a missing one `NotFound`.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create(
        &self,
        movie_id: &MovieId,
        user_id: &UserId,
        draft: ReviewDraft,
    ) -> AppResult<Review>;
    async fn list(&self, movie_id: &MovieId, sort: ReviewSort) -> AppResult<Vec<Review>>;
    async fn update(&self, id: Uuid, user_id: &UserId, draft: ReviewDraft) -> AppResult<Review>;
    async fn delete(&self, id: Uuid, user_id: &UserId) -> AppResult<WriteResult>;
}

/// Ownership check shared by every store implementation.
pub fn check_owner(review: Option<&Review>, id: Uuid, user_id: &UserId) -> AppResult<()> {
    match review {
        None => Err(AppError::NotFound(format!("review {id} not found"))),
        Some(r) if r.user_id != user_id.as_str() => Err(AppError::Forbidden),
        Some(_) => Ok(()),
    }
}

#[derive(Clone)]
pub struct DbReviewStore {
    db: DatabaseConnection,
}

impl DbReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Review>> {
        let row = movies_review::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .with_context(|| format!("loading review {id}"))?;
        Ok(row.map(Review::from))
    }
}

/// Ids are v7 UUIDs, so they break `created_at` ties in insertion order.
fn sorted(query: Select<movies_review::Entity>, sort: ReviewSort) -> Select<movies_review::Entity> {
    use movies_review::Column;
    match sort {
        ReviewSort::Latest => query.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id),
        ReviewSort::Oldest => query.order_by_asc(Column::CreatedAt).order_by_asc(Column::Id),
        ReviewSort::Rating => query
            .order_by_desc(Column::Rating)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id),
    }
}

#[async_trait]
impl ReviewStore for DbReviewStore {
    async fn create(
        &self,
        movie_id: &MovieId,
        user_id: &UserId,
        draft: ReviewDraft,
    ) -> AppResult<Review> {
        let now = now_ms();
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

        let model = movies_review::ActiveModel {
            id: Set(review.id),
            movies_id: Set(review.movie_id.clone()),
            social_accounts_uid: Set(review.user_id.clone()),
            title: Set(review.title.clone()),
            rating: Set(review.rating),
            content: Set(review.content.clone()),
            created_at: Set(review.created_at),
            updated_at: Set(review.updated_at),
        };
        movies_review::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .with_context(|| format!("inserting review for movie {movie_id}"))?;

        Ok(review)
    }

    async fn list(&self, movie_id: &MovieId, sort: ReviewSort) -> AppResult<Vec<Review>> {
        let query = movies_review::Entity::find()
            .filter(movies_review::Column::MoviesId.eq(movie_id.as_str()));
        let rows = sorted(query, sort)
            .all(&self.db)
            .await
            .with_context(|| format!("listing reviews for movie {movie_id}"))?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn update(&self, id: Uuid, user_id: &UserId, draft: ReviewDraft) -> AppResult<Review> {
        let existing = self.find(id).await?;
        check_owner(existing.as_ref(), id, user_id)?;

        let now = now_ms();
        let res = movies_review::Entity::update_many()
            .col_expr(movies_review::Column::Title, Expr::value(draft.title.clone()))
            .col_expr(movies_review::Column::Rating, Expr::value(draft.rating))
            .col_expr(movies_review::Column::Content, Expr::value(draft.content.clone()))
            .col_expr(movies_review::Column::UpdatedAt, Expr::value(now))
            .filter(movies_review::Column::Id.eq(id))
            .filter(movies_review::Column::SocialAccountsUid.eq(user_id.as_str()))
            .exec(&self.db)
            .await
            .with_context(|| format!("updating review {id}"))?;

        // deleted between the ownership check and the write
        let Some(existing) = existing.filter(|_| res.rows_affected > 0) else {
            return Err(AppError::NotFound(format!("review {id} not found")));
        };

        Ok(Review {
            title: draft.title,
            rating: draft.rating,
            content: draft.content,
            updated_at: now,
            ..existing
        })
    }

    async fn delete(&self, id: Uuid, user_id: &UserId) -> AppResult<WriteResult> {
        let existing = self.find(id).await?;
        check_owner(existing.as_ref(), id, user_id)?;

        let res = movies_review::Entity::delete_many()
            .filter(movies_review::Column::Id.eq(id))
            .filter(movies_review::Column::SocialAccountsUid.eq(user_id.as_str()))
            .exec(&self.db)
            .await
            .with_context(|| format!("deleting review {id}"))?;

        Ok(WriteResult { affected_rows: res.rows_affected })
    }
}
