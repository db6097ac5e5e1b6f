use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MoviesReviews::Table)
                    .if_not_exists()
                    .col(uuid(MoviesReviews::Id).primary_key())
                    .col(string(MoviesReviews::MoviesId))
                    .col(string(MoviesReviews::SocialAccountsUid))
                    .col(string(MoviesReviews::Title))
                    .col(integer(MoviesReviews::Rating))
                    .col(text(MoviesReviews::Content))
                    .col(big_integer(MoviesReviews::CreatedAt))
                    .col(big_integer(MoviesReviews::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_reviews_movie")
                    .table(MoviesReviews::Table)
                    .col(MoviesReviews::MoviesId)
                    .col(MoviesReviews::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MoviesReviews::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MoviesReviews {
    Table,
    Id,
    MoviesId,
    SocialAccountsUid,
    Title,
    Rating,
    Content,
    CreatedAt,
    UpdatedAt,
}
