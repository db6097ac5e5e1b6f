use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MoviesLikes::Table)
                    .if_not_exists()
                    .col(uuid(MoviesLikes::Id).primary_key())
                    .col(string(MoviesLikes::MoviesId))
                    .col(string(MoviesLikes::MovieTitle))
                    .col(string_null(MoviesLikes::PosterPath))
                    .col(string(MoviesLikes::SocialAccountsUid))
                    .col(big_integer(MoviesLikes::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // one like per (movie, user); inserts rely on this to stay idempotent
        manager
            .create_index(
                Index::create()
                    .name("idx_movies_likes_movie_user")
                    .table(MoviesLikes::Table)
                    .col(MoviesLikes::MoviesId)
                    .col(MoviesLikes::SocialAccountsUid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_likes_user")
                    .table(MoviesLikes::Table)
                    .col(MoviesLikes::SocialAccountsUid)
                    .col(MoviesLikes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MoviesLikes::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MoviesLikes {
    Table,
    Id,
    MoviesId,
    MovieTitle,
    PosterPath,
    SocialAccountsUid,
    CreatedAt,
}
