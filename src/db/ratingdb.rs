// db/ratingdb.rs
use async_trait::async_trait;
use uuid::Uuid;
use sqlx::Error;

use super::db::DBClient;
use crate::models::ratingmodel::*;

#[async_trait]
pub trait RatingExt {
    /// Insert-or-overwrite keyed by (provider, client). The original
    /// `created_at` survives an overwrite.
    async fn upsert_rating(
        &self,
        provider_id: Uuid,
        client_id: Uuid,
        stars: i32,
        comment: Option<String>,
    ) -> Result<Rating, Error>;

    async fn get_rating_aggregate(
        &self,
        provider_id: Uuid,
    ) -> Result<RatingAggregate, Error>;

    async fn get_provider_ratings(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Rating>, Error>;
}

#[async_trait]
impl RatingExt for DBClient {
    async fn upsert_rating(
        &self,
        provider_id: Uuid,
        client_id: Uuid,
        stars: i32,
        comment: Option<String>,
    ) -> Result<Rating, Error> {
        sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (provider_id, client_id, stars, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (provider_id, client_id) DO UPDATE SET
                stars = EXCLUDED.stars,
                comment = EXCLUDED.comment
            RETURNING id, provider_id, client_id, stars, comment, created_at
            "#
        )
        .bind(provider_id)
        .bind(client_id)
        .bind(stars)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_rating_aggregate(
        &self,
        provider_id: Uuid,
    ) -> Result<RatingAggregate, Error> {
        sqlx::query_as::<_, RatingAggregate>(
            r#"
            SELECT
                COALESCE(AVG(stars), 0)::DOUBLE PRECISION AS average,
                COUNT(*) AS review_count
            FROM ratings
            WHERE provider_id = $1
            "#
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_provider_ratings(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Rating>, Error> {
        sqlx::query_as::<_, Rating>(
            r#"
            SELECT id, provider_id, client_id, stars, comment, created_at
            FROM ratings
            WHERE provider_id = $1
            ORDER BY created_at DESC, id
            "#
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }
}
