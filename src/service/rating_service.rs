// service/rating_service.rs
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{providerdb::ProviderExt, ratingdb::RatingExt},
    dtos::ratingdtos::SubmitRatingDto,
    models::ratingmodel::*,
    service::error::ServiceError,
};

pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;

#[derive(Debug)]
pub struct RatingService<S> {
    store: Arc<S>,
}

impl<S> Clone for RatingService<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<S> RatingService<S>
where
    S: RatingExt + ProviderExt + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores the client's rating of a provider, replacing any earlier one
    /// from the same client.
    pub async fn rate(
        &self,
        client_id: Uuid,
        body: SubmitRatingDto,
    ) -> Result<Rating, ServiceError> {
        if !(MIN_STARS..=MAX_STARS).contains(&body.stars) {
            return Err(ServiceError::InvalidRating(body.stars));
        }
        body.validate()?;

        self.store
            .get_provider_by_id(body.provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(body.provider_id))?;

        let comment = body
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let rating = self.store
            .upsert_rating(body.provider_id, client_id, body.stars, comment)
            .await?;

        tracing::info!(
            "Rating stored: provider={} client={} stars={}",
            rating.provider_id,
            rating.client_id,
            rating.stars
        );
        Ok(rating)
    }

    pub async fn summary_for(&self, provider_id: Uuid) -> Result<RatingSummary, ServiceError> {
        let aggregate = self.store.get_rating_aggregate(provider_id).await?;
        Ok(summarize(aggregate))
    }

    pub async fn ratings_for(&self, provider_id: Uuid) -> Result<Vec<Rating>, ServiceError> {
        Ok(self.store.get_provider_ratings(provider_id).await?)
    }
}

fn summarize(aggregate: RatingAggregate) -> RatingSummary {
    if aggregate.review_count == 0 {
        return RatingSummary {
            average_stars: 0.0,
            review_count: 0,
        };
    }
    RatingSummary {
        average_stars: (aggregate.average * 10.0).round() / 10.0,
        review_count: aggregate.review_count,
    }
}
