// service/provider_service.rs
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{providerdb::ProviderExt, ratingdb::RatingExt},
    dtos::providerdtos::*,
    models::providermodel::ProviderProfile,
    service::{
        error::ServiceError,
        geo::{self, Coordinate},
        rating_service::RatingService,
    },
};

#[derive(Debug)]
pub struct ProviderService<S> {
    store: Arc<S>,
    rating_service: Arc<RatingService<S>>,
    default_radius_km: f64,
}

impl<S> Clone for ProviderService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            rating_service: self.rating_service.clone(),
            default_radius_km: self.default_radius_km,
        }
    }
}

impl<S> ProviderService<S>
where
    S: ProviderExt + RatingExt + Send + Sync,
{
    pub fn new(store: Arc<S>, rating_service: Arc<RatingService<S>>, default_radius_km: f64) -> Self {
        Self {
            store,
            rating_service,
            default_radius_km,
        }
    }

    /// Verified, located providers within `radius_km` of `origin`, nearest
    /// first (ties broken by provider id). The boundary is inclusive.
    pub async fn find_nearby(
        &self,
        origin: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<ProviderMatch>, ServiceError> {
        origin.validate()?;
        let radius_km = radius_km.unwrap_or(self.default_radius_km);
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(ServiceError::Validation(format!(
                "search radius must be a non-negative number of kilometres, got {}",
                radius_km
            )));
        }
        // reported distances are rounded to 0.01 km and must stay within the radius
        if !geo::is_reported_precision(radius_km) {
            return Err(ServiceError::Validation(format!(
                "search radius must have at most two decimal places, got {}",
                radius_km
            )));
        }

        let candidates = self.store.get_matchable_providers().await?;

        let mut in_range: Vec<(f64, ProviderProfile)> = candidates
            .into_iter()
            .filter(|p| p.is_verified)
            .filter_map(|p| {
                let location = p.location()?;
                let km = geo::haversine_km(origin, location);
                (km <= radius_km).then_some((km, p))
            })
            .collect();

        in_range.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.id.cmp(&b.1.id))
        });

        let mut matches = Vec::with_capacity(in_range.len());
        for (km, provider) in in_range {
            let rating = self.rating_service.summary_for(provider.id).await?;
            matches.push(ProviderMatch {
                provider_id: provider.id,
                display_name: provider.display_name,
                service_type: provider.service_type,
                distance_km: geo::round_km(km),
                rating,
            });
        }

        tracing::debug!(
            "Nearby search at ({}, {}) within {} km: {} providers",
            origin.latitude,
            origin.longitude,
            radius_km,
            matches.len()
        );
        Ok(matches)
    }

    /// Creates an unverified profile for an account applying as a provider.
    pub async fn register_provider(
        &self,
        account_id: Uuid,
        body: RegisterProviderDto,
    ) -> Result<ProviderProfile, ServiceError> {
        let body = RegisterProviderDto {
            display_name: body.display_name.trim().to_string(),
            service_type: body.service_type.trim().to_string(),
            ..body
        };
        body.validate()?;

        let location = match (body.latitude, body.longitude) {
            (None, None) => None,
            (lat, lon) => Some(Coordinate::from_parts(lat, lon)?),
        };

        let duplicate = || {
            ServiceError::Validation("Provider profile already exists for this account".to_string())
        };

        if self.store.get_provider_by_account(account_id).await?.is_some() {
            return Err(duplicate());
        }

        // a concurrent application for the same account loses here
        let profile = self.store
            .create_provider_profile(
                account_id,
                body.display_name,
                body.service_type,
                body.phone_number,
                body.bio,
                location,
            )
            .await?
            .ok_or_else(duplicate)?;

        tracing::info!("Provider application received: provider={} account={}", profile.id, account_id);
        Ok(profile)
    }

    pub async fn verify_provider(
        &self,
        provider_id: Uuid,
        admin_id: Uuid,
    ) -> Result<ProviderProfile, ServiceError> {
        let profile = self.store
            .set_provider_verified(provider_id, true)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;

        tracing::info!("Provider {} verified by admin {}", provider_id, admin_id);
        Ok(profile)
    }

    pub async fn update_location(
        &self,
        provider_id: Uuid,
        acting_account_id: Uuid,
        location: Coordinate,
    ) -> Result<ProviderProfile, ServiceError> {
        location.validate()?;

        let profile = self.get_provider(provider_id).await?;
        if profile.account_id != acting_account_id {
            return Err(ServiceError::UnauthorizedProviderAccess(acting_account_id, provider_id));
        }

        let updated = self.store
            .update_provider_location(provider_id, location)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;

        tracing::info!("Provider {} moved to ({}, {})", provider_id, location.latitude, location.longitude);
        Ok(updated)
    }

    pub async fn get_provider(&self, provider_id: Uuid) -> Result<ProviderProfile, ServiceError> {
        self.store
            .get_provider_by_id(provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::memory::MemoryStore, dtos::ratingdtos::SubmitRatingDto};

    struct Fixture {
        service: ProviderService<MemoryStore>,
        ratings: Arc<RatingService<MemoryStore>>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let ratings = Arc::new(RatingService::new(store.clone()));
        Fixture {
            service: ProviderService::new(store, ratings.clone(), 3.0),
            ratings,
        }
    }

    fn application(name: &str, lat: Option<f64>, lon: Option<f64>) -> RegisterProviderDto {
        RegisterProviderDto {
            display_name: name.to_string(),
            service_type: "Plumbing".to_string(),
            phone_number: Some("+254700000000".to_string()),
            bio: None,
            latitude: lat,
            longitude: lon,
        }
    }

    async fn verified_at(fx: &Fixture, name: &str, lat: f64, lon: f64) -> ProviderProfile {
        let profile = fx.service
            .register_provider(Uuid::new_v4(), application(name, Some(lat), Some(lon)))
            .await
            .unwrap();
        fx.service.verify_provider(profile.id, Uuid::new_v4()).await.unwrap()
    }

    fn origin(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[tokio::test]
    async fn test_nearby_provider_found_with_rounded_distance() {
        let fx = fixture();
        let provider = verified_at(&fx, "Otieno", 0.0, 0.0).await;

        let matches = fx.service.find_nearby(origin(0.010, 0.0), None).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].provider_id, provider.id);
        assert_eq!(matches[0].display_name, "Otieno");
        assert_eq!(matches[0].service_type, "Plumbing");
        assert_eq!(matches[0].distance_km, 1.11);
        assert_eq!(matches[0].rating.review_count, 0);
    }

    #[tokio::test]
    async fn test_unverified_and_unlocated_providers_excluded() {
        let fx = fixture();
        fx.service
            .register_provider(Uuid::new_v4(), application("Pending", Some(0.0), Some(0.0)))
            .await
            .unwrap();
        let no_location = fx.service
            .register_provider(Uuid::new_v4(), application("Nowhere", None, None))
            .await
            .unwrap();
        fx.service.verify_provider(no_location.id, Uuid::new_v4()).await.unwrap();

        let matches = fx.service.find_nearby(origin(0.0, 0.0), None).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_radius_filter_and_ordering() {
        let fx = fixture();
        let far = verified_at(&fx, "Far", 0.02, 0.0).await;      // ~2.22 km
        let near = verified_at(&fx, "Near", 0.005, 0.0).await;   // ~0.56 km
        verified_at(&fx, "Outside", 0.05, 0.0).await;            // ~5.56 km

        let matches = fx.service.find_nearby(origin(0.0, 0.0), None).await.unwrap();
        let ids: Vec<Uuid> = matches.iter().map(|m| m.provider_id).collect();
        assert_eq!(ids, vec![near.id, far.id]);
        assert!(matches.iter().all(|m| m.distance_km <= 3.0));

        let wider = fx.service.find_nearby(origin(0.0, 0.0), Some(10.0)).await.unwrap();
        assert_eq!(wider.len(), 3);

        let narrow = fx.service.find_nearby(origin(0.0, 0.0), Some(1.0)).await.unwrap();
        assert_eq!(narrow.len(), 1);
        assert_eq!(narrow[0].provider_id, near.id);
    }

    #[tokio::test]
    async fn test_radius_boundary_is_inclusive() {
        let fx = fixture();
        let provider = verified_at(&fx, "Edge", 0.0, 0.0).await;

        let matches = fx.service.find_nearby(origin(0.0, 0.0), Some(0.0)).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].provider_id, provider.id);
        assert_eq!(matches[0].distance_km, 0.0);
    }

    #[tokio::test]
    async fn test_reported_distance_never_exceeds_radius() {
        let fx = fixture();
        verified_at(&fx, "Close", 0.0, 0.0).await;
        // raw distance ~1.1196 km, reported as 1.12
        let query = origin(0.010069, 0.0);
        let raw = geo::distance(query, origin(0.0, 0.0)).unwrap();
        assert!(raw > 1.119 && raw < 1.12);

        assert!(matches!(
            fx.service.find_nearby(query, Some(1.1199)).await,
            Err(ServiceError::Validation(_))
        ));

        for radius in [1.12, 1.13, 3.0] {
            let matches = fx.service.find_nearby(query, Some(radius)).await.unwrap();
            assert_eq!(matches.len(), 1);
            assert!(matches[0].distance_km <= radius);
        }
        let matches = fx.service.find_nearby(query, Some(1.11)).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_matches_carry_rating_summary() {
        let fx = fixture();
        let provider = verified_at(&fx, "Rated", 0.0, 0.0).await;
        for stars in [4, 5] {
            fx.ratings
                .rate(Uuid::new_v4(), SubmitRatingDto { provider_id: provider.id, stars, comment: None })
                .await
                .unwrap();
        }

        let matches = fx.service.find_nearby(origin(0.0, 0.0), None).await.unwrap();
        assert_eq!(matches[0].rating.average_stars, 4.5);
        assert_eq!(matches[0].rating.review_count, 2);
    }

    #[tokio::test]
    async fn test_invalid_origin_or_radius() {
        let fx = fixture();
        let bad = Coordinate { latitude: 91.0, longitude: 0.0 };
        assert!(matches!(
            fx.service.find_nearby(bad, None).await,
            Err(ServiceError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            fx.service.find_nearby(origin(0.0, 0.0), Some(-1.0)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            fx.service.find_nearby(origin(0.0, 0.0), Some(f64::NAN)).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_registration_rules() {
        let fx = fixture();
        let account_id = Uuid::new_v4();
        let profile = fx.service
            .register_provider(account_id, application("Akinyi", Some(-1.28), Some(36.82)))
            .await
            .unwrap();
        assert!(!profile.is_verified);

        let err = fx.service
            .register_provider(account_id, application("Akinyi again", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = fx.service
            .register_provider(Uuid::new_v4(), application("Half", Some(1.0), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCoordinate(_)));

        let err = fx.service
            .register_provider(Uuid::new_v4(), application("", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_names_rejected_after_trim() {
        let fx = fixture();
        let err = fx.service
            .register_provider(Uuid::new_v4(), application("   ", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let mut body = application("Baraka", None, None);
        body.service_type = "  ".to_string();
        let err = fx.service.register_provider(Uuid::new_v4(), body).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let profile = fx.service
            .register_provider(Uuid::new_v4(), application("  Baraka  ", None, None))
            .await
            .unwrap();
        assert_eq!(profile.display_name, "Baraka");
    }

    #[tokio::test]
    async fn test_concurrent_applications_for_one_account() {
        let fx = fixture();
        let account_id = Uuid::new_v4();

        let (a, b) = tokio::join!(
            fx.service.register_provider(account_id, application("First", None, None)),
            fx.service.register_provider(account_id, application("Second", None, None)),
        );
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ServiceError::Validation(_)))));
    }

    #[tokio::test]
    async fn test_store_reports_duplicate_account() {
        let store = MemoryStore::new();
        let account_id = Uuid::new_v4();
        let first = store
            .create_provider_profile(account_id, "One".into(), "Cleaning".into(), None, None, None)
            .await
            .unwrap();
        assert!(first.is_some());
        let second = store
            .create_provider_profile(account_id, "Two".into(), "Cleaning".into(), None, None, None)
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_location_update_requires_owner() {
        let fx = fixture();
        let account_id = Uuid::new_v4();
        let profile = fx.service
            .register_provider(account_id, application("Mover", None, None))
            .await
            .unwrap();
        fx.service.verify_provider(profile.id, Uuid::new_v4()).await.unwrap();

        let err = fx.service
            .update_location(profile.id, Uuid::new_v4(), origin(0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnauthorizedProviderAccess(_, _)));

        let moved = fx.service
            .update_location(profile.id, account_id, origin(0.0, 0.0))
            .await
            .unwrap();
        assert_eq!(moved.location(), Some(origin(0.0, 0.0)));

        let matches = fx.service.find_nearby(origin(0.0, 0.0), None).await.unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn test_verify_unknown_provider() {
        let fx = fixture();
        let missing = Uuid::new_v4();
        let err = fx.service.verify_provider(missing, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::ProviderNotFound(id) if id == missing));
    }
}
