// db/providerdb.rs
use async_trait::async_trait;
use uuid::Uuid;
use sqlx::Error;

use super::db::DBClient;
use crate::{models::providermodel::ProviderProfile, service::geo::Coordinate};

#[async_trait]
pub trait ProviderExt {
    /// Returns `None` when the account already has a profile.
    async fn create_provider_profile(
        &self,
        account_id: Uuid,
        display_name: String,
        service_type: String,
        phone_number: Option<String>,
        bio: Option<String>,
        location: Option<Coordinate>,
    ) -> Result<Option<ProviderProfile>, Error>;

    async fn get_provider_by_id(
        &self,
        provider_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error>;

    async fn get_provider_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error>;

    async fn set_provider_verified(
        &self,
        provider_id: Uuid,
        is_verified: bool,
    ) -> Result<Option<ProviderProfile>, Error>;

    // Latitude and longitude are always written together
    async fn update_provider_location(
        &self,
        provider_id: Uuid,
        location: Coordinate,
    ) -> Result<Option<ProviderProfile>, Error>;

    /// Verified providers with a location, read in one statement.
    async fn get_matchable_providers(&self) -> Result<Vec<ProviderProfile>, Error>;
}

#[async_trait]
impl ProviderExt for DBClient {
    async fn create_provider_profile(
        &self,
        account_id: Uuid,
        display_name: String,
        service_type: String,
        phone_number: Option<String>,
        bio: Option<String>,
        location: Option<Coordinate>,
    ) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(
            r#"
            INSERT INTO provider_profiles
            (account_id, display_name, service_type, phone_number, bio, latitude, longitude, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            ON CONFLICT (account_id) DO NOTHING
            RETURNING
                id, account_id, display_name, service_type, is_verified,
                latitude, longitude, phone_number, bio, created_at
            "#
        )
        .bind(account_id)
        .bind(display_name)
        .bind(service_type)
        .bind(phone_number)
        .bind(bio)
        .bind(location.map(|c| c.latitude))
        .bind(location.map(|c| c.longitude))
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_provider_by_id(
        &self,
        provider_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(
            r#"
            SELECT
                id, account_id, display_name, service_type, is_verified,
                latitude, longitude, phone_number, bio, created_at
            FROM provider_profiles
            WHERE id = $1
            "#
        )
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_provider_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(
            r#"
            SELECT
                id, account_id, display_name, service_type, is_verified,
                latitude, longitude, phone_number, bio, created_at
            FROM provider_profiles
            WHERE account_id = $1
            "#
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_provider_verified(
        &self,
        provider_id: Uuid,
        is_verified: bool,
    ) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(
            r#"
            UPDATE provider_profiles
            SET is_verified = $2
            WHERE id = $1
            RETURNING
                id, account_id, display_name, service_type, is_verified,
                latitude, longitude, phone_number, bio, created_at
            "#
        )
        .bind(provider_id)
        .bind(is_verified)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_provider_location(
        &self,
        provider_id: Uuid,
        location: Coordinate,
    ) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(
            r#"
            UPDATE provider_profiles
            SET latitude = $2, longitude = $3
            WHERE id = $1
            RETURNING
                id, account_id, display_name, service_type, is_verified,
                latitude, longitude, phone_number, bio, created_at
            "#
        )
        .bind(provider_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_matchable_providers(&self) -> Result<Vec<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(
            r#"
            SELECT
                id, account_id, display_name, service_type, is_verified,
                latitude, longitude, phone_number, bio, created_at
            FROM provider_profiles
            WHERE is_verified = TRUE
              AND latitude IS NOT NULL
              AND longitude IS NOT NULL
            "#
        )
        .fetch_all(&self.pool)
        .await
    }
}
