// db/memory.rs
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use num_traits::Zero;
use sqlx::{types::BigDecimal, Error};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{bookingdb::BookingExt, providerdb::ProviderExt, ratingdb::RatingExt};
use crate::{
    models::{bookingmodel::*, providermodel::ProviderProfile, ratingmodel::*},
    service::{geo::Coordinate, payout::Payout},
};

/// In-process store with the same guarantees as the Postgres one: every
/// conditional update runs under a single write lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    providers: Arc<RwLock<HashMap<Uuid, ProviderProfile>>>,
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
    // keyed by (provider_id, client_id)
    ratings: Arc<RwLock<HashMap<(Uuid, Uuid), Rating>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, Uuid),
{
    items.sort_by(|a, b| {
        let (a_at, a_id) = key(a);
        let (b_at, b_id) = key(b);
        b_at.cmp(&a_at).then(a_id.cmp(&b_id))
    });
}

#[async_trait]
impl ProviderExt for MemoryStore {
    async fn create_provider_profile(
        &self,
        account_id: Uuid,
        display_name: String,
        service_type: String,
        phone_number: Option<String>,
        bio: Option<String>,
        location: Option<Coordinate>,
    ) -> Result<Option<ProviderProfile>, Error> {
        let mut providers = self.providers.write().await;
        if providers.values().any(|p| p.account_id == account_id) {
            return Ok(None);
        }

        let profile = ProviderProfile {
            id: Uuid::new_v4(),
            account_id,
            display_name,
            service_type,
            is_verified: false,
            latitude: location.map(|c| c.latitude),
            longitude: location.map(|c| c.longitude),
            phone_number,
            bio,
            created_at: Utc::now(),
        };
        providers.insert(profile.id, profile.clone());
        Ok(Some(profile))
    }

    async fn get_provider_by_id(
        &self,
        provider_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error> {
        Ok(self.providers.read().await.get(&provider_id).cloned())
    }

    async fn get_provider_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error> {
        let providers = self.providers.read().await;
        Ok(providers.values().find(|p| p.account_id == account_id).cloned())
    }

    async fn set_provider_verified(
        &self,
        provider_id: Uuid,
        is_verified: bool,
    ) -> Result<Option<ProviderProfile>, Error> {
        let mut providers = self.providers.write().await;
        Ok(providers.get_mut(&provider_id).map(|profile| {
            profile.is_verified = is_verified;
            profile.clone()
        }))
    }

    async fn update_provider_location(
        &self,
        provider_id: Uuid,
        location: Coordinate,
    ) -> Result<Option<ProviderProfile>, Error> {
        let mut providers = self.providers.write().await;
        Ok(providers.get_mut(&provider_id).map(|profile| {
            profile.latitude = Some(location.latitude);
            profile.longitude = Some(location.longitude);
            profile.clone()
        }))
    }

    async fn get_matchable_providers(&self) -> Result<Vec<ProviderProfile>, Error> {
        let providers = self.providers.read().await;
        Ok(providers
            .values()
            .filter(|p| p.is_matchable())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingExt for MemoryStore {
    async fn create_booking(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        description: String,
    ) -> Result<Booking, Error> {
        let booking = Booking {
            id: Uuid::new_v4(),
            client_id,
            provider_id,
            description,
            amount: None,
            provider_cut: None,
            platform_fee: None,
            status: BookingStatus::Pending,
            is_paid_to_provider: false,
            payout_date: None,
            created_at: Utc::now(),
        };
        self.bookings.write().await.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, Error> {
        Ok(self.bookings.read().await.get(&booking_id).cloned())
    }

    async fn apply_quote(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
        payout: &Payout,
    ) -> Result<Option<Booking>, Error> {
        let mut bookings = self.bookings.write().await;
        let booking = match bookings.get_mut(&booking_id) {
            Some(b) if b.provider_id == provider_id && b.status == BookingStatus::Pending => b,
            _ => return Ok(None),
        };

        booking.amount = Some(payout.amount().clone());
        booking.provider_cut = Some(payout.provider_cut().clone());
        booking.platform_fee = Some(payout.platform_fee().clone());
        booking.status = BookingStatus::Quoted;
        Ok(Some(booking.clone()))
    }

    async fn mark_booking_completed(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Booking>, Error> {
        let mut bookings = self.bookings.write().await;
        let booking = match bookings.get_mut(&booking_id) {
            Some(b) if b.provider_id == provider_id && b.status == BookingStatus::Quoted => b,
            _ => return Ok(None),
        };

        booking.status = BookingStatus::Completed;
        Ok(Some(booking.clone()))
    }

    async fn mark_bookings_paid(
        &self,
        booking_ids: &[Uuid],
        paid_at: DateTime<Utc>,
    ) -> Result<u64, Error> {
        let mut bookings = self.bookings.write().await;
        let mut stamped = 0;
        for id in booking_ids {
            if let Some(booking) = bookings.get_mut(id) {
                if booking.status == BookingStatus::Completed && !booking.is_paid_to_provider {
                    booking.is_paid_to_provider = true;
                    booking.payout_date = Some(paid_at);
                    stamped += 1;
                }
            }
        }
        Ok(stamped)
    }

    async fn get_client_bookings(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<Booking>, Error> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.client_id == client_id)
            .cloned()
            .collect();
        newest_first(&mut found, |b| (b.created_at, b.id));
        Ok(found)
    }

    async fn get_provider_bookings(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Booking>, Error> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.provider_id == provider_id)
            .cloned()
            .collect();
        newest_first(&mut found, |b| (b.created_at, b.id));
        Ok(found)
    }

    async fn get_provider_earnings(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderEarnings, Error> {
        let bookings = self.bookings.read().await;
        let mut earnings = ProviderEarnings {
            completed_jobs: 0,
            total_earnings: BigDecimal::zero(),
            paid_out: BigDecimal::zero(),
            outstanding: BigDecimal::zero(),
        };

        for booking in bookings
            .values()
            .filter(|b| b.provider_id == provider_id && b.status == BookingStatus::Completed)
        {
            earnings.completed_jobs += 1;
            if let Some(cut) = &booking.provider_cut {
                earnings.total_earnings += cut;
                if booking.is_paid_to_provider {
                    earnings.paid_out += cut;
                } else {
                    earnings.outstanding += cut;
                }
            }
        }
        Ok(earnings)
    }
}

#[async_trait]
impl RatingExt for MemoryStore {
    async fn upsert_rating(
        &self,
        provider_id: Uuid,
        client_id: Uuid,
        stars: i32,
        comment: Option<String>,
    ) -> Result<Rating, Error> {
        let mut ratings = self.ratings.write().await;
        let rating = ratings
            .entry((provider_id, client_id))
            .and_modify(|existing| {
                existing.stars = stars;
                existing.comment = comment.clone();
            })
            .or_insert_with(|| Rating {
                id: Uuid::new_v4(),
                provider_id,
                client_id,
                stars,
                comment: comment.clone(),
                created_at: Utc::now(),
            });
        Ok(rating.clone())
    }

    async fn get_rating_aggregate(
        &self,
        provider_id: Uuid,
    ) -> Result<RatingAggregate, Error> {
        let ratings = self.ratings.read().await;
        let (total, count) = ratings
            .values()
            .filter(|r| r.provider_id == provider_id)
            .fold((0i64, 0i64), |(total, count), r| (total + r.stars as i64, count + 1));

        let average = if count == 0 { 0.0 } else { total as f64 / count as f64 };
        Ok(RatingAggregate {
            average,
            review_count: count,
        })
    }

    async fn get_provider_ratings(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Rating>, Error> {
        let ratings = self.ratings.read().await;
        let mut found: Vec<Rating> = ratings
            .values()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        newest_first(&mut found, |r| (r.created_at, r.id));
        Ok(found)
    }
}
