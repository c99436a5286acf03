// service/payout.rs
use bigdecimal::RoundingMode;
use num_traits::Zero;
use serde::Serialize;
use sqlx::types::BigDecimal;

use crate::service::error::ServiceError;

/// Currency precision, in fractional digits.
pub const MONEY_SCALE: i64 = 2;

/// Largest amount a NUMERIC(12, 2) money column holds.
pub fn max_amount() -> BigDecimal {
    BigDecimal::new(999_999_999_999i64.into(), MONEY_SCALE)
}

/// Provider share of a booking amount: 0.90.
fn provider_share() -> BigDecimal {
    BigDecimal::new(90i32.into(), 2)
}

/// The provider/platform split of one booking amount.
///
/// Fields are private so the only way to obtain a `Payout` is through
/// [`split`], which keeps `provider_cut + platform_fee == amount`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payout {
    amount: BigDecimal,
    provider_cut: BigDecimal,
    platform_fee: BigDecimal,
}

impl Payout {
    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn provider_cut(&self) -> &BigDecimal {
        &self.provider_cut
    }

    pub fn platform_fee(&self) -> &BigDecimal {
        &self.platform_fee
    }
}

/// Splits `amount` 90/10 between provider and platform.
///
/// The provider cut is rounded half-even to the currency scale and the
/// platform fee takes the remainder, so nothing leaks in rounding.
pub fn split(amount: &BigDecimal) -> Result<Payout, ServiceError> {
    if amount <= &BigDecimal::zero() {
        return Err(ServiceError::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount.with_scale(MONEY_SCALE) != *amount {
        return Err(ServiceError::InvalidAmount(format!(
            "amount {} has more than {} decimal places",
            amount, MONEY_SCALE
        )));
    }

    if amount > &max_amount() {
        return Err(ServiceError::InvalidAmount(format!(
            "amount {} exceeds the maximum of {}",
            amount,
            max_amount()
        )));
    }

    let amount = amount.with_scale(MONEY_SCALE);
    let provider_cut = (&amount * provider_share()).with_scale_round(MONEY_SCALE, RoundingMode::HalfEven);
    let platform_fee = &amount - &provider_cut;

    Ok(Payout {
        amount,
        provider_cut,
        platform_fee,
    })
}
