use cosmwasm_std::{Uint128, Uint256};

use crate::error::PriceError;

/// Largest integer a double can represent exactly. Numerator and denominator
/// produced by [`Price::from_decimal`] are kept within this range so that
/// round-tripping through a human decimal never silently loses precision.
const SAFE_INTEGER_MAX: u64 = 1 << 53;

/// A rational price already adjusted for the decimals of the two tokens it
/// relates: `output_units = input_units * num / denom`.
///
/// The only ways to build one are [`Price::from_decimal`] (from a
/// human-readable price plus both tokens' decimals) and [`Price::from_parts`]
/// (from an already-scaled numerator/denominator, e.g. a value read back out
/// of contract storage or supplied by a caller). Both validate `denom > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    num: u64,
    denom: u64,
}

impl Price {
    /// Build a `Price` from an already-scaled numerator/denominator pair.
    pub fn from_parts(num: u64, denom: u64) -> Result<Self, PriceError> {
        if denom == 0 {
            return Err(PriceError::PriceOutOfRange {});
        }
        Ok(Self { num, denom })
    }

    /// Translate a human decimal price `p` (units of `to` per unit of `from`)
    /// into an integer `(num, denom)` pair such that multiplying a `from`
    /// amount in base units by `num/denom` yields a `to` amount in base
    /// units.
    ///
    /// `PRECISION = min(6, 15 - |decimals_to - decimals_from|)`; fails with
    /// [`PriceError::PriceOutOfRange`] if that budget would be negative.
    pub fn from_decimal(p: f64, decimals_from: u8, decimals_to: u8) -> Result<Self, PriceError> {
        if !p.is_finite() || p < 0.0 {
            return Err(PriceError::PriceOutOfRange {});
        }

        let delta = decimals_to as i32 - decimals_from as i32;
        let budget = 15 - delta.abs();
        if budget < 0 {
            return Err(PriceError::PriceOutOfRange {});
        }
        let precision = budget.min(6);

        let denom_exp = precision;
        let num_exp = precision + delta;

        let denom = 10f64.powi(denom_exp);
        let num = (p * 10f64.powi(num_exp)).floor();

        if !num.is_finite() || num < 0.0 || num > SAFE_INTEGER_MAX as f64 || denom > SAFE_INTEGER_MAX as f64 {
            return Err(PriceError::PriceOutOfRange {});
        }

        Self::from_parts(num as u64, denom as u64)
    }

    pub fn num(&self) -> u64 {
        self.num
    }

    pub fn denom(&self) -> u64 {
        self.denom
    }

    /// Reconstruct the human decimal price this fraction encodes, adjusted
    /// back by `10^(decimals_from - decimals_to)`. Used only by round-trip
    /// tests and diagnostics — contract arithmetic never goes through here.
    pub fn to_decimal(&self, decimals_from: u8, decimals_to: u8) -> f64 {
        let delta = decimals_to as i32 - decimals_from as i32;
        (self.num as f64 / self.denom as f64) / 10f64.powi(delta)
    }
}

/// `expected = from_amount * price.num / price.denom`, then apply
/// `(10_000 - slippage_bp) / 10_000`. All multiplication happens in
/// `Uint256` so a `u128` amount times a `u64` numerator can never overflow
/// before the division narrows it back down.
pub fn min_out(from_amount: u128, price: Price, slippage_bp: u16) -> Result<u128, PriceError> {
    if from_amount == 0 {
        return Err(PriceError::ZeroInput {});
    }

    let expected = Uint256::from(from_amount)
        .checked_mul(Uint256::from(price.num()))
        .map_err(|_| PriceError::PriceOutOfRange {})?
        .checked_div(Uint256::from(price.denom()))
        .map_err(|_| PriceError::PriceOutOfRange {})?;

    let retained_bp = 10_000u64.saturating_sub(slippage_bp as u64);
    let min_amount_out = expected
        .checked_mul(Uint256::from(retained_bp))
        .map_err(|_| PriceError::PriceOutOfRange {})?
        .checked_div(Uint256::from(10_000u64))
        .map_err(|_| PriceError::PriceOutOfRange {})?;

    Uint128::try_from(min_amount_out)
        .map(|v| v.u128())
        .map_err(|_| PriceError::PriceOutOfRange {})
}

/// Current ratio of reserves, adjusted for decimals, as a real number. Used
/// only to decide whether an order's trigger condition is met — never fed
/// back into on-chain arithmetic.
pub fn spot_price(
    reserve_from: u128,
    reserve_to: u128,
    decimals_from: u8,
    decimals_to: u8,
) -> Result<f64, PriceError> {
    if reserve_from == 0 || reserve_to == 0 {
        return Err(PriceError::ZeroReserve {});
    }

    let from_units = reserve_from as f64 / 10f64.powi(decimals_from as i32);
    let to_units = reserve_to as f64 / 10f64.powi(decimals_to as i32);

    Ok(to_units / from_units)
}
