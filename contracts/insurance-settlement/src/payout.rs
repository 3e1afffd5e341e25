//! Payout arithmetic. Integer basis points only; the result is floored to
//! the token's smallest unit.

use crate::types::{StatusCode, BPS_DENOMINATOR};

/// Amount credited for `premium` at `payout_bps`, or `None` on overflow.
pub fn payout(premium: i128, payout_bps: u32) -> Option<i128> {
    premium
        .checked_mul(i128::from(payout_bps))?
        .checked_div(BPS_DENOMINATOR)
}

/// Only delays the airline is responsible for pay out.
pub fn is_compensable(status: StatusCode) -> bool {
    status == StatusCode::LateAirline
}
