use crate::error::Error;

/// Sale accepts contributions while strictly below the cap
pub fn is_open(total_raised: i128, cap: i128) -> bool {
    total_raised < cap
}

/// Validate a contribution against the cap and return the new total raised.
///
/// No partial fills: a contribution that would cross the cap is rejected
/// whole. Landing exactly on the cap is accepted and closes the sale.
///
/// Example:
/// - cap: 100, total_raised: 10
/// - amount 90 → Ok(100)
/// - amount 91 → CapExceeded
pub fn check_contribution(total_raised: i128, cap: i128, amount: i128) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    if !is_open(total_raised, cap) {
        return Err(Error::SaleClosed);
    }

    let new_total = total_raised
        .checked_add(amount)
        .ok_or(Error::InvalidAmount)?;

    if new_total > cap {
        return Err(Error::CapExceeded);
    }

    Ok(new_total)
}

/// Calculate tokens issued for a contribution
///
/// Formula: tokens = amount × conversion_rate
///
/// Both sides are base units at the ledger's decimals, so the rate applies
/// without rescaling and `token_balance == contributed_amount × rate` holds
/// exactly.
pub fn calculate_tokens(amount: i128, conversion_rate: i128) -> Option<i128> {
    amount.checked_mul(conversion_rate)
}

/// Express an amount held at `from_decimals` in base units at `to_decimals`.
///
/// Returns `None` on overflow or when scaling down would drop dust.
///
/// Example:
/// - 1.5 at 18 decimals → 1.5 at 7 decimals: 1_500_000_000_000_000_000 → 15_000_000
pub fn normalize_amount(amount: i128, from_decimals: u32, to_decimals: u32) -> Option<i128> {
    if from_decimals == to_decimals {
        return Some(amount);
    }

    if from_decimals < to_decimals {
        let factor = 10i128.checked_pow(to_decimals - from_decimals)?;
        return amount.checked_mul(factor);
    }

    let factor = 10i128.checked_pow(from_decimals - to_decimals)?;
    if amount % factor != 0 {
        return None;
    }
    Some(amount / factor)
}
