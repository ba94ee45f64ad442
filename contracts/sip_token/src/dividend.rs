/// Calculate what an investor can still withdraw from the dividend pool
///
/// Formula: owed = total_deposited × token_balance / total_supply − withdrawn
///
/// Computed from cumulative deposits rather than the current pool, so the
/// result only grows when the pool is topped up and repeated withdrawals
/// never pay the same share twice. Rounds down; the pool always covers the
/// sum of what is owed.
///
/// Example:
/// - total_deposited: 1,000, balance: 250, supply: 1,000, withdrawn: 0
/// - owed: 1,000 × 250 / 1,000 = 250
pub fn calculate_entitlement(
    total_deposited: i128,
    token_balance: i128,
    total_supply: i128,
    dividends_withdrawn: i128,
) -> Option<i128> {
    if token_balance <= 0 || total_supply <= 0 {
        return Some(0);
    }

    let share = total_deposited
        .checked_mul(token_balance)?
        .checked_div(total_supply)?;

    Some(share.saturating_sub(dividends_withdrawn).max(0))
}
