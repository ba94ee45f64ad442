use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Cap, rate, decimals, fee or metadata rejected at initialization
    InvalidConfig = 3,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller is not the beneficiary
    Unauthorized = 10,

    // ============================================
    // SALE ERRORS (20-29)
    // ============================================
    /// Cap already reached, no more contributions accepted
    SaleClosed = 20,
    /// Contribution would push total raised over the cap
    CapExceeded = 21,
    /// Operation needs the sale to be closed first
    SaleStillOpen = 22,

    // ============================================
    // PAYMENT ERRORS (30-39)
    // ============================================
    /// Attached native payment below the configured minimum
    InsufficientNativePayment = 30,
    /// Stablecoin allowance granted to the ledger is too small
    InsufficientAllowance = 31,
    /// Payer doesn't hold enough of the asset being pulled
    InsufficientBalance = 32,

    // ============================================
    // DIVIDEND ERRORS (40-49)
    // ============================================
    /// Nothing to withdraw for this investor
    ZeroEntitlement = 40,

    // ============================================
    // RELEASE ERRORS (50-59)
    // ============================================
    /// Release attempted before the cap was met
    CapNotReached = 50,
    /// Funds were already released
    AlreadyReleased = 51,

    // ============================================
    // AMOUNT ERRORS (60-69)
    // ============================================
    /// Amount must be positive, representable and not overflow
    InvalidAmount = 60,
}
