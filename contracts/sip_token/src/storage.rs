use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env, String};

// Constants
pub const MAX_DECIMALS: u32 = 18;

pub const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280; // ~1 day
pub const INSTANCE_BUMP_AMOUNT: u32 = 86_400; // ~5 days
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960; // ~7 days
pub const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200; // ~60 days

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SaleStatus {
    /// Contributions accepted, total raised below cap
    Open = 0,
    /// Cap reached, waiting for the beneficiary to release funds
    Closed = 1,
    /// Funds released to the beneficiary (terminal)
    Released = 2,
}

/// Fixed at initialization, never rewritten.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    pub token_name: String,
    pub token_symbol: String,
    /// Decimal precision of issued tokens and of the unit of account
    pub decimals: u32,
    /// Maximum raise, in base units of the unit of account
    pub cap: i128,
    /// Issued tokens per unit of account (1 means 1 USD = 1 token)
    pub conversion_rate: i128,
    /// Only address allowed to release the raised funds
    pub beneficiary: Address,
    /// Stablecoin token contract (pulled via allowance, pays dividends)
    pub stablecoin: Address,
    /// Native asset contract used for the fee attached to `buy_tokens`
    pub native_token: Address,
    /// Minimum native payment attached to each purchase
    pub min_native_payment: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerState {
    /// Accepted contributions, both intake paths, in unit of account
    pub total_raised: i128,
    /// Sum of every investor's token balance
    pub total_supply: i128,
    pub funds_released: bool,
    /// Stablecoin available for dividends (deposited minus withdrawn)
    pub dividend_pool: i128,
    /// Every dividend deposit ever made; entitlements are computed from this
    pub total_dividends_deposited: i128,
    pub investor_count: u32,
}

impl LedgerState {
    pub fn new() -> Self {
        Self {
            total_raised: 0,
            total_supply: 0,
            funds_released: false,
            dividend_pool: 0,
            total_dividends_deposited: 0,
            investor_count: 0,
        }
    }
}

/// Audit trail keeping the native and stablecoin revenue streams apart
/// even though both feed `total_raised`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingAccounting {
    /// Contributions recorded through `buy_tokens`
    pub raised_via_native: i128,
    /// Contributions recorded through `receive_payment` (normalized)
    pub raised_via_stablecoin: i128,
    /// Native payments held by the ledger until release
    pub native_collected: i128,
    /// Stablecoin held for the raise until release, excludes the dividend pool
    pub stablecoin_collected: i128,
}

impl FundingAccounting {
    pub fn new() -> Self {
        Self {
            raised_via_native: 0,
            raised_via_stablecoin: 0,
            native_collected: 0,
            stablecoin_collected: 0,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorRecord {
    pub token_balance: i128,
    pub contributed_amount: i128,
    pub dividends_withdrawn: i128,
}

impl InvestorRecord {
    pub fn new() -> Self {
        Self {
            token_balance: 0,
            contributed_amount: 0,
            dividends_withdrawn: 0,
        }
    }
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    State,
    Accounting,
    Investor(Address),
    Initialized,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn read_config(env: &Env) -> Result<SaleConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn read_state(env: &Env) -> Result<LedgerState, Error> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

pub fn write_state(env: &Env, state: &LedgerState) {
    env.storage().instance().set(&DataKey::State, state);
}

pub fn read_accounting(env: &Env) -> FundingAccounting {
    env.storage()
        .instance()
        .get::<DataKey, FundingAccounting>(&DataKey::Accounting)
        .unwrap_or(FundingAccounting::new())
}

pub fn write_accounting(env: &Env, accounting: &FundingAccounting) {
    env.storage()
        .instance()
        .set(&DataKey::Accounting, accounting);
}

/// `None` until the investor's first contribution.
pub fn read_investor(env: &Env, investor: &Address) -> Option<InvestorRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Investor(investor.clone()))
}

pub fn write_investor(env: &Env, investor: &Address, record: &InvestorRecord) {
    let key = DataKey::Investor(investor.clone());
    env.storage().persistent().set(&key, record);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}
