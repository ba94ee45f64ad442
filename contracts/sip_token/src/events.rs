use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensPurchasedEvent {
    pub buyer: Address,
    pub usd_amount: i128,
    pub native_payment: i128,
    pub tokens_issued: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentReceivedEvent {
    pub payer: Address,
    pub stablecoin_amount: i128,
    /// `stablecoin_amount` expressed in the ledger's unit of account
    pub credited_amount: i128,
    pub tokens_issued: i128,
    pub total_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleClosedEvent {
    pub total_raised: i128,
    pub total_supply: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DividendsDepositedEvent {
    pub from: Address,
    pub amount: i128,
    pub dividend_pool: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DividendsWithdrawnEvent {
    pub investor: Address,
    pub amount: i128,
    pub dividends_withdrawn: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsReleasedEvent {
    pub beneficiary: Address,
    pub native_amount: i128,
    pub stablecoin_amount: i128,
    pub total_raised: i128,
}
