#![no_std]

mod dividend;
mod error;
mod events;
mod sale;
mod storage;


pub use error::Error;
pub use storage::{FundingAccounting, InvestorRecord, LedgerState, SaleConfig, SaleStatus};

use dividend::calculate_entitlement;
use events::*;
use sale::{calculate_tokens, check_contribution, normalize_amount};
use storage::{
    bump_instance, is_initialized, read_accounting, read_config, read_investor, read_state,
    write_accounting, write_investor, write_state, DataKey, MAX_DECIMALS,
};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, String, Symbol};

#[contract]
pub struct SipToken;

#[contractimpl]
impl SipToken {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize the sale. Every value passed here is immutable afterwards.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidConfig`: Empty metadata, decimals > 18, non-positive cap or
    ///   rate, negative minimum native payment
    pub fn initialize(env: Env, config: SaleConfig) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        config.beneficiary.require_auth();

        if config.token_name.len() == 0
            || config.token_symbol.len() == 0
            || config.decimals > MAX_DECIMALS
            || config.cap <= 0
            || config.conversion_rate <= 0
            || config.min_native_payment < 0
        {
            return Err(Error::InvalidConfig);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Config, &config);
        write_state(&env, &LedgerState::new());
        write_accounting(&env, &FundingAccounting::new());
        bump_instance(&env);

        log!(&env, "sale initialized", config.cap, config.conversion_rate);

        Ok(())
    }

    // ============================================
    // PAYMENT INTAKE: NATIVE
    // ============================================

    /// Buy tokens for `usd_amount`, attaching `native_payment` of the native
    /// asset as the purchase fee. Returns the tokens issued.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: usd_amount must be positive, native_payment not negative
    /// - `SaleClosed`: Cap already reached
    /// - `CapExceeded`: Purchase would cross the cap
    /// - `InsufficientNativePayment`: Fee below the configured minimum
    /// - `InsufficientBalance`: Buyer can't cover the fee
    pub fn buy_tokens(
        env: Env,
        buyer: Address,
        usd_amount: i128,
        native_payment: i128,
    ) -> Result<i128, Error> {
        let config = read_config(&env)?;
        let mut state = read_state(&env)?;

        buyer.require_auth();

        let new_total = check_contribution(state.total_raised, config.cap, usd_amount)?;

        if native_payment < 0 {
            return Err(Error::InvalidAmount);
        }
        if native_payment < config.min_native_payment {
            return Err(Error::InsufficientNativePayment);
        }

        let tokens = calculate_tokens(usd_amount, config.conversion_rate)
            .ok_or(Error::InvalidAmount)?;

        // Collect the fee before touching any accounting
        if native_payment > 0 {
            let native_client = token::Client::new(&env, &config.native_token);
            if native_client.balance(&buyer) < native_payment {
                return Err(Error::InsufficientBalance);
            }
            native_client.transfer(&buyer, &env.current_contract_address(), &native_payment);
        }

        Self::credit_investor(&env, &mut state, &buyer, usd_amount, tokens)?;
        state.total_raised = new_total;

        let mut accounting = read_accounting(&env);
        accounting.raised_via_native = accounting
            .raised_via_native
            .checked_add(usd_amount)
            .ok_or(Error::InvalidAmount)?;
        accounting.native_collected = accounting
            .native_collected
            .checked_add(native_payment)
            .ok_or(Error::InvalidAmount)?;

        write_state(&env, &state);
        write_accounting(&env, &accounting);
        bump_instance(&env);

        env.events().publish(
            (Symbol::new(&env, "tokens_purchased"), buyer.clone()),
            TokensPurchasedEvent {
                buyer,
                usd_amount,
                native_payment,
                tokens_issued: tokens,
                total_raised: state.total_raised,
            },
        );
        Self::publish_if_closed(&env, &config, &state);

        Ok(tokens)
    }

    // ============================================
    // PAYMENT INTAKE: STABLECOIN
    // ============================================

    /// Pull `amount` of stablecoin previously approved by `payer` and credit
    /// it as a contribution. Returns the tokens issued.
    ///
    /// Allowance and balance are verified, then funds are pulled, and only
    /// then is any accounting written.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount not positive or not representable at the
    ///   ledger's decimals
    /// - `SaleClosed`: Cap already reached
    /// - `CapExceeded`: Payment would cross the cap
    /// - `InsufficientAllowance`: Payer approved less than `amount`
    /// - `InsufficientBalance`: Payer holds less than `amount`
    pub fn receive_payment(env: Env, payer: Address, amount: i128) -> Result<i128, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = read_config(&env)?;
        let mut state = read_state(&env)?;

        payer.require_auth();

        let stablecoin_client = token::Client::new(&env, &config.stablecoin);
        let credited = normalize_amount(amount, stablecoin_client.decimals(), config.decimals)
            .ok_or(Error::InvalidAmount)?;

        let new_total = check_contribution(state.total_raised, config.cap, credited)?;
        let tokens =
            calculate_tokens(credited, config.conversion_rate).ok_or(Error::InvalidAmount)?;

        let ledger = env.current_contract_address();
        if stablecoin_client.allowance(&payer, &ledger) < amount {
            return Err(Error::InsufficientAllowance);
        }
        if stablecoin_client.balance(&payer) < amount {
            return Err(Error::InsufficientBalance);
        }

        stablecoin_client.transfer_from(&ledger, &payer, &ledger, &amount);

        Self::credit_investor(&env, &mut state, &payer, credited, tokens)?;
        state.total_raised = new_total;

        let mut accounting = read_accounting(&env);
        accounting.raised_via_stablecoin = accounting
            .raised_via_stablecoin
            .checked_add(credited)
            .ok_or(Error::InvalidAmount)?;
        accounting.stablecoin_collected = accounting
            .stablecoin_collected
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        write_state(&env, &state);
        write_accounting(&env, &accounting);
        bump_instance(&env);

        env.events().publish(
            (Symbol::new(&env, "payment_received"), payer.clone()),
            PaymentReceivedEvent {
                payer,
                stablecoin_amount: amount,
                credited_amount: credited,
                tokens_issued: tokens,
                total_raised: state.total_raised,
            },
        );
        Self::publish_if_closed(&env, &config, &state);

        Ok(tokens)
    }

    // ============================================
    // DIVIDENDS
    // ============================================

    /// Fund the dividend pool with `amount` of stablecoin from `from`.
    ///
    /// Only accepted once the sale is closed, when token balances can no
    /// longer change.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount must be positive
    /// - `SaleStillOpen`: Cap not reached yet
    /// - `InsufficientBalance`: Funder holds less than `amount`
    pub fn deposit_dividends(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = read_config(&env)?;
        let mut state = read_state(&env)?;

        if sale::is_open(state.total_raised, config.cap) {
            return Err(Error::SaleStillOpen);
        }

        from.require_auth();

        let stablecoin_client = token::Client::new(&env, &config.stablecoin);
        if stablecoin_client.balance(&from) < amount {
            return Err(Error::InsufficientBalance);
        }
        stablecoin_client.transfer(&from, &env.current_contract_address(), &amount);

        state.dividend_pool = state
            .dividend_pool
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        state.total_dividends_deposited = state
            .total_dividends_deposited
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        write_state(&env, &state);
        bump_instance(&env);

        env.events().publish(
            (Symbol::new(&env, "dividends_deposited"), from.clone()),
            DividendsDepositedEvent {
                from,
                amount,
                dividend_pool: state.dividend_pool,
            },
        );

        Ok(())
    }

    /// Withdraw the caller's outstanding dividend share. Returns the amount
    /// paid out.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroEntitlement`: No tokens held or nothing owed since the last
    ///   withdrawal
    pub fn withdraw_amount(env: Env, investor: Address) -> Result<i128, Error> {
        let config = read_config(&env)?;
        let mut state = read_state(&env)?;

        investor.require_auth();

        let mut record = read_investor(&env, &investor).ok_or(Error::ZeroEntitlement)?;

        let owed = calculate_entitlement(
            state.total_dividends_deposited,
            record.token_balance,
            state.total_supply,
            record.dividends_withdrawn,
        )
        .ok_or(Error::InvalidAmount)?;

        if owed <= 0 {
            return Err(Error::ZeroEntitlement);
        }

        let stablecoin_client = token::Client::new(&env, &config.stablecoin);
        stablecoin_client.transfer(&env.current_contract_address(), &investor, &owed);

        record.dividends_withdrawn = record
            .dividends_withdrawn
            .checked_add(owed)
            .ok_or(Error::InvalidAmount)?;
        state.dividend_pool = state
            .dividend_pool
            .checked_sub(owed)
            .ok_or(Error::InvalidAmount)?;

        write_investor(&env, &investor, &record);
        write_state(&env, &state);
        bump_instance(&env);

        env.events().publish(
            (Symbol::new(&env, "dividends_withdrawn"), investor.clone()),
            DividendsWithdrawnEvent {
                investor,
                amount: owed,
                dividends_withdrawn: record.dividends_withdrawn,
            },
        );

        Ok(owed)
    }

    // ============================================
    // FUND RELEASE
    // ============================================

    /// Send every collected native payment and stablecoin contribution to the
    /// beneficiary. One-shot; the dividend pool stays in the ledger.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not the beneficiary
    /// - `AlreadyReleased`: Funds were released before
    /// - `CapNotReached`: Sale still open
    pub fn release_funds(env: Env, caller: Address) -> Result<(), Error> {
        let config = read_config(&env)?;
        let mut state = read_state(&env)?;

        caller.require_auth();

        if caller != config.beneficiary {
            return Err(Error::Unauthorized);
        }

        if state.funds_released {
            return Err(Error::AlreadyReleased);
        }

        if sale::is_open(state.total_raised, config.cap) {
            return Err(Error::CapNotReached);
        }

        let mut accounting = read_accounting(&env);
        let native_amount = accounting.native_collected;
        let stablecoin_amount = accounting.stablecoin_collected;
        let ledger = env.current_contract_address();

        if native_amount > 0 {
            token::Client::new(&env, &config.native_token).transfer(
                &ledger,
                &config.beneficiary,
                &native_amount,
            );
        }
        if stablecoin_amount > 0 {
            token::Client::new(&env, &config.stablecoin).transfer(
                &ledger,
                &config.beneficiary,
                &stablecoin_amount,
            );
        }

        accounting.native_collected = 0;
        accounting.stablecoin_collected = 0;
        state.funds_released = true;

        write_accounting(&env, &accounting);
        write_state(&env, &state);
        bump_instance(&env);

        log!(&env, "funds released", native_amount, stablecoin_amount);

        env.events().publish(
            (Symbol::new(&env, "funds_released"), config.beneficiary.clone()),
            FundsReleasedEvent {
                beneficiary: config.beneficiary,
                native_amount,
                stablecoin_amount,
                total_raised: state.total_raised,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// True while total raised is below the cap
    pub fn is_open(env: Env) -> bool {
        match (read_config(&env), read_state(&env)) {
            (Ok(config), Ok(state)) => sale::is_open(state.total_raised, config.cap),
            _ => false,
        }
    }

    pub fn sale_status(env: Env) -> Result<SaleStatus, Error> {
        let config = read_config(&env)?;
        let state = read_state(&env)?;

        if state.funds_released {
            Ok(SaleStatus::Released)
        } else if sale::is_open(state.total_raised, config.cap) {
            Ok(SaleStatus::Open)
        } else {
            Ok(SaleStatus::Closed)
        }
    }

    pub fn name(env: Env) -> Result<String, Error> {
        Ok(read_config(&env)?.token_name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        Ok(read_config(&env)?.token_symbol)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        Ok(read_config(&env)?.decimals)
    }

    pub fn cap(env: Env) -> Result<i128, Error> {
        Ok(read_config(&env)?.cap)
    }

    pub fn conversion_rate(env: Env) -> Result<i128, Error> {
        Ok(read_config(&env)?.conversion_rate)
    }

    pub fn beneficiary(env: Env) -> Result<Address, Error> {
        Ok(read_config(&env)?.beneficiary)
    }

    pub fn get_config(env: Env) -> Result<SaleConfig, Error> {
        read_config(&env)
    }

    pub fn get_state(env: Env) -> Result<LedgerState, Error> {
        read_state(&env)
    }

    /// Per-stream breakdown of what was raised and what is held for release
    pub fn get_accounting(env: Env) -> Result<FundingAccounting, Error> {
        if !is_initialized(&env) {
            return Err(Error::NotInitialized);
        }
        Ok(read_accounting(&env))
    }

    pub fn total_raised(env: Env) -> Result<i128, Error> {
        Ok(read_state(&env)?.total_raised)
    }

    pub fn total_supply(env: Env) -> Result<i128, Error> {
        Ok(read_state(&env)?.total_supply)
    }

    pub fn investor_count(env: Env) -> Result<u32, Error> {
        Ok(read_state(&env)?.investor_count)
    }

    pub fn funds_released(env: Env) -> Result<bool, Error> {
        Ok(read_state(&env)?.funds_released)
    }

    pub fn dividend_pool(env: Env) -> Result<i128, Error> {
        Ok(read_state(&env)?.dividend_pool)
    }

    pub fn balance_of(env: Env, investor: Address) -> i128 {
        Self::get_investor(env, investor).token_balance
    }

    /// Investors that never contributed read back as an all-zero record
    pub fn get_investor(env: Env, investor: Address) -> InvestorRecord {
        read_investor(&env, &investor).unwrap_or(InvestorRecord::new())
    }

    /// Preview of what `withdraw_amount` would pay right now
    pub fn withdrawable_dividends(env: Env, investor: Address) -> Result<i128, Error> {
        let state = read_state(&env)?;
        let record = read_investor(&env, &investor).unwrap_or(InvestorRecord::new());

        calculate_entitlement(
            state.total_dividends_deposited,
            record.token_balance,
            state.total_supply,
            record.dividends_withdrawn,
        )
        .ok_or(Error::InvalidAmount)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    /// Add a contribution to the investor record and the issued supply.
    /// Writes the investor record; the caller writes `state`.
    fn credit_investor(
        env: &Env,
        state: &mut LedgerState,
        investor: &Address,
        amount: i128,
        tokens: i128,
    ) -> Result<(), Error> {
        let mut record = match read_investor(env, investor) {
            Some(record) => record,
            None => {
                state.investor_count = state
                    .investor_count
                    .checked_add(1)
                    .ok_or(Error::InvalidAmount)?;
                InvestorRecord::new()
            }
        };

        record.contributed_amount = record
            .contributed_amount
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        record.token_balance = record
            .token_balance
            .checked_add(tokens)
            .ok_or(Error::InvalidAmount)?;
        state.total_supply = state
            .total_supply
            .checked_add(tokens)
            .ok_or(Error::InvalidAmount)?;

        write_investor(env, investor, &record);
        Ok(())
    }

    fn publish_if_closed(env: &Env, config: &SaleConfig, state: &LedgerState) {
        if sale::is_open(state.total_raised, config.cap) {
            return;
        }

        log!(env, "sale closed", state.total_raised);

        env.events().publish(
            (Symbol::new(env, "sale_closed"),),
            SaleClosedEvent {
                total_raised: state.total_raised,
                total_supply: state.total_supply,
            },
        );
    }
}
