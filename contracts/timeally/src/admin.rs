use crate::error::TimeAllyError;
use crate::storage_types::{DataKey, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};
use soroban_sdk::{contracttype, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token locked as principal and lent against.
    pub stake_token: Address,
    /// Token paid out by the monthly distribution. Must differ from
    /// `stake_token`: rewards are paid from whatever custody holds.
    pub reward_token: Address,
    /// Contract reporting the pool released for each period.
    pub release_pool: Address,
    pub period_seconds: u64,
    /// Number of contract ids examined per distribution step.
    pub distribution_batch_size: u32,
}

pub fn has_administrator(e: &Env) -> bool {
    let key = DataKey::Admin;
    e.storage().instance().has(&key)
}

pub fn read_administrator(e: &Env) -> Result<Address, TimeAllyError> {
    let key = DataKey::Admin;
    e.storage()
        .instance()
        .get(&key)
        .ok_or(TimeAllyError::NotInitialized)
}

pub fn write_administrator(e: &Env, id: &Address) {
    let key = DataKey::Admin;
    e.storage().instance().set(&key, id);
}

pub fn require_admin(e: &Env) -> Result<Address, TimeAllyError> {
    let admin = read_administrator(e)?;
    admin.require_auth();
    bump_instance(e);
    Ok(admin)
}

pub fn write_config(e: &Env, config: &Config) {
    let key = DataKey::Config;
    e.storage().instance().set(&key, config);
}

pub fn read_config(e: &Env) -> Result<Config, TimeAllyError> {
    let key = DataKey::Config;
    e.storage()
        .instance()
        .get(&key)
        .ok_or(TimeAllyError::NotInitialized)
}

pub fn validate_config(config: &Config) -> Result<(), TimeAllyError> {
    if config.period_seconds == 0 || config.distribution_batch_size == 0 {
        return Err(TimeAllyError::InvalidAmount);
    }
    if config.stake_token == config.reward_token {
        return Err(TimeAllyError::SharedCustodyToken);
    }
    Ok(())
}

pub fn write_launch_timestamp(e: &Env, timestamp: u64) {
    e.storage()
        .instance()
        .set(&DataKey::LaunchTimestamp, &timestamp);
}

/// Whole periods elapsed since the contract was initialized.
pub fn current_period(e: &Env) -> Result<u64, TimeAllyError> {
    let config = read_config(e)?;
    let launched: u64 = e
        .storage()
        .instance()
        .get(&DataKey::LaunchTimestamp)
        .ok_or(TimeAllyError::NotInitialized)?;

    let elapsed = e.ledger().timestamp().saturating_sub(launched);
    Ok(elapsed / config.period_seconds)
}

pub fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
