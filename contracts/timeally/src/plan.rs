use crate::error::TimeAllyError;
use crate::storage_types::{DataKey, LEDGER_BUMP_AMOUNT, LEDGER_LIFETIME_THRESHOLD};
use soroban_sdk::{contracttype, Env};

/// Staking terms shared by every position opened against the plan.
///
/// Plans are append-only: once written a plan is never updated or removed, so
/// positions keep the terms they were created with.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    pub plan_id: u32,
    /// Lock duration in seconds.
    pub lock_period: u64,
    pub loan_interest_rate_bp: u32,
    /// Seconds a loan may stay outstanding before it is due.
    pub loan_period: u64,
    /// Number of reward slots each position carries.
    pub refund_installment_count: u32,
}

pub fn plan_count(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&DataKey::PlanCount)
        .unwrap_or(0u32)
}

fn get_and_increase_plan_id(e: &Env) -> u32 {
    let prev = plan_count(e);
    e.storage().instance().set(&DataKey::PlanCount, &(prev + 1));
    prev
}

pub fn add_plan(
    e: &Env,
    lock_period: u64,
    loan_interest_rate_bp: u32,
    loan_period: u64,
    refund_installment_count: u32,
) -> Result<Plan, TimeAllyError> {
    if lock_period == 0 || refund_installment_count == 0 {
        return Err(TimeAllyError::InvalidAmount);
    }

    let plan = Plan {
        plan_id: get_and_increase_plan_id(e),
        lock_period,
        loan_interest_rate_bp,
        loan_period,
        refund_installment_count,
    };

    let key = DataKey::Plan(plan.plan_id);
    e.storage().persistent().set(&key, &plan);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_LIFETIME_THRESHOLD, LEDGER_BUMP_AMOUNT);

    Ok(plan)
}

pub fn read_plan(e: &Env, plan_id: u32) -> Result<Plan, TimeAllyError> {
    let key = DataKey::Plan(plan_id);
    let plan = e
        .storage()
        .persistent()
        .get::<DataKey, Plan>(&key)
        .ok_or(TimeAllyError::UnknownPlan)?;
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_LIFETIME_THRESHOLD, LEDGER_BUMP_AMOUNT);
    Ok(plan)
}
