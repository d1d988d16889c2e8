use crate::actions::distribution::DistributionCursor;
use crate::plan::Plan;
use soroban_sdk::{symbol_short, Address, Env};

/// Emits an event when a plan is appended to the registry.
pub fn emit_plan_created(env: &Env, plan: &Plan) {
    env.events().publish(
        (symbol_short!("plan"), symbol_short!("create"), plan.plan_id),
        (
            plan.lock_period,
            plan.loan_interest_rate_bp,
            plan.loan_period,
            plan.refund_installment_count,
        ),
    );
}

/// Emits an event when a stake position is opened.
pub fn emit_position_opened(
    env: &Env,
    owner: &Address,
    contract_id: u64,
    plan_id: u32,
    principal: i128,
) {
    env.events().publish(
        (symbol_short!("stake"), symbol_short!("open"), owner.clone()),
        (contract_id, plan_id, principal),
    );
}

/// Emits an event when a position changes hands.
pub fn emit_ownership_transferred(env: &Env, contract_id: u64, from: &Address, to: &Address) {
    env.events().publish((symbol_short!("transfer"), from.clone(), to.clone()), contract_id);
}

/// Emits an event when a loan is taken against a position.
pub fn emit_loan_taken(env: &Env, owner: &Address, contract_id: u64, amount: i128) {
    env.events().publish(
        (symbol_short!("loan"), symbol_short!("open"), owner.clone()),
        (contract_id, amount),
    );
}

/// Emits an event when a loan is repaid.
pub fn emit_loan_repaid(env: &Env, owner: &Address, contract_id: u64, repaid: i128) {
    env.events().publish(
        (symbol_short!("loan"), symbol_short!("close"), owner.clone()),
        (contract_id, repaid),
    );
}

pub fn emit_batch_created(env: &Env, funder: &Address, plan_id: u32, count: u32, total: i128) {
    env.events().publish((symbol_short!("batch"), funder.clone()), (plan_id, count, total));
}

/// Emits an event when a period's pool is released and its cursor opened.
pub fn emit_distribution_opened(env: &Env, cursor: &DistributionCursor) {
    env.events().publish(
        (symbol_short!("dist"), symbol_short!("open"), cursor.period_id),
        (cursor.pool, cursor.total_eligible, cursor.share),
    );
}

pub fn emit_position_credited(env: &Env, period_id: u64, contract_id: u64, amount: i128) {
    env.events().publish((symbol_short!("credit"), period_id, contract_id), amount);
}

/// Emits an event when a payout failed and was parked for reconciliation.
pub fn emit_credit_skipped(env: &Env, period_id: u64, contract_id: u64, amount: i128) {
    env.events().publish((symbol_short!("skipped"), period_id, contract_id), amount);
}

pub fn emit_skipped_credit_settled(env: &Env, period_id: u64, contract_id: u64, amount: i128) {
    env.events().publish((symbol_short!("settled"), period_id, contract_id), amount);
}

/// Emits an event when a cursor is retired.
pub fn emit_distribution_completed(env: &Env, cursor: &DistributionCursor, carried_over: i128) {
    env.events().publish(
        (symbol_short!("dist"), symbol_short!("close"), cursor.period_id),
        (cursor.credited_count, cursor.pool, carried_over),
    );
}
