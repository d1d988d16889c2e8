use crate::actions::distribution::register_accruing_position;
use crate::admin::{current_period, read_config};
use crate::error::TimeAllyError;
use crate::event::{emit_ownership_transferred, emit_position_opened};
use crate::plan::{read_plan, Plan};
use crate::position::{
    add_position_to_owner, get_and_increase_contract_id, read_owned_position,
    remove_position_from_owner, write_position, Loan, PositionStatus, StakePosition,
};
use crate::token_interaction::debit_with_allowance;
use soroban_sdk::{log, Address, Env, Vec};

/// Writes a fresh position for funds already taken into custody.
pub(crate) fn open_position(
    env: &Env,
    plan: &Plan,
    owner: Address,
    principal: i128,
    period: u64,
) -> u64 {
    let contract_id = get_and_increase_contract_id(env);

    let mut slots = Vec::new(env);
    for _ in 0..plan.refund_installment_count {
        slots.push_back(0i128);
    }

    let position = StakePosition {
        contract_id,
        plan_id: plan.plan_id,
        owner: owner.clone(),
        principal,
        status: PositionStatus::Active,
        created_at_period: period,
        created_at: env.ledger().timestamp(),
        accrued_reward_slots: slots,
        filled_slots: 0,
        last_credited_period: None,
        loan: Loan::None,
    };

    write_position(env, &position);
    add_position_to_owner(env, &owner, contract_id);
    register_accruing_position(env, period, plan.refund_installment_count);

    emit_position_opened(env, &owner, contract_id, plan.plan_id, principal);
    contract_id
}

pub fn create_position(
    env: Env,
    owner: Address,
    plan_id: u32,
    principal: i128,
) -> Result<u64, TimeAllyError> {
    owner.require_auth();

    let plan = read_plan(&env, plan_id)?;
    if principal <= 0 {
        return Err(TimeAllyError::InvalidAmount);
    }

    let config = read_config(&env)?;
    let period = current_period(&env)?;

    debit_with_allowance(&env, &config.stake_token, &owner, principal)?;

    let contract_id = open_position(&env, &plan, owner, principal, period);
    log!(&env, "position {} opened in period {}", contract_id, period);
    Ok(contract_id)
}

pub fn transfer_ownership(
    env: Env,
    contract_id: u64,
    caller: Address,
    new_owner: Address,
) -> Result<(), TimeAllyError> {
    caller.require_auth();

    let mut position = read_owned_position(&env, contract_id, &caller)?;
    position.owner = new_owner.clone();
    write_position(&env, &position);

    remove_position_from_owner(&env, &caller, contract_id);
    add_position_to_owner(&env, &new_owner, contract_id);

    emit_ownership_transferred(&env, contract_id, &caller, &new_owner);
    Ok(())
}
