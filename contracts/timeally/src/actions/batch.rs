use crate::actions::stake::open_position;
use crate::admin::{current_period, read_config};
use crate::error::TimeAllyError;
use crate::event::emit_batch_created;
use crate::plan::read_plan;
use crate::token_interaction::debit_with_allowance;
use soroban_sdk::{log, Address, Env, Vec};

/// Opens one position per `(owner, amount)` pair, funded by `funder`.
///
/// Every check runs before the first write and the funder is debited once for
/// the whole batch, so a rejected batch leaves no positions behind. Cost grows
/// with the batch length; callers split very large batches across several
/// invocations to stay under the per-transaction resource limits.
pub fn create_positions_batch(
    env: Env,
    funder: Address,
    plan_id: u32,
    owners: Vec<Address>,
    amounts: Vec<i128>,
    expected_total: i128,
) -> Result<Vec<u64>, TimeAllyError> {
    funder.require_auth();

    if owners.is_empty() || owners.len() != amounts.len() {
        return Err(TimeAllyError::LengthMismatch);
    }

    let mut total: i128 = 0;
    for amount in amounts.iter() {
        if amount <= 0 {
            return Err(TimeAllyError::InvalidAmount);
        }
        total = total
            .checked_add(amount)
            .ok_or(TimeAllyError::ArithmeticOverflow)?;
    }
    if total != expected_total {
        return Err(TimeAllyError::TotalMismatch);
    }

    let plan = read_plan(&env, plan_id)?;
    let config = read_config(&env)?;
    let period = current_period(&env)?;

    debit_with_allowance(&env, &config.stake_token, &funder, total)?;

    let mut contract_ids = Vec::new(&env);
    for (owner, amount) in owners.iter().zip(amounts.iter()) {
        contract_ids.push_back(open_position(&env, &plan, owner, amount, period));
    }

    log!(&env, "batch of {} positions funded with {}", contract_ids.len(), total);
    emit_batch_created(&env, &funder, plan_id, contract_ids.len(), total);
    Ok(contract_ids)
}
