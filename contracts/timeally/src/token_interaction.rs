use crate::error::TimeAllyError;
use soroban_sdk::{token, Address, Env};

/// Pulls `amount` of `token_contract` from `owner` into the ledger's custody
/// using the allowance `owner` granted to this contract.
pub fn debit_with_allowance(
    e: &Env,
    token_contract: &Address,
    owner: &Address,
    amount: i128,
) -> Result<(), TimeAllyError> {
    let client = token::Client::new(e, token_contract);
    let custody = e.current_contract_address();

    if client.allowance(owner, &custody) < amount {
        return Err(TimeAllyError::InsufficientAllowance);
    }
    if client.balance(owner) < amount {
        return Err(TimeAllyError::InsufficientFunds);
    }

    client.transfer_from(&custody, owner, &custody, &amount);
    Ok(())
}

/// Sends `amount` of `token_contract` out of custody to `to`.
///
/// A failing transfer is reported as `InsufficientFunds` instead of trapping,
/// so callers can decide whether to abort or record the failure.
pub fn pay_out(
    e: &Env,
    token_contract: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), TimeAllyError> {
    if amount <= 0 {
        return Ok(());
    }

    let client = token::Client::new(e, token_contract);
    match client.try_transfer(&e.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(TimeAllyError::InsufficientFunds),
    }
}
