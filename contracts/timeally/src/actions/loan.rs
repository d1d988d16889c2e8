use crate::admin::{current_period, read_config};
use crate::error::TimeAllyError;
use crate::event::{emit_loan_repaid, emit_loan_taken};
use crate::plan::read_plan;
use crate::position::{
    read_owned_position, read_position, write_position, Loan, LoanRecord, PositionStatus,
};
use crate::token_interaction::{debit_with_allowance, pay_out};
use soroban_sdk::{log, Address, Env};

const BASIS_POINTS: i128 = 10_000;

/// Flat, non-compounding repayment: `borrowed + borrowed * rate_bp / 10_000`,
/// truncated toward zero.
///
/// The borrowed amount is split around the denominator so the product never
/// exceeds the final result by more than the denominator.
pub fn repayment_amount(borrowed: i128, rate_bp: u32) -> Result<i128, TimeAllyError> {
    if borrowed < 0 {
        return Err(TimeAllyError::InvalidAmount);
    }
    let rate = rate_bp as i128;

    let whole = (borrowed / BASIS_POINTS)
        .checked_mul(rate)
        .ok_or(TimeAllyError::ArithmeticOverflow)?;
    let fraction = (borrowed % BASIS_POINTS) * rate / BASIS_POINTS;

    whole
        .checked_add(fraction)
        .and_then(|interest| borrowed.checked_add(interest))
        .ok_or(TimeAllyError::ArithmeticOverflow)
}

pub fn take_loan(
    env: Env,
    contract_id: u64,
    caller: Address,
    amount: i128,
) -> Result<(), TimeAllyError> {
    caller.require_auth();

    let mut position = read_owned_position(&env, contract_id, &caller)?;
    if position.status != PositionStatus::Active {
        return Err(TimeAllyError::InvalidState);
    }
    if amount <= 0 {
        return Err(TimeAllyError::InvalidAmount);
    }
    if amount > position.principal {
        return Err(TimeAllyError::ExceedsPrincipal);
    }

    let plan = read_plan(&env, position.plan_id)?;
    let config = read_config(&env)?;
    let taken_at = env.ledger().timestamp();

    pay_out(&env, &config.stake_token, &position.owner, amount)?;

    position.loan = Loan::Outstanding(LoanRecord {
        principal_borrowed: amount,
        interest_rate_bp: plan.loan_interest_rate_bp,
        taken_at_period: current_period(&env)?,
        taken_at,
        due_at: taken_at.saturating_add(plan.loan_period),
    });
    position.status = PositionStatus::LoanOutstanding;
    write_position(&env, &position);

    emit_loan_taken(&env, &caller, contract_id, amount);
    Ok(())
}

pub fn read_loan(env: &Env, contract_id: u64) -> Result<LoanRecord, TimeAllyError> {
    let position = read_position(env, contract_id)?;
    match (position.status, position.loan) {
        (PositionStatus::LoanOutstanding, Loan::Outstanding(loan)) => Ok(loan),
        _ => Err(TimeAllyError::InvalidState),
    }
}

pub fn loan_repayment_amount(env: &Env, contract_id: u64) -> Result<i128, TimeAllyError> {
    let loan = read_loan(env, contract_id)?;
    repayment_amount(loan.principal_borrowed, loan.interest_rate_bp)
}

/// Settles the outstanding loan. A settled position can never borrow again.
pub fn re_pay_loan(env: Env, contract_id: u64, caller: Address) -> Result<i128, TimeAllyError> {
    caller.require_auth();

    let mut position = read_owned_position(&env, contract_id, &caller)?;
    if position.status != PositionStatus::LoanOutstanding {
        return Err(TimeAllyError::InvalidState);
    }

    let repayment = loan_repayment_amount(&env, contract_id)?;
    let config = read_config(&env)?;

    debit_with_allowance(&env, &config.stake_token, &caller, repayment)?;

    if let Loan::Outstanding(loan) = &position.loan {
        if env.ledger().timestamp() > loan.due_at {
            log!(&env, "loan on position {} repaid after due date", contract_id);
        }
    }

    position.loan = Loan::None;
    position.status = PositionStatus::LoanSettled;
    write_position(&env, &position);

    emit_loan_repaid(&env, &caller, contract_id, repayment);
    Ok(repayment)
}
