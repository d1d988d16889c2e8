//! Time-locked staking ledger: plans, stake positions, one-shot loans and the
//! resumable monthly reward distribution.

use crate::actions::{batch, distribution, loan, stake};
use crate::actions::{DistributionCursor, DistributionProgress, SkippedCredit};
use crate::admin::{
    bump_instance, current_period, has_administrator, read_administrator, read_config,
    require_admin, validate_config, write_administrator, write_config, write_launch_timestamp,
    Config,
};
use crate::error::TimeAllyError;
use crate::event::emit_plan_created;
use crate::plan::{add_plan, plan_count, read_plan, Plan};
use crate::position::{
    owner_position_count, position_count, read_owner_positions, read_position, LoanRecord,
    PositionView, StakePosition,
};
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec};
use soroban_token_sdk::TokenUtils;

#[contract]
pub struct TimeAlly;

// Setup & administration
#[contractimpl]
impl TimeAlly {
    pub fn initialize(e: Env, admin: Address, config: Config) -> Result<(), TimeAllyError> {
        if has_administrator(&e) {
            return Err(TimeAllyError::AlreadyInitialized);
        }
        validate_config(&config)?;

        write_administrator(&e, &admin);
        write_config(&e, &config);
        write_launch_timestamp(&e, e.ledger().timestamp());
        bump_instance(&e);
        Ok(())
    }

    pub fn set_release_pool(e: Env, release_pool: Address) -> Result<(), TimeAllyError> {
        require_admin(&e)?;

        let mut config = read_config(&e)?;
        if config.release_pool != release_pool {
            config.release_pool = release_pool;
            write_config(&e, &config);
        }
        Ok(())
    }

    pub fn set_batch_size(e: Env, batch_size: u32) -> Result<(), TimeAllyError> {
        require_admin(&e)?;
        if batch_size == 0 {
            return Err(TimeAllyError::InvalidAmount);
        }

        let mut config = read_config(&e)?;
        config.distribution_batch_size = batch_size;
        write_config(&e, &config);
        Ok(())
    }

    pub fn set_admin(e: Env, new_admin: Address) -> Result<(), TimeAllyError> {
        let admin = require_admin(&e)?;

        write_administrator(&e, &new_admin);
        TokenUtils::new(&e).events().set_admin(admin, new_admin);
        Ok(())
    }

    pub fn upgrade(e: Env, new_wasm_hash: BytesN<32>) -> Result<(), TimeAllyError> {
        require_admin(&e)?;

        e.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }

    pub fn admin(e: Env) -> Result<Address, TimeAllyError> {
        read_administrator(&e)
    }

    pub fn config(e: Env) -> Result<Config, TimeAllyError> {
        read_config(&e)
    }

    pub fn current_period(e: Env) -> Result<u64, TimeAllyError> {
        current_period(&e)
    }
}

// Plans
#[contractimpl]
impl TimeAlly {
    pub fn create_plan(
        e: Env,
        lock_period: u64,
        loan_interest_rate_bp: u32,
        loan_period: u64,
        refund_installment_count: u32,
    ) -> Result<u32, TimeAllyError> {
        require_admin(&e)?;

        let plan = add_plan(
            &e,
            lock_period,
            loan_interest_rate_bp,
            loan_period,
            refund_installment_count,
        )?;
        emit_plan_created(&e, &plan);
        Ok(plan.plan_id)
    }

    pub fn plan(e: Env, plan_id: u32) -> Result<Plan, TimeAllyError> {
        read_plan(&e, plan_id)
    }

    pub fn plan_count(e: Env) -> u32 {
        plan_count(&e)
    }
}

// Stake positions
#[contractimpl]
impl TimeAlly {
    pub fn create_position(
        e: Env,
        owner: Address,
        plan_id: u32,
        principal: i128,
    ) -> Result<u64, TimeAllyError> {
        bump_instance(&e);
        stake::create_position(e, owner, plan_id, principal)
    }

    pub fn create_positions_batch(
        e: Env,
        funder: Address,
        plan_id: u32,
        owners: Vec<Address>,
        amounts: Vec<i128>,
        expected_total: i128,
    ) -> Result<Vec<u64>, TimeAllyError> {
        bump_instance(&e);
        batch::create_positions_batch(e, funder, plan_id, owners, amounts, expected_total)
    }

    pub fn transfer_ownership(
        e: Env,
        contract_id: u64,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), TimeAllyError> {
        bump_instance(&e);
        stake::transfer_ownership(e, contract_id, caller, new_owner)
    }

    pub fn view_position(e: Env, contract_id: u64) -> Result<PositionView, TimeAllyError> {
        Ok(read_position(&e, contract_id)?.view())
    }

    pub fn view_accruals(e: Env, contract_id: u64) -> Result<Vec<i128>, TimeAllyError> {
        Ok(read_position(&e, contract_id)?.accrued_reward_slots)
    }

    pub fn position(e: Env, contract_id: u64) -> Result<StakePosition, TimeAllyError> {
        read_position(&e, contract_id)
    }

    pub fn positions_of(e: Env, owner: Address, start: u32, limit: u32) -> Vec<u64> {
        read_owner_positions(&e, &owner, start, limit)
    }

    pub fn owner_position_count(e: Env, owner: Address) -> u32 {
        owner_position_count(&e, &owner)
    }

    pub fn position_count(e: Env) -> u64 {
        position_count(&e)
    }
}

// Loans
#[contractimpl]
impl TimeAlly {
    pub fn take_loan(
        e: Env,
        contract_id: u64,
        caller: Address,
        amount: i128,
    ) -> Result<(), TimeAllyError> {
        bump_instance(&e);
        loan::take_loan(e, contract_id, caller, amount)
    }

    pub fn loan_repayment_amount(e: Env, contract_id: u64) -> Result<i128, TimeAllyError> {
        loan::loan_repayment_amount(&e, contract_id)
    }

    pub fn re_pay_loan(e: Env, contract_id: u64, caller: Address) -> Result<i128, TimeAllyError> {
        bump_instance(&e);
        loan::re_pay_loan(e, contract_id, caller)
    }

    pub fn loan(e: Env, contract_id: u64) -> Result<LoanRecord, TimeAllyError> {
        loan::read_loan(&e, contract_id)
    }
}

// Monthly distribution
#[contractimpl]
impl TimeAlly {
    pub fn advance_distribution(
        e: Env,
        period_id: u64,
    ) -> Result<DistributionProgress, TimeAllyError> {
        bump_instance(&e);
        distribution::advance_distribution(e, period_id)
    }

    pub fn retry_skipped_credit(
        e: Env,
        period_id: u64,
        contract_id: u64,
    ) -> Result<i128, TimeAllyError> {
        require_admin(&e)?;
        distribution::retry_skipped_credit(e, period_id, contract_id)
    }

    pub fn skipped_credits(e: Env, period_id: u64, start: u32, limit: u32) -> Vec<SkippedCredit> {
        distribution::read_skipped_credits(&e, period_id, start, limit)
    }

    pub fn skipped_credit(e: Env, period_id: u64, contract_id: u64) -> Option<i128> {
        distribution::read_skipped_credit(&e, period_id, contract_id)
    }

    pub fn skipped_credit_count(e: Env, period_id: u64) -> u32 {
        distribution::skipped_credit_count(&e, period_id)
    }

    pub fn active_distribution(e: Env) -> Option<DistributionCursor> {
        distribution::read_active_distribution(&e)
    }

    pub fn distribution_record(e: Env, period_id: u64) -> Option<DistributionCursor> {
        distribution::read_distribution_record(&e, period_id)
    }

    pub fn next_distribution_period(e: Env) -> u64 {
        distribution::next_distribution_period(&e)
    }
}
