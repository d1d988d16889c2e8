use crate::admin::{current_period, read_config, Config};
use crate::error::TimeAllyError;
use crate::event::{
    emit_credit_skipped, emit_distribution_completed, emit_distribution_opened,
    emit_position_credited, emit_skipped_credit_settled,
};
use crate::position::{position_count, read_position, write_position};
use crate::release_pool::ReleasePoolClient;
use crate::storage_types::{write_persistent, DataKey};
use crate::token_interaction::pay_out;
use soroban_sdk::{contracttype, log, Env, Vec};

/// The first period that can be distributed. Nothing is created before
/// period 0, so period 0 never has eligible positions.
pub(crate) const FIRST_DISTRIBUTION_PERIOD: u64 = 1;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DistributionPhase {
    Crediting = 0,
    Finalized = 1,
}

/// Progress of one period's distribution.
///
/// While crediting it lives under `ActiveDistribution`; once finalized it is
/// moved to `DistributionRecord(period_id)` and never reopened.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionCursor {
    pub period_id: u64,
    pub next_contract_id: u64,
    /// Number of positions that existed when the period was opened.
    pub end_contract_id: u64,
    pub pool: i128,
    pub share: i128,
    pub pool_remaining: i128,
    pub total_eligible: u64,
    pub credited_count: u64,
    pub last_credited: Option<u64>,
    pub phase: DistributionPhase,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreditKind {
    /// Fills the position's next empty slot.
    Share = 0,
    /// Tops up the slot already filled for this period.
    Remainder = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credit {
    pub contract_id: u64,
    pub amount: i128,
    pub kind: CreditKind,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkippedCredit {
    pub contract_id: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionProgress {
    pub processed: u32,
    pub remaining: u64,
    pub complete: bool,
}

impl DistributionCursor {
    pub fn open(period_id: u64, end_contract_id: u64, pool: i128, total_eligible: u64) -> Self {
        let share = if total_eligible == 0 {
            0
        } else {
            pool / total_eligible as i128
        };

        DistributionCursor {
            period_id,
            next_contract_id: 0,
            end_contract_id,
            pool,
            share,
            pool_remaining: pool,
            total_eligible,
            credited_count: 0,
            last_credited: None,
            phase: DistributionPhase::Crediting,
        }
    }

    /// Exclusive upper bound of the ids examined by the next step.
    pub fn window_end(&self, batch_size: u32) -> u64 {
        self.next_contract_id
            .saturating_add(batch_size as u64)
            .min(self.end_contract_id)
    }

    pub fn remaining(&self) -> u64 {
        self.end_contract_id.saturating_sub(self.next_contract_id)
    }

    /// Advances the cursor to `window_end`, crediting `eligible` ids.
    ///
    /// Pure: the caller decides eligibility and applies the returned credits.
    /// Ids outside `[next_contract_id, window_end)` are ignored, and at most
    /// `total_eligible` shares are handed out so the pool can never be
    /// overdrawn. Reaching the end assigns the division remainder to the last
    /// credited position and finalizes the cursor.
    pub fn step(&self, env: &Env, window_end: u64, eligible: &Vec<u64>) -> (Self, Vec<Credit>) {
        let mut next = self.clone();
        let mut credits = Vec::new(env);

        if self.phase == DistributionPhase::Finalized {
            return (next, credits);
        }

        let window_end = window_end.min(self.end_contract_id).max(self.next_contract_id);

        for contract_id in eligible.iter() {
            if contract_id < self.next_contract_id || contract_id >= window_end {
                continue;
            }
            if next.credited_count >= next.total_eligible {
                break;
            }

            credits.push_back(Credit {
                contract_id,
                amount: next.share,
                kind: CreditKind::Share,
            });
            next.pool_remaining -= next.share;
            next.credited_count += 1;
            next.last_credited = Some(contract_id);
        }

        next.next_contract_id = window_end;

        if next.next_contract_id >= next.end_contract_id {
            if let Some(last) = next.last_credited {
                if next.pool_remaining > 0 {
                    credits.push_back(Credit {
                        contract_id: last,
                        amount: next.pool_remaining,
                        kind: CreditKind::Remainder,
                    });
                    next.pool_remaining = 0;
                }
            }
            next.phase = DistributionPhase::Finalized;
        }

        (next, credits)
    }
}

fn read_counter(env: &Env, key: &DataKey) -> u64 {
    env.storage().persistent().get(key).unwrap_or(0u64)
}

fn write_counter(env: &Env, key: &DataKey, value: u64) {
    write_persistent(env, key, &value);
}

/// Records a new position for eligibility counting.
///
/// A position opened in period `c` with `slots` slots is eligible for periods
/// `c + 1 ..= c + slots`, which lets opening a period compute its eligible
/// count without scanning positions.
pub(crate) fn register_accruing_position(env: &Env, created_at_period: u64, slots: u32) {
    let created = DataKey::CreatedInPeriod(created_at_period);
    write_counter(env, &created, read_counter(env, &created) + 1);

    let last = DataKey::LastEligiblePeriod(created_at_period.saturating_add(slots as u64));
    write_counter(env, &last, read_counter(env, &last) + 1);
}

fn roll_eligible_count(env: &Env, period_id: u64) -> u64 {
    let previous = period_id - 1;
    let running = read_counter(env, &DataKey::EligibleRunning)
        + read_counter(env, &DataKey::CreatedInPeriod(previous));
    let running = running.saturating_sub(read_counter(env, &DataKey::LastEligiblePeriod(previous)));

    write_counter(env, &DataKey::EligibleRunning, running);
    running
}

pub fn next_distribution_period(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextDistributionPeriod)
        .unwrap_or(FIRST_DISTRIBUTION_PERIOD)
}

pub fn read_active_distribution(env: &Env) -> Option<DistributionCursor> {
    env.storage().persistent().get(&DataKey::ActiveDistribution)
}

fn write_active_distribution(env: &Env, cursor: &DistributionCursor) {
    write_persistent(env, &DataKey::ActiveDistribution, cursor);
}

pub fn read_distribution_record(env: &Env, period_id: u64) -> Option<DistributionCursor> {
    env.storage()
        .persistent()
        .get(&DataKey::DistributionRecord(period_id))
}

fn read_carry_over(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::CarryOver)
        .unwrap_or(0i128)
}

/// Unpaid amount parked for `contract_id` in `period_id`, if any.
pub fn read_skipped_credit(env: &Env, period_id: u64, contract_id: u64) -> Option<i128> {
    env.storage()
        .persistent()
        .get(&DataKey::SkippedCredit(period_id, contract_id))
}

/// Number of positions ever parked for `period_id`, settled ones included.
pub fn skipped_credit_count(env: &Env, period_id: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::SkippedCreditCount(period_id))
        .unwrap_or(0)
}

/// Outstanding skipped credits recorded at index `start..start + limit`.
pub fn read_skipped_credits(
    env: &Env,
    period_id: u64,
    start: u32,
    limit: u32,
) -> Vec<SkippedCredit> {
    let end = start
        .saturating_add(limit)
        .min(skipped_credit_count(env, period_id));

    let mut skipped = Vec::new(env);
    for index in start..end {
        let key = DataKey::SkippedCreditAt(period_id, index);
        if let Some(contract_id) = env.storage().persistent().get::<DataKey, u64>(&key) {
            if let Some(amount) = read_skipped_credit(env, period_id, contract_id) {
                skipped.push_back(SkippedCredit {
                    contract_id,
                    amount,
                });
            }
        }
    }
    skipped
}

fn record_skipped_credit(env: &Env, period_id: u64, contract_id: u64, amount: i128) {
    let key = DataKey::SkippedCredit(period_id, contract_id);
    match read_skipped_credit(env, period_id, contract_id) {
        Some(parked) => write_persistent(env, &key, &(parked + amount)),
        None => {
            let index = skipped_credit_count(env, period_id);
            write_persistent(env, &DataKey::SkippedCreditAt(period_id, index), &contract_id);
            write_persistent(env, &DataKey::SkippedCreditCount(period_id), &(index + 1));
            write_persistent(env, &key, &amount);
        }
    }
}

fn open_distribution(
    env: &Env,
    config: &Config,
    period_id: u64,
) -> Result<DistributionCursor, TimeAllyError> {
    let expected = next_distribution_period(env);
    if period_id < expected || period_id > current_period(env)? {
        return Err(TimeAllyError::NoActiveDistribution);
    }
    if period_id > expected {
        return Err(TimeAllyError::InvalidState);
    }

    let released = ReleasePoolClient::new(env, &config.release_pool)
        .released_pool_for_period(&period_id);
    if released < 0 {
        return Err(TimeAllyError::InvalidAmount);
    }
    let pool = released
        .checked_add(read_carry_over(env))
        .ok_or(TimeAllyError::ArithmeticOverflow)?;
    env.storage().instance().remove(&DataKey::CarryOver);

    let total_eligible = roll_eligible_count(env, period_id);
    let cursor = DistributionCursor::open(period_id, position_count(env), pool, total_eligible);

    env.storage()
        .instance()
        .set(&DataKey::NextDistributionPeriod, &(period_id + 1));

    log!(
        env,
        "period {} opened: pool {} over {} positions",
        period_id,
        pool,
        total_eligible
    );
    emit_distribution_opened(env, &cursor);
    Ok(cursor)
}

/// Writes each credit into its slot and pays it out. Payout failures are
/// parked as skipped credits; they never abort the step.
pub(crate) fn apply_credits(env: &Env, config: &Config, period_id: u64, credits: &Vec<Credit>) {
    for credit in credits.iter() {
        let mut position = match read_position(env, credit.contract_id) {
            Ok(position) => position,
            Err(_) => continue,
        };

        match credit.kind {
            CreditKind::Share => {
                if !position.is_eligible_for(period_id) {
                    continue;
                }
                let slot = position.filled_slots;
                position.accrued_reward_slots.set(slot, credit.amount);
                position.filled_slots += 1;
                position.last_credited_period = Some(period_id);
            }
            CreditKind::Remainder => {
                if position.last_credited_period != Some(period_id) || position.filled_slots == 0 {
                    continue;
                }
                let slot = position.filled_slots - 1;
                let current = position.accrued_reward_slots.get(slot).unwrap_or(0);
                position
                    .accrued_reward_slots
                    .set(slot, current + credit.amount);
            }
        }
        write_position(env, &position);

        match pay_out(env, &config.reward_token, &position.owner, credit.amount) {
            Ok(()) => emit_position_credited(env, period_id, credit.contract_id, credit.amount),
            Err(_) => {
                log!(
                    env,
                    "reward payout of {} for position {} failed",
                    credit.amount,
                    credit.contract_id
                );
                record_skipped_credit(env, period_id, credit.contract_id, credit.amount);
                emit_credit_skipped(env, period_id, credit.contract_id, credit.amount);
            }
        }
    }
}

/// Opens the period if needed, then processes one bounded step of it.
pub fn advance_distribution(
    env: Env,
    period_id: u64,
) -> Result<DistributionProgress, TimeAllyError> {
    let config = read_config(&env)?;

    let cursor = match read_active_distribution(&env) {
        Some(cursor) if cursor.period_id == period_id => cursor,
        Some(cursor) if period_id < cursor.period_id => {
            return Err(TimeAllyError::NoActiveDistribution)
        }
        Some(_) => return Err(TimeAllyError::InvalidState),
        None => open_distribution(&env, &config, period_id)?,
    };

    let window_end = cursor.window_end(config.distribution_batch_size);
    let mut eligible = Vec::new(&env);
    for contract_id in cursor.next_contract_id..window_end {
        if let Ok(position) = read_position(&env, contract_id) {
            if position.is_eligible_for(period_id) {
                eligible.push_back(contract_id);
            }
        }
    }

    let (advanced, credits) = cursor.step(&env, window_end, &eligible);
    apply_credits(&env, &config, period_id, &credits);

    let processed = (advanced.next_contract_id - cursor.next_contract_id) as u32;
    let complete = advanced.phase == DistributionPhase::Finalized;

    if complete {
        retire_distribution(&env, &advanced);
    } else {
        write_active_distribution(&env, &advanced);
    }

    Ok(DistributionProgress {
        processed,
        remaining: advanced.remaining(),
        complete,
    })
}

fn retire_distribution(env: &Env, cursor: &DistributionCursor) {
    if cursor.credited_count != cursor.total_eligible {
        log!(
            env,
            "period {} credited {} of {} eligible positions",
            cursor.period_id,
            cursor.credited_count,
            cursor.total_eligible
        );
    }

    write_persistent(env, &DataKey::DistributionRecord(cursor.period_id), cursor);
    env.storage().persistent().remove(&DataKey::ActiveDistribution);

    // Only a period with nobody to credit leaves anything behind.
    let carried_over = cursor.pool_remaining;
    if carried_over > 0 {
        env.storage()
            .instance()
            .set(&DataKey::CarryOver, &carried_over);
    }

    emit_distribution_completed(env, cursor, carried_over);
}

/// Pays a parked credit to the position's current owner and clears it.
///
/// Only retired periods can be settled; while a period is still crediting its
/// remainder may land on an already parked credit.
pub fn retry_skipped_credit(
    env: Env,
    period_id: u64,
    contract_id: u64,
) -> Result<i128, TimeAllyError> {
    if let Some(cursor) = read_active_distribution(&env) {
        if cursor.period_id == period_id {
            return Err(TimeAllyError::InvalidState);
        }
    }

    let config = read_config(&env)?;
    let amount = read_skipped_credit(&env, period_id, contract_id)
        .ok_or(TimeAllyError::UnknownPosition)?;
    let position = read_position(&env, contract_id)?;
    pay_out(&env, &config.reward_token, &position.owner, amount)?;

    env.storage()
        .persistent()
        .remove(&DataKey::SkippedCredit(period_id, contract_id));

    emit_skipped_credit_settled(&env, period_id, contract_id, amount);
    Ok(amount)
}
