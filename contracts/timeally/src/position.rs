use crate::error::TimeAllyError;
use crate::storage_types::{
    write_persistent, DataKey, LEDGER_BUMP_AMOUNT, LEDGER_LIFETIME_THRESHOLD,
};
use soroban_sdk::{contracttype, Address, Env, Vec};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    Active = 0,
    LoanOutstanding = 1,
    LoanSettled = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRecord {
    pub principal_borrowed: i128,
    pub interest_rate_bp: u32,
    pub taken_at_period: u64,
    pub taken_at: u64,
    pub due_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Loan {
    None,
    Outstanding(LoanRecord),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakePosition {
    pub contract_id: u64,
    pub plan_id: u32,
    pub owner: Address,
    pub principal: i128,
    pub status: PositionStatus,
    pub created_at_period: u64,
    pub created_at: u64,
    pub accrued_reward_slots: Vec<i128>,
    pub filled_slots: u32,
    pub last_credited_period: Option<u64>,
    pub loan: Loan,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionView {
    pub status: PositionStatus,
    pub plan_id: u32,
    pub principal: i128,
    pub owner: Address,
}

impl StakePosition {
    pub fn view(&self) -> PositionView {
        PositionView {
            status: self.status,
            plan_id: self.plan_id,
            principal: self.principal,
            owner: self.owner.clone(),
        }
    }

    pub fn has_open_slot(&self) -> bool {
        self.filled_slots < self.accrued_reward_slots.len()
    }

    /// A position takes part in `period_id` when it was opened before the
    /// period boundary, still has an empty slot and was not yet credited.
    pub fn is_eligible_for(&self, period_id: u64) -> bool {
        self.created_at_period < period_id
            && self.has_open_slot()
            && self.last_credited_period != Some(period_id)
    }
}

pub fn position_count(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::PositionCount)
        .unwrap_or(0u64)
}

pub fn get_and_increase_contract_id(e: &Env) -> u64 {
    let prev = position_count(e);
    e.storage()
        .instance()
        .set(&DataKey::PositionCount, &(prev + 1));
    prev
}

pub fn write_position(e: &Env, position: &StakePosition) {
    write_persistent(e, &DataKey::Position(position.contract_id), position);
}

pub fn read_position(e: &Env, contract_id: u64) -> Result<StakePosition, TimeAllyError> {
    let key = DataKey::Position(contract_id);
    let position = e
        .storage()
        .persistent()
        .get::<DataKey, StakePosition>(&key)
        .ok_or(TimeAllyError::UnknownPosition)?;
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_LIFETIME_THRESHOLD, LEDGER_BUMP_AMOUNT);
    Ok(position)
}

/// Loads a position and checks that `caller` currently owns it.
pub fn read_owned_position(
    e: &Env,
    contract_id: u64,
    caller: &Address,
) -> Result<StakePosition, TimeAllyError> {
    let position = read_position(e, contract_id)?;
    if position.owner != *caller {
        return Err(TimeAllyError::NotOwner);
    }
    Ok(position)
}

pub fn owner_position_count(e: &Env, owner: &Address) -> u32 {
    e.storage()
        .persistent()
        .get(&DataKey::OwnerPositionCount(owner.clone()))
        .unwrap_or(0)
}

/// Contract ids owned by `owner`, read from slots `start..start + limit`.
pub fn read_owner_positions(e: &Env, owner: &Address, start: u32, limit: u32) -> Vec<u64> {
    let end = start
        .saturating_add(limit)
        .min(owner_position_count(e, owner));

    let mut ids = Vec::new(e);
    for slot in start..end {
        let key = DataKey::OwnerPosition(owner.clone(), slot);
        if let Some(contract_id) = e.storage().persistent().get::<DataKey, u64>(&key) {
            ids.push_back(contract_id);
        }
    }
    ids
}

pub fn add_position_to_owner(e: &Env, owner: &Address, contract_id: u64) {
    let slot = owner_position_count(e, owner);
    write_persistent(e, &DataKey::OwnerPosition(owner.clone(), slot), &contract_id);
    write_persistent(e, &DataKey::OwnerSlot(contract_id), &slot);
    write_persistent(e, &DataKey::OwnerPositionCount(owner.clone()), &(slot + 1));
}

/// Swap-remove: the owner's last entry moves into the freed slot.
pub fn remove_position_from_owner(e: &Env, owner: &Address, contract_id: u64) {
    let count = owner_position_count(e, owner);
    let slot = match e
        .storage()
        .persistent()
        .get::<DataKey, u32>(&DataKey::OwnerSlot(contract_id))
    {
        Some(slot) if slot < count => slot,
        _ => return,
    };

    let last = count - 1;
    if slot != last {
        let last_key = DataKey::OwnerPosition(owner.clone(), last);
        if let Some(moved) = e.storage().persistent().get::<DataKey, u64>(&last_key) {
            write_persistent(e, &DataKey::OwnerPosition(owner.clone(), slot), &moved);
            write_persistent(e, &DataKey::OwnerSlot(moved), &slot);
        }
    }

    e.storage()
        .persistent()
        .remove(&DataKey::OwnerPosition(owner.clone(), last));
    e.storage().persistent().remove(&DataKey::OwnerSlot(contract_id));
    write_persistent(e, &DataKey::OwnerPositionCount(owner.clone()), &last);
}
