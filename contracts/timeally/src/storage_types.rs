use soroban_sdk::{contracttype, Address, Env, IntoVal, Val};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const LEDGER_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const LEDGER_LIFETIME_THRESHOLD: u32 = LEDGER_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Config,
    LaunchTimestamp,
    PlanCount,
    Plan(u32),
    PositionCount,
    Position(u64),
    // per-owner index: count, entry at a slot, slot of a position
    OwnerPositionCount(Address),
    OwnerPosition(Address, u32),
    OwnerSlot(u64),
    // distribution bookkeeping, keyed by period
    CreatedInPeriod(u64),
    LastEligiblePeriod(u64),
    EligibleRunning,
    CarryOver,
    NextDistributionPeriod,
    ActiveDistribution,
    DistributionRecord(u64),
    SkippedCredit(u64, u64),
    SkippedCreditCount(u64),
    SkippedCreditAt(u64, u32),
}

/// Sets a persistent entry and extends its TTL.
pub(crate) fn write_persistent<V: IntoVal<Env, Val>>(e: &Env, key: &DataKey, value: &V) {
    e.storage().persistent().set(key, value);
    e.storage()
        .persistent()
        .extend_ttl(key, LEDGER_LIFETIME_THRESHOLD, LEDGER_BUMP_AMOUNT);
}
