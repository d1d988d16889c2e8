use soroban_sdk::{contractclient, Env};

/// Monthly token-release service funding the reward distribution.
///
/// The release contract transfers the pool to the ledger and reports its size;
/// the ledger only reads the figure once, when it opens the period.
#[allow(dead_code)]
#[contractclient(name = "ReleasePoolClient")]
pub trait ReleasePoolInterface {
    fn released_pool_for_period(env: Env, period_id: u64) -> i128;
}
