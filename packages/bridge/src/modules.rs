//! The narrow views of the host modules that the dispatcher and the query
//! resolver depend on. Each module stays the authority on its own checks.

use cosmwasm_std::{Addr, Coin, Storage, Uint128};

use osmo_bindings::{JoinPoolResponse, OsmosisError, Swap, SwapAmount, SwapResponse};

use crate::pool::Pool;

/// Denom issuance, keyed by the `factory/{creator}/{subdenom}` namespace
pub trait TokenFactory {
    /// Registers `factory/{creator}/{subdenom}` with `creator` as admin and returns it
    fn create_denom(&mut self, creator: &Addr, subdenom: &str) -> Result<String, OsmosisError>;

    /// Only the current admin may do this. An empty `new_admin` removes the admin for good.
    fn change_admin(
        &mut self,
        sender: &Addr,
        denom: &str,
        new_admin: &str,
    ) -> Result<(), OsmosisError>;

    fn mint(
        &mut self,
        sender: &Addr,
        denom: &str,
        amount: Uint128,
        recipient: &str,
    ) -> Result<(), OsmosisError>;

    /// Burns from the sender's own balance
    fn burn(&mut self, sender: &Addr, denom: &str, amount: Uint128) -> Result<(), OsmosisError>;
}

/// Read access to pool state
pub trait PoolSource {
    fn pool(&self, pool_id: u64) -> Result<Pool, OsmosisError>;
}

/// The AMM. Every operation is all or nothing.
pub trait Gamm: PoolSource {
    /// Swaps along `hops` in order. `limit` is the minimum output for `SwapAmount::In`
    /// and the maximum input for `SwapAmount::Out`.
    fn swap(
        &mut self,
        sender: &Addr,
        hops: &[Swap],
        amount: SwapAmount,
        limit: Uint128,
    ) -> Result<SwapResponse, OsmosisError>;

    fn join_pool(
        &mut self,
        sender: &Addr,
        pool_id: u64,
        share_out_amount: Uint128,
        token_in_maxs: &[Coin],
    ) -> Result<JoinPoolResponse, OsmosisError>;

    fn join_swap_exact_amount_in(
        &mut self,
        sender: &Addr,
        pool_id: u64,
        token_in: &Coin,
        share_out_min: Uint128,
    ) -> Result<JoinPoolResponse, OsmosisError>;
}

/// Balance ledger underneath both modules. It shares the module's storage, so
/// the storage is handed in on every call.
pub trait Bank {
    fn balance(
        &self,
        storage: &dyn Storage,
        address: &str,
        denom: &str,
    ) -> Result<Uint128, OsmosisError>;

    fn mint(&self, storage: &mut dyn Storage, recipient: &str, coin: Coin)
        -> Result<(), OsmosisError>;

    fn burn(&self, storage: &mut dyn Storage, owner: &Addr, coin: Coin)
        -> Result<(), OsmosisError>;
}
