mod dispatch;
mod keeper;
mod modules;
mod multitest;
mod pool;
mod resolve;

pub use dispatch::{dispatch, DispatchResponse};
pub use keeper::{OsmosisKeeper, StorageBank, StoragePools, BALANCES, DENOM_ADMINS, POOLS};
pub use modules::{Bank, Gamm, PoolSource, TokenFactory};
pub use multitest::{OsmosisApp, OsmosisAppWrapped, OsmosisModule};
pub use pool::{simulate_route, Pool, RouteOutcome, DEFAULT_SWAP_FEE_PERMILLE, GAMM_PREFIX};
pub use resolve::resolve;
