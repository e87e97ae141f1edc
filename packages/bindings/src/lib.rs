mod denom;
mod error;
mod msg;
mod querier;
mod query;
mod route;
mod types;

pub use denom::{
    full_denom, parse_factory_denom, validate_subdenom, DENOM_PREFIX, MAX_SUBDENOM_LEN,
};
pub use error::OsmosisError;
pub use msg::{JoinPoolResponse, OsmosisMsg, SwapResponse};
pub use querier::OsmosisQuerier;
pub use query::{
    EstimatePriceResponse, FullDenomResponse, OsmosisQuery, PoolStateResponse, SpotPriceResponse,
};
pub use route::build_route;
pub use types::{ExactIn, ExactOut, Step, Swap, SwapAmount, SwapAmountFields, SwapAmountWithLimit};

// This is a signal, such that any contract that imports these helpers will only run on the
// osmosis blockchain
#[no_mangle]
extern "C" fn requires_osmosis() {}
