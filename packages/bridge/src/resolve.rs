use cosmwasm_std::{to_binary, Binary};

use osmo_bindings::{
    build_route, full_denom, EstimatePriceResponse, FullDenomResponse, OsmosisError, OsmosisQuery,
    SpotPriceResponse, SwapAmount,
};

use crate::modules::PoolSource;
use crate::pool::simulate_route;

/// Answers one query against the current pool state, without changing it
pub fn resolve<P: PoolSource>(pools: &P, query: OsmosisQuery) -> Result<Binary, OsmosisError> {
    match query {
        OsmosisQuery::FullDenom { contract, subdenom } => {
            let denom = full_denom(&contract, &subdenom)?;
            Ok(to_binary(&FullDenomResponse { denom })?)
        }
        OsmosisQuery::PoolState { id } => {
            let pool = pools.pool(id)?;
            Ok(to_binary(&pool.into_response(id))?)
        }
        OsmosisQuery::SpotPrice {
            swap,
            with_swap_fee,
        } => {
            let pool = pools.pool(swap.pool_id)?;
            let price = pool.spot_price(&swap.denom_in, &swap.denom_out, with_swap_fee)?;
            Ok(to_binary(&SpotPriceResponse { price })?)
        }
        OsmosisQuery::EstimateSwap {
            first,
            route,
            amount,
        } => {
            let hops = build_route(&first, &route)?;
            let outcome = simulate_route(|pool_id| pools.pool(pool_id), &hops, amount.clone())?;
            let amount = match amount {
                SwapAmount::In(_) => SwapAmount::Out(outcome.output),
                SwapAmount::Out(_) => SwapAmount::In(outcome.input),
            };
            Ok(to_binary(&EstimatePriceResponse { amount })?)
        }
    }
}
