use cosmwasm_std::{QuerierWrapper, QueryRequest, StdResult};

use crate::query::{
    EstimatePriceResponse, FullDenomResponse, OsmosisQuery, PoolStateResponse, SpotPriceResponse,
};
use crate::types::{Step, Swap, SwapAmount};

/// This is a helper wrapper to easily use our custom queries
pub struct OsmosisQuerier<'a> {
    querier: &'a QuerierWrapper<'a, OsmosisQuery>,
}

impl<'a> OsmosisQuerier<'a> {
    pub fn new(querier: &'a QuerierWrapper<OsmosisQuery>) -> Self {
        OsmosisQuerier { querier }
    }

    pub fn full_denom(
        &self,
        contract: impl Into<String>,
        subdenom: impl Into<String>,
    ) -> StdResult<FullDenomResponse> {
        let request: QueryRequest<OsmosisQuery> =
            OsmosisQuery::full_denom(contract, subdenom).into();
        self.querier.query(&request)
    }

    pub fn pool_state(&self, id: u64) -> StdResult<PoolStateResponse> {
        let request: QueryRequest<OsmosisQuery> = OsmosisQuery::PoolState { id }.into();
        self.querier.query(&request)
    }

    pub fn spot_price(&self, swap: Swap, with_swap_fee: bool) -> StdResult<SpotPriceResponse> {
        let request: QueryRequest<OsmosisQuery> = OsmosisQuery::SpotPrice {
            swap,
            with_swap_fee,
        }
        .into();
        self.querier.query(&request)
    }

    pub fn estimate_swap(
        &self,
        first: Swap,
        route: Vec<Step>,
        amount: SwapAmount,
    ) -> StdResult<EstimatePriceResponse> {
        let request: QueryRequest<OsmosisQuery> = OsmosisQuery::EstimateSwap {
            first,
            route,
            amount,
        }
        .into();
        self.querier.query(&request)
    }
}
