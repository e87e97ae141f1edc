use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{from_slice, Coin, CustomQuery, Decimal};

use crate::error::OsmosisError;
use crate::types::{Step, Swap, SwapAmount};

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum OsmosisQuery {
    /// Given a subdenom created by the contract via `OsmosisMsg::CreateDenom`,
    /// returns the full denom as used by `BankMsg::Send`.
    /// This is computed, the denom does not need to exist.
    FullDenom { contract: String, subdenom: String },
    /// For a given pool ID, list all tokens traded on it with current liquidity (spot).
    /// As well as the total number of LP shares and their denom
    PoolState { id: u64 },
    /// Return current spot price swapping In for Out on given pool ID.
    /// Warning: this can easily be manipulated via sandwich attacks, do not use as price oracle.
    SpotPrice { swap: Swap, with_swap_fee: bool },
    /// Simulates a swap over one or more pools without executing it.
    /// You can call `EstimateSwap { first, route: vec![], amount }` to simulate a single pool.
    /// Returns EstimatePriceResponse
    EstimateSwap {
        first: Swap,
        route: Vec<Step>,
        amount: SwapAmount,
    },
}

impl CustomQuery for OsmosisQuery {}

impl OsmosisQuery {
    /// Decodes a query handed over by a contract, any decoding problem is a `MalformedMessage`
    pub fn parse(data: &[u8]) -> Result<Self, OsmosisError> {
        from_slice(data).map_err(|err| OsmosisError::MalformedMessage {
            msg: err.to_string(),
        })
    }

    pub fn full_denom(contract: impl Into<String>, subdenom: impl Into<String>) -> Self {
        OsmosisQuery::FullDenom {
            contract: contract.into(),
            subdenom: subdenom.into(),
        }
    }

    /// Calculate spot price without swap fee
    pub fn spot_price(pool_id: u64, denom_in: &str, denom_out: &str) -> Self {
        OsmosisQuery::SpotPrice {
            swap: Swap::new(pool_id, denom_in, denom_out),
            with_swap_fee: false,
        }
    }

    /// Basic helper to estimate price of a swap on one pool
    pub fn estimate_swap(
        pool_id: u64,
        denom_in: impl Into<String>,
        denom_out: impl Into<String>,
        amount: SwapAmount,
    ) -> Self {
        OsmosisQuery::EstimateSwap {
            first: Swap::new(pool_id, denom_in, denom_out),
            amount,
            route: vec![],
        }
    }
}

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, JsonSchema, Debug)]
pub struct FullDenomResponse {
    pub denom: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct PoolStateResponse {
    /// The various assets that be swapped. Including current liquidity.
    pub assets: Vec<Coin>,
    /// The number of lp shares and their amount
    pub shares: Coin,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct SpotPriceResponse {
    /// How many output we would get for 1 input
    pub price: Decimal,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct EstimatePriceResponse {
    /// If you query with SwapAmount::Input, this is SwapAmount::Output
    /// If you query with SwapAmount::Output, this is SwapAmount::Input
    pub amount: SwapAmount,
}
