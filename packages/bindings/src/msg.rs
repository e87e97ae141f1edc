use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OsmosisError;
use crate::types::SwapAmountWithLimit;
use crate::{Step, Swap};
use cosmwasm_std::{from_slice, Coin, CosmosMsg, CustomMsg, Uint128};

#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
/// A number of Custom messages that can call into the Osmosis bindings
pub enum OsmosisMsg {
    /// Contracts can create denoms, namespaced under the contract's address.
    /// A contract may create any number of independent sub-denoms.
    /// The new denom is `factory/{contract address}/{subdenom}` and the contract is its admin.
    /// Returns FullDenomResponse in the data field of the Response
    CreateDenom {
        /// Up to 44 characters out of `[0-9a-zA-Z./]`. Empty sub-denoms are valid.
        subdenom: String,
    },
    /// Contracts can change the admin of a denom that they are the admin of.
    /// An empty new_admin leaves the denom without admin, nobody can mint or burn it after that.
    ChangeAdmin { denom: String, new_admin: String },
    /// Contracts can mint native tokens for an existing factory denom
    /// that they are the admin of.
    MintTokens {
        denom: String,
        amount: Uint128,
        recipient: String,
    },
    /// Contracts can burn native tokens for an existing factory denom
    /// that they are the admin of.
    /// Currently, burn_from must be empty: tokens are burnt from the contract's own balance.
    BurnTokens {
        denom: String,
        amount: Uint128,
        burn_from: String,
    },
    /// Swap over one or more pools
    /// Returns SwapResponse in the data field of the Response
    Swap {
        first: Swap,
        route: Vec<Step>,
        amount: SwapAmountWithLimit,
    },
    /// Add liquidity to a pool with all of its assets, for an exact amount of shares.
    /// Fails if the needed liquidity exceeds any of token_in_maxs.
    /// Returns JoinPoolResponse in the data field of the Response
    JoinPool {
        pool_id: u64,
        share_out_amount: Uint128,
        token_in_maxs: Vec<Coin>,
    },
    /// Add liquidity to a specified pool with only one of the required assets
    /// (i.e. Join pool 1 (50/50 ATOM-OSMO) with just ATOM).
    /// Returns JoinPoolResponse in the data field of the Response
    JoinSwapExactAmountIn {
        pool_id: u64,
        denom_in: String,
        share_out_min: Uint128,
        token_in: Coin,
    },
}

impl OsmosisMsg {
    /// Decodes a message handed over by a contract. A swap amount with both or
    /// neither limit is `AmbiguousAmount`, any other decoding problem is a
    /// `MalformedMessage`.
    pub fn parse(data: &[u8]) -> Result<Self, OsmosisError> {
        from_slice(data).map_err(|err| {
            let msg = err.to_string();
            if msg.contains(&OsmosisError::AmbiguousAmount.to_string()) {
                OsmosisError::AmbiguousAmount
            } else {
                OsmosisError::MalformedMessage { msg }
            }
        })
    }

    pub fn create_denom(subdenom: impl Into<String>) -> Self {
        OsmosisMsg::CreateDenom {
            subdenom: subdenom.into(),
        }
    }

    pub fn mint_contract_tokens(
        denom: impl Into<String>,
        amount: Uint128,
        recipient: impl Into<String>,
    ) -> Self {
        OsmosisMsg::MintTokens {
            denom: denom.into(),
            amount,
            recipient: recipient.into(),
        }
    }

    /// Burns from the sending contract's own balance
    pub fn burn_contract_tokens(denom: impl Into<String>, amount: Uint128) -> Self {
        OsmosisMsg::BurnTokens {
            denom: denom.into(),
            amount,
            burn_from: String::new(),
        }
    }

    /// Basic helper to define a swap with one pool
    pub fn simple_swap(
        pool_id: u64,
        denom_in: impl Into<String>,
        denom_out: impl Into<String>,
        amount: SwapAmountWithLimit,
    ) -> Self {
        OsmosisMsg::Swap {
            first: Swap::new(pool_id, denom_in, denom_out),
            amount,
            route: vec![],
        }
    }
}

impl From<OsmosisMsg> for CosmosMsg<OsmosisMsg> {
    fn from(msg: OsmosisMsg) -> CosmosMsg<OsmosisMsg> {
        CosmosMsg::Custom(msg)
    }
}

impl CustomMsg for OsmosisMsg {}

/// Data returned by a swap, as reported by the gamm module
#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct SwapResponse {
    pub token_in: Coin,
    pub token_out: Coin,
}

/// Data returned by both pool joins
#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct JoinPoolResponse {
    pub share_out: Coin,
    pub tokens_in: Vec<Coin>,
}
