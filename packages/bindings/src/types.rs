use std::convert::TryFrom;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::Uint128;

use crate::error::OsmosisError;

/// One pool traversal with both denoms spelled out
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, JsonSchema, Debug)]
pub struct Swap {
    pub pool_id: u64,
    pub denom_in: String,
    pub denom_out: String,
}

impl Swap {
    pub fn new(pool_id: u64, denom_in: impl Into<String>, denom_out: impl Into<String>) -> Self {
        Swap {
            pool_id,
            denom_in: denom_in.into(),
            denom_out: denom_out.into(),
        }
    }
}

/// A follow-up hop. Its input denom is the output denom of the hop before it.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, JsonSchema, Debug)]
pub struct Step {
    pub pool_id: u64,
    pub denom_out: String,
}

impl Step {
    pub fn new(pool_id: u64, denom_out: impl Into<String>) -> Self {
        Step {
            pool_id,
            denom_out: denom_out.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case")]
pub enum SwapAmount {
    In(Uint128),
    Out(Uint128),
}

impl SwapAmount {
    pub fn amount(&self) -> Uint128 {
        match self {
            SwapAmount::In(x) | SwapAmount::Out(x) => *x,
        }
    }
}

#[derive(Serialize, Clone, Eq, PartialEq, JsonSchema, Debug)]
#[serde(rename_all = "snake_case")]
pub enum SwapAmountWithLimit {
    ExactIn { input: Uint128, min_output: Uint128 },
    ExactOut { output: Uint128, max_input: Uint128 },
}

impl SwapAmountWithLimit {
    /// Splits into the fixed side of the swap and the bound on the other side:
    /// `min_output` for exact in, `max_input` for exact out.
    pub fn into_parts(self) -> (SwapAmount, Uint128) {
        match self {
            SwapAmountWithLimit::ExactIn { input, min_output } => {
                (SwapAmount::In(input), min_output)
            }
            SwapAmountWithLimit::ExactOut { output, max_input } => {
                (SwapAmount::Out(output), max_input)
            }
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExactIn {
    pub input: Uint128,
    pub min_output: Uint128,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExactOut {
    pub output: Uint128,
    pub max_input: Uint128,
}

/// Wire shape of `SwapAmountWithLimit` as other clients send it: two optional
/// keys, of which exactly one must be present.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct SwapAmountFields {
    pub exact_in: Option<ExactIn>,
    pub exact_out: Option<ExactOut>,
}

impl TryFrom<SwapAmountFields> for SwapAmountWithLimit {
    type Error = OsmosisError;

    fn try_from(fields: SwapAmountFields) -> Result<Self, Self::Error> {
        match (fields.exact_in, fields.exact_out) {
            (Some(ExactIn { input, min_output }), None) => {
                Ok(SwapAmountWithLimit::ExactIn { input, min_output })
            }
            (None, Some(ExactOut { output, max_input })) => {
                Ok(SwapAmountWithLimit::ExactOut { output, max_input })
            }
            _ => Err(OsmosisError::AmbiguousAmount),
        }
    }
}

impl<'de> Deserialize<'de> for SwapAmountWithLimit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = SwapAmountFields::deserialize(deserializer)?;
        SwapAmountWithLimit::try_from(fields).map_err(serde::de::Error::custom)
    }
}
