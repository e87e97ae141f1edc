use cosmwasm_std::{Coin, DivideByZeroError, OverflowError, StdError, Uint128};
use itertools::Itertools;
use thiserror::Error;

/// Everything that can go wrong between a contract handing us an `OsmosisMsg`
/// and the tokenfactory / gamm modules finishing with it.
#[derive(Error, Debug, PartialEq)]
pub enum OsmosisError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("Malformed message: {msg}")]
    MalformedMessage { msg: String },

    #[error("Invalid subdenom: {subdenom:?}")]
    InvalidSubdenom { subdenom: String },

    #[error("Invalid denom: {denom:?} {message:?}")]
    InvalidDenom { denom: String, message: String },

    #[error("Invalid swap route: {reason}")]
    InvalidRoute { reason: String },

    #[error("Swap amount must set exactly one of exact_in or exact_out")]
    AmbiguousAmount,

    #[error("Burn from address is not supported yet, was: {address:?}")]
    UnsupportedBurnSource { address: String },

    #[error("Unauthorized: {sender} is not the admin of {denom}")]
    Unauthorized { denom: String, sender: String },

    #[error("Amount was zero, must be positive")]
    ZeroAmount,

    #[error("Denom does not exist: {denom}")]
    DenomDoesNotExist { denom: String },

    #[error("Denom already exists: {denom}")]
    DuplicateDenom { denom: String },

    #[error("{available} is smaller than {needed}: insufficient funds")]
    InsufficientFunds { needed: Coin, available: Coin },

    #[error(
        "TokenInMaxs is less than the needed LP liquidity, upperbound: {}, needed {}",
        fmt_coins(.max),
        fmt_coins(.needed)
    )]
    InsufficientTokenInMax { max: Vec<Coin>, needed: Vec<Coin> },

    #[error("Output {actual} under minimum requested {min}, aborting")]
    SlippageExceeded { min: Uint128, actual: Uint128 },

    #[error("Input {actual} over maximum allowed {max}, aborting")]
    LimitViolated { max: Uint128, actual: Uint128 },

    #[error("Pool does not hold enough {denom} to pay out")]
    InsufficientLiquidity { denom: String },

    #[error("Pool {pool_id} not found")]
    PoolNotFound { pool_id: u64 },

    #[error("Asset {denom} not in pool")]
    AssetNotInPool { denom: String },

    #[error("Unsupported pool operation: {reason}")]
    UnsupportedPool { reason: String },

    #[error("Host module error: {msg}")]
    HostModule { msg: String },
}

fn fmt_coins(coins: &[Coin]) -> String {
    coins.iter().join(",")
}
