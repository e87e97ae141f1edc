use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::convert::TryFrom;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{
    Coin, Decimal, Fraction, Isqrt, OverflowError, OverflowOperation, Uint128, Uint256,
};

use osmo_bindings::{OsmosisError, PoolStateResponse, Swap, SwapAmount};

/// Prefix of the lp share denom, followed by the pool id
pub const GAMM_PREFIX: &str = "gamm/pool";

pub const DEFAULT_SWAP_FEE_PERMILLE: u64 = 3;

/// An equal-weighted constant product pool. Just enough of an AMM to exercise
/// the bindings, not a model of the real gamm math.
#[derive(Serialize, Deserialize, Clone, PartialEq, JsonSchema, Debug)]
pub struct Pool {
    pub assets: Vec<Coin>,
    pub shares: Uint128,
    pub fee: Decimal,
}

impl Pool {
    // make an equal-weighted uniswap-like pool with 0.3% fees
    pub fn new(a: Coin, b: Coin) -> Self {
        // the root of a product of two u128 always fits back into one
        let shares =
            Uint128::try_from(a.amount.full_mul(b.amount).isqrt()).unwrap_or(Uint128::MAX);
        Pool {
            assets: vec![a, b],
            shares,
            fee: Decimal::permille(DEFAULT_SWAP_FEE_PERMILLE),
        }
    }

    /// Fails for fees above 100%
    pub fn with_fee(mut self, fee: Decimal) -> Result<Self, OsmosisError> {
        if fee > Decimal::one() {
            return Err(OsmosisError::UnsupportedPool {
                reason: format!("swap fee {} above 100%", fee),
            });
        }
        self.fee = fee;
        Ok(self)
    }

    pub fn with_shares(mut self, shares: impl Into<Uint128>) -> Self {
        self.shares = shares.into();
        self
    }

    pub fn get_amount(&self, denom: &str) -> Option<Uint128> {
        self.assets
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
    }

    pub fn set_amount(&mut self, denom: &str, amount: Uint128) -> Result<(), OsmosisError> {
        let asset = self
            .assets
            .iter_mut()
            .find(|c| c.denom == denom)
            .ok_or_else(|| OsmosisError::AssetNotInPool {
                denom: denom.to_string(),
            })?;
        asset.amount = amount;
        Ok(())
    }

    /// Balances of both sides of a swap, both must be non-empty
    fn balances(&self, denom_in: &str, denom_out: &str) -> Result<(Uint128, Uint128), OsmosisError> {
        if denom_in == denom_out {
            return Err(OsmosisError::UnsupportedPool {
                reason: format!("cannot swap {} for itself", denom_in),
            });
        }
        let bal_in = self.balance_of(denom_in)?;
        let bal_out = self.balance_of(denom_out)?;
        Ok((bal_in, bal_out))
    }

    fn balance_of(&self, denom: &str) -> Result<Uint128, OsmosisError> {
        match self.get_amount(denom) {
            Some(amount) if amount.is_zero() => Err(OsmosisError::InsufficientLiquidity {
                denom: denom.to_string(),
            }),
            Some(amount) => Ok(amount),
            None => Err(OsmosisError::AssetNotInPool {
                denom: denom.to_string(),
            }),
        }
    }

    /// `1 - fee`. Pools read back from storage are not guaranteed to carry a sane fee.
    fn fee_complement(&self) -> Result<Decimal, OsmosisError> {
        if self.fee > Decimal::one() {
            return Err(OsmosisError::UnsupportedPool {
                reason: format!("swap fee {} above 100%", self.fee),
            });
        }
        Ok(Decimal::one() - self.fee)
    }

    pub fn spot_price(
        &self,
        denom_in: &str,
        denom_out: &str,
        with_swap_fee: bool,
    ) -> Result<Decimal, OsmosisError> {
        let (bal_in, bal_out) = self.balances(denom_in, denom_out)?;
        let mult = if with_swap_fee {
            self.fee_complement()?
        } else {
            Decimal::one()
        };
        ratio(mul_decimal(bal_out, mult)?, bal_in)
    }

    /// Output paid for an exact input
    pub fn quote_exact_in(
        &self,
        denom_in: &str,
        denom_out: &str,
        input: Uint128,
    ) -> Result<Uint128, OsmosisError> {
        let (bal_in, bal_out) = self.balances(denom_in, denom_out)?;
        let input_minus_fee = mul_decimal(input, self.fee_complement()?)?;
        let k = bal_in.checked_mul(bal_out)?;
        let final_out = ceil_div(k, bal_in.checked_add(input_minus_fee)?)?;
        Ok(bal_out.checked_sub(final_out)?)
    }

    /// Input required for an exact output. Asking for the whole balance (or more)
    /// of the out denom fails rather than overflowing.
    pub fn quote_exact_out(
        &self,
        denom_in: &str,
        denom_out: &str,
        output: Uint128,
    ) -> Result<Uint128, OsmosisError> {
        let (bal_in, bal_out) = self.balances(denom_in, denom_out)?;
        if output >= bal_out {
            return Err(OsmosisError::InsufficientLiquidity {
                denom: denom_out.to_string(),
            });
        }
        let k = bal_in.checked_mul(bal_out)?;
        let final_in = ceil_div(k, bal_out - output)?;
        let input_minus_fee = final_in.checked_sub(bal_in)?;
        let fee_mult = self
            .fee_complement()?
            .inv()
            .ok_or_else(|| OsmosisError::UnsupportedPool {
                reason: "swap fee of 100%".to_string(),
            })?;
        mul_decimal(input_minus_fee, fee_mult)
    }

    /// Executes one hop against this pool and returns the other side of the trade
    pub fn swap(
        &mut self,
        denom_in: &str,
        denom_out: &str,
        amount: SwapAmount,
    ) -> Result<SwapAmount, OsmosisError> {
        let (input, output, payout) = match amount {
            SwapAmount::In(input) => {
                let output = self.quote_exact_in(denom_in, denom_out, input)?;
                (input, output, SwapAmount::Out(output))
            }
            SwapAmount::Out(output) => {
                let input = self.quote_exact_out(denom_in, denom_out, output)?;
                (input, output, SwapAmount::In(input))
            }
        };
        let (bal_in, bal_out) = self.balances(denom_in, denom_out)?;
        self.set_amount(denom_in, bal_in.checked_add(input)?)?;
        self.set_amount(denom_out, bal_out.checked_sub(output)?)?;
        Ok(payout)
    }

    /// Balanced join for an exact number of shares. Every asset is needed in
    /// proportion, rounded up, and must be covered by `token_in_maxs`.
    pub fn join(
        &mut self,
        share_out: Uint128,
        token_in_maxs: &[Coin],
    ) -> Result<Vec<Coin>, OsmosisError> {
        if self.shares.is_zero() {
            return Err(OsmosisError::UnsupportedPool {
                reason: "pool has no shares to join".to_string(),
            });
        }
        let needed = self
            .assets
            .iter()
            .map(|asset| {
                let amount = ceil_div(asset.amount.checked_mul(share_out)?, self.shares)?;
                Ok(Coin {
                    denom: asset.denom.clone(),
                    amount,
                })
            })
            .collect::<Result<Vec<_>, OsmosisError>>()?;

        let covered = needed.iter().all(|need| {
            token_in_maxs
                .iter()
                .any(|max| max.denom == need.denom && max.amount >= need.amount)
        });
        if !covered {
            return Err(OsmosisError::InsufficientTokenInMax {
                max: token_in_maxs.to_vec(),
                needed,
            });
        }

        for (asset, need) in self.assets.iter_mut().zip(&needed) {
            asset.amount = asset.amount.checked_add(need.amount)?;
        }
        self.shares = self.shares.checked_add(share_out)?;
        Ok(needed)
    }

    /// Single asset join, returns the shares minted for `token_in`.
    /// Half of the deposit is implicitly swapped, so half of the swap fee applies.
    pub fn join_single(&mut self, token_in: &Coin) -> Result<Uint128, OsmosisError> {
        if self.assets.len() != 2 {
            return Err(OsmosisError::UnsupportedPool {
                reason: "single asset joins need a two asset pool".to_string(),
            });
        }
        let balance = self.balance_of(&token_in.denom)?;
        self.fee_complement()?;
        let fee = self.fee * Decimal::percent(50);
        let in_minus_fee = mul_decimal(token_in.amount, Decimal::one() - fee)?;
        let growth = ratio(balance.checked_add(in_minus_fee)?, balance)?;
        let shares_out = mul_decimal(self.shares, growth.sqrt() - Decimal::one())?;

        self.set_amount(&token_in.denom, balance.checked_add(token_in.amount)?)?;
        self.shares = self.shares.checked_add(shares_out)?;
        Ok(shares_out)
    }

    pub fn gamm_denom(pool_id: u64) -> String {
        // see https://github.com/osmosis-labs/osmosis/blob/e13cddc698a121dce2f8919b2a0f6a743f4082d6/x/gamm/types/key.go#L52-L54
        format!("{}/{}", GAMM_PREFIX, pool_id)
    }

    pub fn into_response(self, pool_id: u64) -> PoolStateResponse {
        PoolStateResponse {
            assets: self.assets,
            shares: Coin {
                denom: Pool::gamm_denom(pool_id),
                amount: self.shares,
            },
        }
    }
}

const DECIMAL_PLACES: u32 = 18;

/// `amount * factor` rounded down, an error where `Uint128 * Decimal` would panic
fn mul_decimal(amount: Uint128, factor: Decimal) -> Result<Uint128, OsmosisError> {
    let product = amount.full_mul(factor.atomics()) / Uint256::from(10u128.pow(DECIMAL_PLACES));
    Uint128::try_from(product)
        .map_err(|_| OverflowError::new(OverflowOperation::Mul, amount, factor).into())
}

/// `numerator / denominator` rounded down, an error where `Decimal::from_ratio` would panic
fn ratio(numerator: Uint128, denominator: Uint128) -> Result<Decimal, OsmosisError> {
    let overflow = || OverflowError::new(OverflowOperation::Mul, numerator, denominator);
    let atomics = numerator
        .full_mul(10u128.pow(DECIMAL_PLACES))
        .checked_div(Uint256::from(denominator))?;
    let atomics = Uint128::try_from(atomics).map_err(|_| overflow())?;
    Decimal::from_atomics(atomics, DECIMAL_PLACES).map_err(|_| overflow().into())
}

fn ceil_div(numerator: Uint128, denominator: Uint128) -> Result<Uint128, OsmosisError> {
    let floor = numerator.checked_div(denominator)?;
    if floor.checked_mul(denominator)? == numerator {
        Ok(floor)
    } else {
        Ok(floor.checked_add(Uint128::new(1))?)
    }
}

/// Result of running a whole route against copies of its pools
#[derive(Clone, PartialEq, Debug)]
pub struct RouteOutcome {
    pub input: Uint128,
    pub output: Uint128,
    /// Updated state of every pool the route touched
    pub pools: BTreeMap<u64, Pool>,
}

/// Runs every hop of `hops` on copies of the pools, nothing is written back.
///
/// Exact in walks the route forwards, exact out walks it backwards from the
/// requested output. A pool visited twice sees the hop quoted before it, which
/// for exact out is the later hop of the route.
pub fn simulate_route<F>(
    mut load: F,
    hops: &[Swap],
    amount: SwapAmount,
) -> Result<RouteOutcome, OsmosisError>
where
    F: FnMut(u64) -> Result<Pool, OsmosisError>,
{
    if hops.is_empty() {
        return Err(OsmosisError::InvalidRoute {
            reason: "no hops".to_string(),
        });
    }
    if amount.amount().is_zero() {
        return Err(OsmosisError::ZeroAmount);
    }

    let mut pools = BTreeMap::new();
    let (input, output) = match amount {
        SwapAmount::In(input) => {
            let mut current = input;
            for hop in hops {
                let pool = cached_pool(&mut pools, &mut load, hop.pool_id)?;
                current = pool
                    .swap(&hop.denom_in, &hop.denom_out, SwapAmount::In(current))?
                    .amount();
            }
            (input, current)
        }
        SwapAmount::Out(output) => {
            let mut current = output;
            for hop in hops.iter().rev() {
                let pool = cached_pool(&mut pools, &mut load, hop.pool_id)?;
                current = pool
                    .swap(&hop.denom_in, &hop.denom_out, SwapAmount::Out(current))?
                    .amount();
            }
            (current, output)
        }
    };
    Ok(RouteOutcome {
        input,
        output,
        pools,
    })
}

fn cached_pool<'p, F>(
    pools: &'p mut BTreeMap<u64, Pool>,
    load: &mut F,
    pool_id: u64,
) -> Result<&'p mut Pool, OsmosisError>
where
    F: FnMut(u64) -> Result<Pool, OsmosisError>,
{
    match pools.entry(pool_id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => Ok(entry.insert(load(pool_id)?)),
    }
}
