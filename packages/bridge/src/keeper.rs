use cosmwasm_std::{Addr, Coin, Storage, Uint128};
use cw_storage_plus::Map;

use osmo_bindings::{
    full_denom, parse_factory_denom, JoinPoolResponse, OsmosisError, Swap, SwapAmount,
    SwapResponse,
};

use crate::modules::{Bank, Gamm, PoolSource, TokenFactory};
use crate::pool::{simulate_route, Pool};

pub const POOLS: Map<u64, Pool> = Map::new("pools");

/// Admin of every factory denom, an empty string once the admin was removed
pub const DENOM_ADMINS: Map<&str, String> = Map::new("denom_admins");

/// Balances of `StorageBank`, by (address, denom)
pub const BALANCES: Map<(&str, &str), Uint128> = Map::new("balances");

/// tokenfactory and gamm over one storage and a bank.
///
/// All checks (admin, balances, limits) run before the first write, so a
/// failing call leaves storage and bank untouched.
pub struct OsmosisKeeper<'a, B> {
    storage: &'a mut dyn Storage,
    bank: B,
}

impl<'a, B: Bank> OsmosisKeeper<'a, B> {
    pub fn new(storage: &'a mut dyn Storage, bank: B) -> Self {
        OsmosisKeeper { storage, bank }
    }

    fn ensure_admin(&self, sender: &Addr, denom: &str) -> Result<(), OsmosisError> {
        parse_factory_denom(denom)?;
        let admin = DENOM_ADMINS
            .may_load(&*self.storage, denom)?
            .ok_or_else(|| OsmosisError::DenomDoesNotExist {
                denom: denom.to_string(),
            })?;
        if admin.is_empty() || admin != sender.as_str() {
            return Err(OsmosisError::Unauthorized {
                denom: denom.to_string(),
                sender: sender.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_funds(&self, owner: &Addr, needed: &Coin) -> Result<(), OsmosisError> {
        let available = self
            .bank
            .balance(&*self.storage, owner.as_str(), &needed.denom)?;
        if available < needed.amount {
            return Err(OsmosisError::InsufficientFunds {
                needed: needed.clone(),
                available: Coin {
                    denom: needed.denom.clone(),
                    amount: available,
                },
            });
        }
        Ok(())
    }

    // the bank refuses empty transfers, zero amounts are simply skipped
    fn bank_mint(&mut self, recipient: &str, coin: Coin) -> Result<(), OsmosisError> {
        if coin.amount.is_zero() {
            return Ok(());
        }
        self.bank.mint(&mut *self.storage, recipient, coin)
    }

    fn bank_burn(&mut self, owner: &Addr, coin: Coin) -> Result<(), OsmosisError> {
        if coin.amount.is_zero() {
            return Ok(());
        }
        self.bank.burn(&mut *self.storage, owner, coin)
    }
}

impl<'a, B: Bank> TokenFactory for OsmosisKeeper<'a, B> {
    fn create_denom(&mut self, creator: &Addr, subdenom: &str) -> Result<String, OsmosisError> {
        let denom = full_denom(creator.as_str(), subdenom)?;
        if DENOM_ADMINS
            .may_load(&*self.storage, denom.as_str())?
            .is_some()
        {
            return Err(OsmosisError::DuplicateDenom { denom });
        }
        DENOM_ADMINS.save(self.storage, denom.as_str(), &creator.to_string())?;
        Ok(denom)
    }

    fn change_admin(
        &mut self,
        sender: &Addr,
        denom: &str,
        new_admin: &str,
    ) -> Result<(), OsmosisError> {
        self.ensure_admin(sender, denom)?;
        DENOM_ADMINS.save(self.storage, denom, &new_admin.to_string())?;
        Ok(())
    }

    fn mint(
        &mut self,
        sender: &Addr,
        denom: &str,
        amount: Uint128,
        recipient: &str,
    ) -> Result<(), OsmosisError> {
        if amount.is_zero() {
            return Err(OsmosisError::ZeroAmount);
        }
        self.ensure_admin(sender, denom)?;
        let coin = Coin {
            denom: denom.to_string(),
            amount,
        };
        self.bank_mint(recipient, coin)
    }

    fn burn(&mut self, sender: &Addr, denom: &str, amount: Uint128) -> Result<(), OsmosisError> {
        if amount.is_zero() {
            return Err(OsmosisError::ZeroAmount);
        }
        self.ensure_admin(sender, denom)?;
        let coin = Coin {
            denom: denom.to_string(),
            amount,
        };
        self.ensure_funds(sender, &coin)?;
        self.bank_burn(sender, coin)
    }
}

impl<'a, B: Bank> PoolSource for OsmosisKeeper<'a, B> {
    fn pool(&self, pool_id: u64) -> Result<Pool, OsmosisError> {
        StoragePools::new(&*self.storage).pool(pool_id)
    }
}

impl<'a, B: Bank> Gamm for OsmosisKeeper<'a, B> {
    fn swap(
        &mut self,
        sender: &Addr,
        hops: &[Swap],
        amount: SwapAmount,
        limit: Uint128,
    ) -> Result<SwapResponse, OsmosisError> {
        let (first, last) = match (hops.first(), hops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(OsmosisError::InvalidRoute {
                    reason: "no hops".to_string(),
                })
            }
        };
        let outcome = simulate_route(|pool_id| self.pool(pool_id), hops, amount.clone())?;
        // either side may round down to nothing
        if outcome.input.is_zero() || outcome.output.is_zero() {
            return Err(OsmosisError::ZeroAmount);
        }
        match amount {
            SwapAmount::In(_) if outcome.output < limit => {
                return Err(OsmosisError::SlippageExceeded {
                    min: limit,
                    actual: outcome.output,
                })
            }
            SwapAmount::Out(_) if outcome.input > limit => {
                return Err(OsmosisError::LimitViolated {
                    max: limit,
                    actual: outcome.input,
                })
            }
            _ => {}
        }

        let token_in = Coin {
            denom: first.denom_in.clone(),
            amount: outcome.input,
        };
        let token_out = Coin {
            denom: last.denom_out.clone(),
            amount: outcome.output,
        };
        self.ensure_funds(sender, &token_in)?;

        for (pool_id, pool) in &outcome.pools {
            POOLS.save(self.storage, *pool_id, pool)?;
        }
        // pools hold no bank balance, the trade is a burn and a mint on the sender
        self.bank_burn(sender, token_in.clone())?;
        self.bank_mint(sender.as_str(), token_out.clone())?;
        Ok(SwapResponse {
            token_in,
            token_out,
        })
    }

    fn join_pool(
        &mut self,
        sender: &Addr,
        pool_id: u64,
        share_out_amount: Uint128,
        token_in_maxs: &[Coin],
    ) -> Result<JoinPoolResponse, OsmosisError> {
        if share_out_amount.is_zero() {
            return Err(OsmosisError::ZeroAmount);
        }
        let mut pool = self.pool(pool_id)?;
        let tokens_in = pool.join(share_out_amount, token_in_maxs)?;
        for coin in &tokens_in {
            self.ensure_funds(sender, coin)?;
        }

        POOLS.save(self.storage, pool_id, &pool)?;
        for coin in &tokens_in {
            self.bank_burn(sender, coin.clone())?;
        }
        let share_out = Coin {
            denom: Pool::gamm_denom(pool_id),
            amount: share_out_amount,
        };
        self.bank_mint(sender.as_str(), share_out.clone())?;
        Ok(JoinPoolResponse {
            share_out,
            tokens_in,
        })
    }

    fn join_swap_exact_amount_in(
        &mut self,
        sender: &Addr,
        pool_id: u64,
        token_in: &Coin,
        share_out_min: Uint128,
    ) -> Result<JoinPoolResponse, OsmosisError> {
        if token_in.amount.is_zero() {
            return Err(OsmosisError::ZeroAmount);
        }
        let mut pool = self.pool(pool_id)?;
        let shares = pool.join_single(token_in)?;
        if shares < share_out_min {
            return Err(OsmosisError::SlippageExceeded {
                min: share_out_min,
                actual: shares,
            });
        }
        self.ensure_funds(sender, token_in)?;

        POOLS.save(self.storage, pool_id, &pool)?;
        self.bank_burn(sender, token_in.clone())?;
        let share_out = Coin {
            denom: Pool::gamm_denom(pool_id),
            amount: shares,
        };
        self.bank_mint(sender.as_str(), share_out.clone())?;
        Ok(JoinPoolResponse {
            share_out,
            tokens_in: vec![token_in.clone()],
        })
    }
}

/// Read-only pool lookup, used by queries
pub struct StoragePools<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StoragePools<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        StoragePools { storage }
    }
}

impl<'a> PoolSource for StoragePools<'a> {
    fn pool(&self, pool_id: u64) -> Result<Pool, OsmosisError> {
        POOLS
            .may_load(self.storage, pool_id)?
            .ok_or(OsmosisError::PoolNotFound { pool_id })
    }
}

/// A bank kept in the module's own storage, for running the keeper without an App
#[derive(Clone, Copy, Default, Debug)]
pub struct StorageBank;

impl Bank for StorageBank {
    fn balance(
        &self,
        storage: &dyn Storage,
        address: &str,
        denom: &str,
    ) -> Result<Uint128, OsmosisError> {
        Ok(BALANCES
            .may_load(storage, (address, denom))?
            .unwrap_or_default())
    }

    fn mint(
        &self,
        storage: &mut dyn Storage,
        recipient: &str,
        coin: Coin,
    ) -> Result<(), OsmosisError> {
        BALANCES.update(
            storage,
            (recipient, coin.denom.as_str()),
            |balance| -> Result<_, OsmosisError> {
                Ok(balance.unwrap_or_default().checked_add(coin.amount)?)
            },
        )?;
        Ok(())
    }

    fn burn(&self, storage: &mut dyn Storage, owner: &Addr, coin: Coin) -> Result<(), OsmosisError> {
        let available = self.balance(storage, owner.as_str(), &coin.denom)?;
        if available < coin.amount {
            return Err(OsmosisError::InsufficientFunds {
                available: Coin {
                    denom: coin.denom.clone(),
                    amount: available,
                },
                needed: coin,
            });
        }
        BALANCES.save(
            storage,
            (owner.as_str(), coin.denom.as_str()),
            &(available - coin.amount),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::{coin, Decimal};

    fn balance(storage: &dyn Storage, addr: &str, denom: &str) -> u128 {
        StorageBank.balance(storage, addr, denom).unwrap().u128()
    }

    fn setup_pools(storage: &mut dyn Storage) {
        let star = Pool::new(coin(12_000_000, "uosmo"), coin(240_000_000, "ustar"))
            .with_fee(Decimal::zero())
            .unwrap();
        let atom = Pool::new(coin(6_000_000, "uatom"), coin(12_000_000, "uosmo"))
            .with_fee(Decimal::zero())
            .unwrap();
        POOLS.save(storage, 1, &star).unwrap();
        POOLS.save(storage, 2, &atom).unwrap();
    }

    #[test]
    fn create_denom_once() {
        let mut storage = MockStorage::new();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let creator = Addr::unchecked("c1");

        let denom = keeper.create_denom(&creator, "SUN").unwrap();
        assert_eq!(denom, "factory/c1/SUN");

        let err = keeper.create_denom(&creator, "SUN").unwrap_err();
        assert_eq!(err, OsmosisError::DuplicateDenom { denom });

        // same subdenom under another creator is a different denom
        let other = keeper
            .create_denom(&Addr::unchecked("c2"), "SUN")
            .unwrap();
        assert_eq!(other, "factory/c2/SUN");
    }

    #[test]
    fn mints_compose_by_sum() {
        let mut storage = MockStorage::new();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let creator = Addr::unchecked("c1");
        let denom = keeper.create_denom(&creator, "SUN").unwrap();

        keeper
            .mint(&creator, &denom, Uint128::new(808010808), "lucky")
            .unwrap();
        keeper
            .mint(&creator, &denom, Uint128::new(808010808), "lucky")
            .unwrap();
        assert_eq!(balance(&storage, "lucky", "factory/c1/SUN"), 1616021616);
    }

    #[test]
    fn only_admin_mints() {
        let mut storage = MockStorage::new();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let creator = Addr::unchecked("c1");
        let denom = keeper.create_denom(&creator, "SUN").unwrap();

        let intruder = Addr::unchecked("intruder");
        let err = keeper
            .mint(&intruder, &denom, Uint128::new(1), "intruder")
            .unwrap_err();
        assert_eq!(
            err,
            OsmosisError::Unauthorized {
                denom: denom.clone(),
                sender: "intruder".to_string()
            }
        );

        let err = keeper
            .mint(&creator, "factory/c1/MOON", Uint128::new(1), "lucky")
            .unwrap_err();
        assert_eq!(
            err,
            OsmosisError::DenomDoesNotExist {
                denom: "factory/c1/MOON".to_string()
            }
        );

        let err = keeper
            .mint(&creator, &denom, Uint128::zero(), "lucky")
            .unwrap_err();
        assert_eq!(err, OsmosisError::ZeroAmount);
    }

    #[test]
    fn change_and_drop_admin() {
        let mut storage = MockStorage::new();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let creator = Addr::unchecked("c1");
        let heir = Addr::unchecked("heir");
        let denom = keeper.create_denom(&creator, "SUN").unwrap();

        keeper.change_admin(&creator, &denom, "heir").unwrap();
        assert!(keeper
            .mint(&creator, &denom, Uint128::new(5), "lucky")
            .is_err());
        keeper.mint(&heir, &denom, Uint128::new(5), "lucky").unwrap();

        // nobody is in charge anymore
        keeper.change_admin(&heir, &denom, "").unwrap();
        let err = keeper
            .mint(&heir, &denom, Uint128::new(5), "lucky")
            .unwrap_err();
        assert!(matches!(err, OsmosisError::Unauthorized { .. }));
        let err = keeper.change_admin(&heir, &denom, "heir").unwrap_err();
        assert!(matches!(err, OsmosisError::Unauthorized { .. }));
    }

    #[test]
    fn burn_from_own_balance() {
        let mut storage = MockStorage::new();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let creator = Addr::unchecked("c1");
        let denom = keeper.create_denom(&creator, "SUN").unwrap();
        keeper
            .mint(&creator, &denom, Uint128::new(100), "c1")
            .unwrap();

        let err = keeper
            .burn(&creator, &denom, Uint128::new(101))
            .unwrap_err();
        assert_eq!(
            err,
            OsmosisError::InsufficientFunds {
                needed: coin(101, "factory/c1/SUN"),
                available: coin(100, "factory/c1/SUN"),
            }
        );
        keeper.burn(&creator, &denom, Uint128::new(40)).unwrap();
        assert_eq!(balance(&storage, "c1", "factory/c1/SUN"), 60);
    }

    #[test]
    fn two_hop_swap_moves_funds() {
        let mut storage = MockStorage::new();
        setup_pools(&mut storage);
        StorageBank
            .mint(&mut storage, "trader", coin(240_000_000, "ustar"))
            .unwrap();
        let trader = Addr::unchecked("trader");

        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let hops = vec![Swap::new(1, "ustar", "uosmo"), Swap::new(2, "uosmo", "uatom")];
        let res = keeper
            .swap(
                &trader,
                &hops,
                SwapAmount::In(Uint128::new(240_000_000)),
                Uint128::new(1_999_000),
            )
            .unwrap();
        assert_eq!(res.token_in, coin(240_000_000, "ustar"));
        assert_eq!(res.token_out, coin(2_000_000, "uatom"));

        assert_eq!(balance(&storage, "trader", "ustar"), 0);
        assert_eq!(balance(&storage, "trader", "uatom"), 2_000_000);
        let star = POOLS.load(&storage, 1).unwrap();
        assert_eq!(star.get_amount("ustar"), Some(Uint128::new(480_000_000)));
    }

    #[test]
    fn failed_swap_changes_nothing() {
        let mut storage = MockStorage::new();
        setup_pools(&mut storage);
        StorageBank
            .mint(&mut storage, "trader", coin(240_000_000, "ustar"))
            .unwrap();
        let trader = Addr::unchecked("trader");
        let pools_before = (POOLS.load(&storage, 1).unwrap(), POOLS.load(&storage, 2).unwrap());

        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let hops = vec![Swap::new(1, "ustar", "uosmo"), Swap::new(2, "uosmo", "uatom")];
        let err = keeper
            .swap(
                &trader,
                &hops,
                SwapAmount::In(Uint128::new(240_000_000)),
                Uint128::new(2_000_001),
            )
            .unwrap_err();
        assert_eq!(
            err,
            OsmosisError::SlippageExceeded {
                min: Uint128::new(2_000_001),
                actual: Uint128::new(2_000_000),
            }
        );

        // exact out asking for too much input
        let err = keeper
            .swap(
                &trader,
                &hops,
                SwapAmount::Out(Uint128::new(2_000_000)),
                Uint128::new(100),
            )
            .unwrap_err();
        assert!(matches!(err, OsmosisError::LimitViolated { .. }));

        assert_eq!(balance(&storage, "trader", "ustar"), 240_000_000);
        assert_eq!(balance(&storage, "trader", "uosmo"), 0);
        assert_eq!(balance(&storage, "trader", "uatom"), 0);
        let pools_after = (POOLS.load(&storage, 1).unwrap(), POOLS.load(&storage, 2).unwrap());
        assert_eq!(pools_before, pools_after);
    }

    #[test]
    fn swap_rounding_to_nothing_fails() {
        let mut storage = MockStorage::new();
        // default fee, one ustar is worth less than one uosmo
        let pool = Pool::new(coin(12_000_000, "uosmo"), coin(240_000_000, "ustar"));
        POOLS.save(&mut storage, 1, &pool).unwrap();
        StorageBank
            .mint(&mut storage, "trader", coin(1, "ustar"))
            .unwrap();
        let trader = Addr::unchecked("trader");

        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let hops = vec![Swap::new(1, "ustar", "uosmo")];
        let err = keeper
            .swap(&trader, &hops, SwapAmount::In(Uint128::new(1)), Uint128::zero())
            .unwrap_err();
        assert_eq!(err, OsmosisError::ZeroAmount);

        assert_eq!(balance(&storage, "trader", "ustar"), 1);
        assert_eq!(POOLS.load(&storage, 1).unwrap(), pool);
    }

    #[test]
    fn non_factory_denoms_are_rejected() {
        let mut storage = MockStorage::new();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let creator = Addr::unchecked("c1");
        keeper.create_denom(&creator, "SUN").unwrap();

        let err = keeper
            .mint(&creator, "uosmo", Uint128::new(1), "lucky")
            .unwrap_err();
        assert!(matches!(err, OsmosisError::InvalidDenom { .. }));
        let err = keeper.burn(&creator, "c1/SUN", Uint128::new(1)).unwrap_err();
        assert!(matches!(err, OsmosisError::InvalidDenom { .. }));
        let err = keeper
            .change_admin(&creator, "factory/c1", "heir")
            .unwrap_err();
        assert!(matches!(err, OsmosisError::InvalidDenom { .. }));
    }

    #[test]
    fn join_pool_needs_caps_then_funds() {
        let mut storage = MockStorage::new();
        let pool = Pool::new(coin(12_000_000, "uosmo"), coin(240_000_000, "ustar"))
            .with_fee(Decimal::zero())
            .unwrap()
            .with_shares(100_000_000_000_000_000_000u128);
        POOLS.save(&mut storage, 1, &pool).unwrap();
        let actor = Addr::unchecked("actor");
        let share_out = Uint128::new(100_000_000_000_000_000);
        let liquidity = vec![coin(12_000, "uosmo"), coin(240_000, "ustar")];

        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let err = keeper
            .join_pool(&actor, 1, share_out, &[coin(10, "random")])
            .unwrap_err();
        assert_eq!(
            err,
            OsmosisError::InsufficientTokenInMax {
                max: vec![coin(10, "random")],
                needed: liquidity.clone(),
            }
        );

        let err = keeper.join_pool(&actor, 1, share_out, &liquidity).unwrap_err();
        assert_eq!(
            err,
            OsmosisError::InsufficientFunds {
                needed: coin(12_000, "uosmo"),
                available: coin(0, "uosmo"),
            }
        );

        let err = keeper.join_pool(&actor, 7, share_out, &liquidity).unwrap_err();
        assert_eq!(err, OsmosisError::PoolNotFound { pool_id: 7 });

        StorageBank
            .mint(&mut storage, "actor", coin(12_000, "uosmo"))
            .unwrap();
        StorageBank
            .mint(&mut storage, "actor", coin(240_000, "ustar"))
            .unwrap();
        let mut keeper = OsmosisKeeper::new(&mut storage, StorageBank);
        let res = keeper.join_pool(&actor, 1, share_out, &liquidity).unwrap();
        assert_eq!(res.tokens_in, liquidity);
        assert_eq!(res.share_out, coin(100_000_000_000_000_000, "gamm/pool/1"));

        let pool = POOLS.load(&storage, 1).unwrap();
        assert_eq!(pool.get_amount("uosmo"), Some(Uint128::new(12_012_000)));
        assert_eq!(pool.get_amount("ustar"), Some(Uint128::new(240_240_000)));
        assert_eq!(pool.shares, Uint128::new(100_100_000_000_000_000_000));
        assert_eq!(balance(&storage, "actor", "uosmo"), 0);
        assert_eq!(
            balance(&storage, "actor", "gamm/pool/1"),
            100_000_000_000_000_000
        );
    }
}
