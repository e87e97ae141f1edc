use anyhow::{bail, Result as AnyResult};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use cosmwasm_std::testing::{MockApi, MockStorage};
use cosmwasm_std::{
    from_binary, Addr, Api, BalanceResponse, BankMsg, BankQuery, Binary, BlockInfo, Coin,
    CustomQuery, Empty, Querier, QuerierResult, QueryRequest, StdResult, Storage, Uint128,
};
use cw_multi_test::{
    App, AppResponse, BankKeeper, BankSudo, BasicAppBuilder, CosmosRouter, Module, WasmKeeper,
};

use osmo_bindings::{OsmosisError, OsmosisMsg, OsmosisQuery};

use crate::dispatch::dispatch;
use crate::keeper::{OsmosisKeeper, StoragePools, POOLS};
use crate::modules::Bank;
use crate::pool::Pool;
use crate::resolve::resolve;

/// Errors raised by the router keep their type when they are ours
fn host_err(err: anyhow::Error) -> OsmosisError {
    err.downcast::<OsmosisError>()
        .unwrap_or_else(|err| OsmosisError::HostModule {
            msg: err.to_string(),
        })
}

/// The App's own bank, reached through the router. Burning goes through
/// `BankMsg::Burn` as the sender, minting through `BankSudo::Mint`.
struct RouterBank<'r, ExecC, QueryC>
where
    QueryC: CustomQuery + DeserializeOwned + 'static,
{
    api: &'r dyn Api,
    router: &'r dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
    block: &'r BlockInfo,
}

impl<'r, ExecC, QueryC> Bank for RouterBank<'r, ExecC, QueryC>
where
    ExecC: Debug + Clone + PartialEq + JsonSchema + DeserializeOwned + 'static,
    QueryC: CustomQuery + DeserializeOwned + 'static,
{
    fn balance(
        &self,
        storage: &dyn Storage,
        address: &str,
        denom: &str,
    ) -> Result<Uint128, OsmosisError> {
        let query = QueryRequest::Bank(BankQuery::Balance {
            address: address.to_string(),
            denom: denom.to_string(),
        });
        let bin = self
            .router
            .query(self.api, storage, self.block, query)
            .map_err(host_err)?;
        let res: BalanceResponse = from_binary(&bin)?;
        Ok(res.amount.amount)
    }

    fn mint(
        &self,
        storage: &mut dyn Storage,
        recipient: &str,
        coin: Coin,
    ) -> Result<(), OsmosisError> {
        let mint = BankSudo::Mint {
            to_address: recipient.to_string(),
            amount: vec![coin],
        };
        self.router
            .sudo(self.api, storage, self.block, mint.into())
            .map_err(host_err)?;
        Ok(())
    }

    fn burn(&self, storage: &mut dyn Storage, owner: &Addr, coin: Coin) -> Result<(), OsmosisError> {
        let burn = BankMsg::Burn { amount: vec![coin] };
        self.router
            .execute(self.api, storage, self.block, owner.clone(), burn.into())
            .map_err(host_err)?;
        Ok(())
    }
}

pub struct OsmosisModule {}

impl OsmosisModule {
    pub fn set_pool(&self, storage: &mut dyn Storage, pool_id: u64, pool: &Pool) -> StdResult<()> {
        POOLS.save(storage, pool_id, pool)
    }
}

impl Module for OsmosisModule {
    type ExecT = OsmosisMsg;
    type QueryT = OsmosisQuery;
    type SudoT = Empty;

    fn execute<ExecC, QueryC>(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        block: &BlockInfo,
        sender: Addr,
        msg: OsmosisMsg,
    ) -> AnyResult<AppResponse>
    where
        ExecC: Debug + Clone + PartialEq + JsonSchema + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        api.debug(&format!("osmosis: {} sent {:?}", sender, msg));

        let bank = RouterBank { api, router, block };
        let mut keeper = OsmosisKeeper::new(storage, bank);
        let res = dispatch(&mut keeper, &sender, msg)?;
        Ok(AppResponse {
            events: res.events,
            data: res.data,
        })
    }

    fn sudo<ExecC, QueryC>(
        &self,
        _api: &dyn Api,
        _storage: &mut dyn Storage,
        _router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        _block: &BlockInfo,
        _msg: Self::SudoT,
    ) -> AnyResult<AppResponse>
    where
        ExecC: Debug + Clone + PartialEq + JsonSchema + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        bail!("sudo not implemented for OsmosisModule")
    }

    fn query(
        &self,
        _api: &dyn Api,
        storage: &dyn Storage,
        _querier: &dyn Querier,
        _block: &BlockInfo,
        request: OsmosisQuery,
    ) -> anyhow::Result<Binary> {
        Ok(resolve(&StoragePools::new(storage), request)?)
    }
}

pub type OsmosisAppWrapped =
    App<BankKeeper, MockApi, MockStorage, OsmosisModule, WasmKeeper<OsmosisMsg, OsmosisQuery>>;

pub struct OsmosisApp(OsmosisAppWrapped);

impl Deref for OsmosisApp {
    type Target = OsmosisAppWrapped;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for OsmosisApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Querier for OsmosisApp {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        self.0.raw_query(bin_request)
    }
}

impl Default for OsmosisApp {
    fn default() -> Self {
        Self::new()
    }
}

impl OsmosisApp {
    pub fn new() -> Self {
        Self(
            BasicAppBuilder::<OsmosisMsg, OsmosisQuery>::new_custom()
                .with_custom(OsmosisModule {})
                .build(|_router, _, _storage| {}),
        )
    }

    /// Stores `pool` under `pool_id`, replacing whatever was there
    pub fn set_pool(&mut self, pool_id: u64, pool: &Pool) -> StdResult<()> {
        self.init_modules(|router, _, storage| router.custom.set_pool(storage, pool_id, pool))
    }

    /// Mints `amount` straight into `address`, as genesis would
    pub fn fund(&mut self, address: &str, amount: Vec<Coin>) -> AnyResult<()> {
        let mint = BankSudo::Mint {
            to_address: address.to_string(),
            amount,
        };
        self.sudo(mint.into())?;
        Ok(())
    }
}
