use cosmwasm_std::{to_binary, Addr, Binary, Coin, Event, Uint128};
use itertools::Itertools;

use osmo_bindings::{
    build_route, validate_subdenom, FullDenomResponse, OsmosisError, OsmosisMsg, Step, Swap,
    SwapAmountWithLimit,
};

use crate::modules::{Gamm, TokenFactory};

/// What a dispatched message left behind, besides the state changes inside the modules
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchResponse {
    pub events: Vec<Event>,
    pub data: Option<Binary>,
}

impl DispatchResponse {
    fn new(event: Event) -> Self {
        DispatchResponse {
            events: vec![event],
            data: None,
        }
    }

    fn with_data(mut self, data: Binary) -> Self {
        self.data = Some(data);
        self
    }
}

/// Runs one message on behalf of `issuer`, the contract that sent it.
///
/// Nothing is retried and no module error is rewritten, the caller decides
/// what to do with a failure.
pub fn dispatch<K>(
    keeper: &mut K,
    issuer: &Addr,
    msg: OsmosisMsg,
) -> Result<DispatchResponse, OsmosisError>
where
    K: TokenFactory + Gamm,
{
    match msg {
        OsmosisMsg::CreateDenom { subdenom } => create_denom(keeper, issuer, subdenom),
        OsmosisMsg::ChangeAdmin { denom, new_admin } => {
            change_admin(keeper, issuer, denom, new_admin)
        }
        OsmosisMsg::MintTokens {
            denom,
            amount,
            recipient,
        } => mint_tokens(keeper, issuer, denom, amount, recipient),
        OsmosisMsg::BurnTokens {
            denom,
            amount,
            burn_from,
        } => burn_tokens(keeper, issuer, denom, amount, burn_from),
        OsmosisMsg::Swap {
            first,
            route,
            amount,
        } => swap(keeper, issuer, first, route, amount),
        OsmosisMsg::JoinPool {
            pool_id,
            share_out_amount,
            token_in_maxs,
        } => join_pool(keeper, issuer, pool_id, share_out_amount, token_in_maxs),
        OsmosisMsg::JoinSwapExactAmountIn {
            pool_id,
            denom_in,
            share_out_min,
            token_in,
        } => join_swap_exact_amount_in(keeper, issuer, pool_id, denom_in, share_out_min, token_in),
    }
}

fn create_denom<K: TokenFactory>(
    keeper: &mut K,
    issuer: &Addr,
    subdenom: String,
) -> Result<DispatchResponse, OsmosisError> {
    validate_subdenom(&subdenom)?;
    let denom = keeper.create_denom(issuer, &subdenom)?;

    let event = Event::new("create_denom")
        .add_attribute("creator", issuer.as_str())
        .add_attribute("new_token_denom", denom.as_str());
    let data = to_binary(&FullDenomResponse { denom })?;
    Ok(DispatchResponse::new(event).with_data(data))
}

fn change_admin<K: TokenFactory>(
    keeper: &mut K,
    issuer: &Addr,
    denom: String,
    new_admin: String,
) -> Result<DispatchResponse, OsmosisError> {
    keeper.change_admin(issuer, &denom, &new_admin)?;

    let event = Event::new("change_admin")
        .add_attribute("denom", denom)
        .add_attribute("new_admin", new_admin);
    Ok(DispatchResponse::new(event))
}

fn mint_tokens<K: TokenFactory>(
    keeper: &mut K,
    issuer: &Addr,
    denom: String,
    amount: Uint128,
    recipient: String,
) -> Result<DispatchResponse, OsmosisError> {
    keeper.mint(issuer, &denom, amount, &recipient)?;

    let event = Event::new("tf_mint")
        .add_attribute("mint_to_address", recipient)
        .add_attribute("amount", format!("{}{}", amount, denom));
    Ok(DispatchResponse::new(event))
}

fn burn_tokens<K: TokenFactory>(
    keeper: &mut K,
    issuer: &Addr,
    denom: String,
    amount: Uint128,
    burn_from: String,
) -> Result<DispatchResponse, OsmosisError> {
    if !burn_from.is_empty() {
        return Err(OsmosisError::UnsupportedBurnSource { address: burn_from });
    }
    keeper.burn(issuer, &denom, amount)?;

    let event = Event::new("tf_burn")
        .add_attribute("burn_from_address", issuer.as_str())
        .add_attribute("amount", format!("{}{}", amount, denom));
    Ok(DispatchResponse::new(event))
}

fn swap<K: Gamm>(
    keeper: &mut K,
    issuer: &Addr,
    first: Swap,
    route: Vec<Step>,
    amount: SwapAmountWithLimit,
) -> Result<DispatchResponse, OsmosisError> {
    let hops = build_route(&first, &route)?;
    let (amount, limit) = amount.into_parts();
    let res = keeper.swap(issuer, &hops, amount, limit)?;

    let event = Event::new("token_swapped")
        .add_attribute("sender", issuer.as_str())
        .add_attribute("pool_ids", hops.iter().map(|hop| hop.pool_id).join(","))
        .add_attribute("tokens_in", res.token_in.to_string())
        .add_attribute("tokens_out", res.token_out.to_string());
    Ok(DispatchResponse::new(event).with_data(to_binary(&res)?))
}

fn join_pool<K: Gamm>(
    keeper: &mut K,
    issuer: &Addr,
    pool_id: u64,
    share_out_amount: Uint128,
    token_in_maxs: Vec<Coin>,
) -> Result<DispatchResponse, OsmosisError> {
    let res = keeper.join_pool(issuer, pool_id, share_out_amount, &token_in_maxs)?;

    let event = Event::new("pool_joined")
        .add_attribute("sender", issuer.as_str())
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("tokens_in", res.tokens_in.iter().join(","))
        .add_attribute("share_out", res.share_out.to_string());
    Ok(DispatchResponse::new(event).with_data(to_binary(&res)?))
}

fn join_swap_exact_amount_in<K: Gamm>(
    keeper: &mut K,
    issuer: &Addr,
    pool_id: u64,
    denom_in: String,
    share_out_min: Uint128,
    token_in: Coin,
) -> Result<DispatchResponse, OsmosisError> {
    if denom_in != token_in.denom {
        return Err(OsmosisError::MalformedMessage {
            msg: format!(
                "denom_in {} does not match token_in {}",
                denom_in, token_in
            ),
        });
    }
    let res = keeper.join_swap_exact_amount_in(issuer, pool_id, &token_in, share_out_min)?;

    let event = Event::new("pool_joined")
        .add_attribute("sender", issuer.as_str())
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("tokens_in", token_in.to_string())
        .add_attribute("share_out", res.share_out.to_string());
    Ok(DispatchResponse::new(event).with_data(to_binary(&res)?))
}
