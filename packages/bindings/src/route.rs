use crate::error::OsmosisError;
use crate::types::{Step, Swap};

/// Expands the first hop and the chained steps into explicit hops, in execution order.
///
/// Each step takes its input denom from the output of the hop before it. Only
/// the shape is checked here; whether the pools exist and hold those denoms is
/// up to the gamm module.
pub fn build_route(first: &Swap, route: &[Step]) -> Result<Vec<Swap>, OsmosisError> {
    let mut hops = Vec::with_capacity(route.len() + 1);
    hops.push(first.clone());
    let mut denom_in = first.denom_out.as_str();
    for step in route {
        hops.push(Swap::new(step.pool_id, denom_in, step.denom_out.as_str()));
        denom_in = step.denom_out.as_str();
    }

    if let Some((index, _)) = hops.iter().enumerate().find(|(_, hop)| hop.pool_id == 0) {
        return Err(OsmosisError::InvalidRoute {
            reason: format!("hop {} references pool 0", index),
        });
    }
    Ok(hops)
}
