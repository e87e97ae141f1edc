use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use osmo_bindings::{
    EstimatePriceResponse, FullDenomResponse, JoinPoolResponse, OsmosisMsg, OsmosisQuery,
    PoolStateResponse, SpotPriceResponse, SwapResponse,
};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    // messages
    export_schema(&schema_for!(OsmosisMsg), &out_dir);
    export_schema(&schema_for!(OsmosisQuery), &out_dir);

    // data returned by dispatched messages
    export_schema(&schema_for!(SwapResponse), &out_dir);
    export_schema(&schema_for!(JoinPoolResponse), &out_dir);

    // The possible return types for OsmosisQuery cases
    export_schema(&schema_for!(FullDenomResponse), &out_dir);
    export_schema(&schema_for!(PoolStateResponse), &out_dir);
    export_schema(&schema_for!(SpotPriceResponse), &out_dir);
    export_schema(&schema_for!(EstimatePriceResponse), &out_dir);
}
