use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

use stagetrack_core::{ListParams, ListResult};

use crate::model::{Lot, SizeAvailability, StageStock};
use crate::service::CreateLotInput;
use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lots", post(create_lot).get(list_lots))
        .route("/lots/{lot_no}", get(get_lot))
        .route("/lots/{lot_no}/stock", get(get_stock))
        .route("/lots/{lot_no}/stages/{stage}/sizes", get(selectable_sizes))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLotBody {
    lot_no: String,
    item_name: String,
    #[serde(default)]
    current_stage_stock: StageStock,
}

async fn create_lot(
    State(svc): State<AppState>,
    Json(body): Json<CreateLotBody>,
) -> Result<Json<Lot>, ApiError> {
    ok_json(svc.create_lot(CreateLotInput {
        lot_no: body.lot_no,
        item_name: body.item_name,
        current_stage_stock: body.current_stage_stock,
    }))
}

async fn get_lot(
    State(svc): State<AppState>,
    Path(lot_no): Path<String>,
) -> Result<Json<Lot>, ApiError> {
    ok_json(svc.get_lot(&lot_no))
}

async fn list_lots(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Lot>>, ApiError> {
    ok_json(svc.list_lots(&params))
}

async fn get_stock(
    State(svc): State<AppState>,
    Path(lot_no): Path<String>,
) -> Result<Json<StageStock>, ApiError> {
    ok_json(svc.current_stage_stock(&lot_no))
}

async fn selectable_sizes(
    State(svc): State<AppState>,
    Path((lot_no, stage)): Path<(String, String)>,
) -> Result<Json<Vec<SizeAvailability>>, ApiError> {
    ok_json(svc.selectable_sizes(&lot_no, &stage))
}
