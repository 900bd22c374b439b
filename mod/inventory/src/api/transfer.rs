use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::model::Lot;
use crate::service::MoveStageInput;
use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new().route("/lots/{lot_no}/move", post(move_stage))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    from_stage: String,
    to_stage: String,
    karigar: String,
    #[serde(default)]
    machine: Option<String>,
    size: String,
    qty: u32,
}

/// Response for a successful move: the success flag the external
/// contract promises, plus the updated lot so the caller can refresh
/// its view without a second read.
#[derive(Serialize)]
struct MoveResponse {
    success: bool,
    lot: Lot,
}

async fn move_stage(
    State(svc): State<AppState>,
    Path(lot_no): Path<String>,
    Json(body): Json<MoveBody>,
) -> Result<Json<MoveResponse>, ApiError> {
    ok_json(
        svc.move_lot_stage(&MoveStageInput {
            lot_no,
            from_stage: body.from_stage,
            to_stage: body.to_stage,
            karigar: body.karigar,
            machine: body.machine,
            size: body.size,
            qty: body.qty,
        })
        .map(|lot| MoveResponse { success: true, lot }),
    )
}
