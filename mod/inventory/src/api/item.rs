use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items/{item_name}/stages", get(stages_for_item))
        .route("/karigars", get(karigars))
}

async fn stages_for_item(
    State(svc): State<AppState>,
    Path(item_name): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    ok_json(svc.stages_for_item(&item_name))
}

async fn karigars(State(svc): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    ok_json(svc.karigars())
}
