use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    create_repair, delete_repair, get_repair, list_repairs, list_summaries, update_repair,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_repair).get(list_repairs))
        .route("/summary", get(list_summaries))
        .route("/:id", get(get_repair).put(update_repair).delete(delete_repair))
}
