use utoipa::OpenApi;

use crate::features::repairs::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_repair,
        handlers::list_repairs,
        handlers::list_summaries,
        handlers::get_repair,
        handlers::update_repair,
        handlers::delete_repair,
    ),
    components(
        schemas(
            storage::dto::repair::CreateRepairRequest,
            storage::dto::repair::UpdateRepairRequest,
            storage::dto::repair::RepairResponse,
            storage::dto::repair::RepairSummary,
            storage::dto::common::PaginationMeta,
        )
    ),
    tags(
        (name = "repairs", description = "Vehicle repair records"),
    )
)]
pub struct ApiDoc;
