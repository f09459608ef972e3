use utoipa::OpenApi;

use crate::application::http::{
    analysis::router::AnalysisApiDoc,
    goal::router::GoalApiDoc,
    health::__path_health,
    history::router::HistoryApiDoc,
    payment::router::PaymentApiDoc,
    server::api_entities::api_error::ApiErrorResponse,
    session::router::SessionApiDoc,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NutriScan API"
    ),
    paths(health),
    components(schemas(ApiErrorResponse)),
    nest(
        (path = "/session", api = SessionApiDoc),
        (path = "/payment", api = PaymentApiDoc),
        (path = "/goal", api = GoalApiDoc),
        (path = "/analysis", api = AnalysisApiDoc),
        (path = "/history", api = HistoryApiDoc),
    )
)]
pub struct ApiDoc;
