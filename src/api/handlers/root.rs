use crate::APP_USER_AGENT;
use axum::response::IntoResponse;

// Undocumented banner route; useful for load balancer checks and humans.
pub async fn root() -> impl IntoResponse {
    APP_USER_AGENT
}
