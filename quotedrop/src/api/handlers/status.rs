//! Basic status route.

#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    summary = "Service status",
    responses(
        (status = 200, description = "Service is running", body = String)
    )
)]
pub async fn root() -> &'static str {
    "Welcome to the File Upload and Email API!"
}
