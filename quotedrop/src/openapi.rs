//! OpenAPI document, served at `/docs`.

use utoipa::OpenApi;

use crate::api::models::{DeleteEmailRequest, DeleteEmailResponse, MessageResponse, SaveEmailRequest, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "quotedrop",
        description = "Upload-and-notify backend: file storage plus recipient-list fan-out"
    ),
    paths(
        crate::api::handlers::uploads::upload_file,
        crate::api::handlers::recipients::save_email,
        crate::api::handlers::recipients::delete_email,
        crate::api::handlers::recipients::list_emails,
        crate::api::handlers::status::root,
    ),
    components(schemas(
        UploadResponse,
        SaveEmailRequest,
        DeleteEmailRequest,
        DeleteEmailResponse,
        MessageResponse
    )),
    tags(
        (name = "uploads", description = "File upload and static serving"),
        (name = "recipients", description = "Recipient list management"),
        (name = "status", description = "Liveness")
    )
)]
pub struct ApiDoc;
