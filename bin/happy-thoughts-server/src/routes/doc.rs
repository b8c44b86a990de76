use crate::routes::{health, thoughts};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "happy-thoughts-server",
    description = "Create, list and like short thoughts",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(thoughts::ThoughtsApi::openapi());
    root
}
