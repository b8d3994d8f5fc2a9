use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::stories::list_stories,
        api::stories::get_story,
        api::chapters::get_chapter,
        api::chapters::publish_chapter,
        api::store::subscribe,
        api::store::create_sale,
    ),
    tags(
        (name = "fabulis", description = "Fabulis publishing and store API")
    )
)]
pub struct ApiDoc;
