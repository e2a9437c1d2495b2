//! API route configuration.

use crate::api::handlers::{
    alias_availability_handler, create_link_handler, delete_link_handler,
    get_link_by_code_handler, get_link_handler, increment_clicks_handler, list_links_handler,
    resolve_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /links`              - Create a link (random code or alias)
/// - `GET    /links`              - List active links (paginated)
/// - `GET    /links/{id}`         - Fetch a link by id
/// - `PATCH  /links/{id}`         - Partially update a link
/// - `DELETE /links/{id}`         - Delete a link and free its code
/// - `POST   /links/{id}/clicks`  - Increment the click counter
/// - `GET    /codes/{code}`       - Fetch a link by short code
/// - `GET    /resolve/{code}`     - Resolve a code as JSON
/// - `GET    /aliases/{alias}`    - Check alias availability
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/links/{id}/clicks", post(increment_clicks_handler))
        .route("/codes/{code}", get(get_link_by_code_handler))
        .route("/resolve/{code}", get(resolve_handler))
        .route("/aliases/{alias}", get(alias_availability_handler))
}
