use axum::{Router, routing::get};

pub mod authorizer;
pub mod system;
pub mod triggers;
pub mod users;

/// Router for all endpoints behind the enforcing gateway.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route(
            "/users",
            get(users::get_user)
                .put(users::create_user)
                .post(users::update_user)
                .delete(users::delete_user),
        )
}
