use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::admin::admin_routes;
use super::auth::auth_routes;
use super::clients::client_routes;
use super::health::health_check;
use super::payments::payment_routes;
use super::progress::progress_routes;
use super::state::AppState;
use super::student::student_routes;
use super::workouts::workout_routes;
use crate::auth::{frame_options_layer, security_headers_layer, session_middleware};

pub fn create_routes(state: AppState) -> Router {
    // Everything below requires a session; role gates sit on the inner routers
    let members = Router::new()
        .merge(client_routes())
        .merge(workout_routes())
        .merge(progress_routes())
        .merge(payment_routes())
        .merge(admin_routes())
        .merge(student_routes())
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(members)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security_headers_layer())
                .layer(frame_options_layer()),
        )
        .with_state(state)
}
