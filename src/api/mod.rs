pub mod admin;
pub mod auth;
pub mod clients;
pub mod health;
pub mod payments;
pub mod progress;
pub mod routes;
pub mod state;
pub mod student;
pub mod views;
pub mod workouts;

pub use routes::create_routes;
pub use state::AppState;
