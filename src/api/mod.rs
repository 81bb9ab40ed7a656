pub mod auth;
pub mod health;
pub mod routes;
pub mod users;
pub mod workouts;
