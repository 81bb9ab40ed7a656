// Business logic services

pub mod generation_service;
pub mod user_service;

pub use generation_service::GenerationService;
pub use user_service::UserService;
