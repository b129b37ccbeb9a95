pub mod auth_service;
pub mod openai_service;
pub mod recommendation_service;

pub use openai_service::*;
