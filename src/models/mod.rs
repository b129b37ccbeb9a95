pub mod recommendation;
pub mod user;

pub use recommendation::*;
pub use user::*;
