//! Domain operations layer
//!
//! Services receive the authenticated caller from the route handlers, apply
//! the ownership guards from [`crate::access`] and talk to storage through the
//! repository traits.

pub mod portfolio;
pub mod user;

pub use portfolio::PortfolioService;
pub use user::UserService;
