//! Freelance marketplace service
//!
//! User profiles, freelancer/client roles and portfolio projects behind an
//! authenticated remote-procedure HTTP surface. The binary in `main.rs` wires
//! configuration, storage and the router together; integration tests build
//! the same router over [`repositories::MemoryStore`].

pub mod access;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
