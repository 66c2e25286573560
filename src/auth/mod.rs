pub mod auth;
pub mod guard;
pub mod handlers;
pub mod jwt;
pub mod middleware;
