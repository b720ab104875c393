//! Authentication for the four actor guards: password verification, JWT
//! access/refresh pairs, sign-out via a token denylist, and staff account
//! management.

pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod password;
pub mod token;

mod admin;

pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use gateway::{AuthGateway, Registration, Session};
pub use guard::Guard;
pub use token::TokenPair;

#[cfg(test)]
mod tests;
