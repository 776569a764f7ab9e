//! Credential and confirmation-token logic.
//!
//! Password hashing with Argon2id and stateless HS512 confirmation tokens.
//! Token verification is a pure function of the token, the current time, and
//! the secret: no storage, no revocation list. A token can therefore not be
//! invalidated before its expiry.

mod error;
pub mod password;
pub mod tokens;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
