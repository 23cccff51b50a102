//! Staff authentication
//!
//! - [`JwtService`] - token issue/validation
//! - [`StaffCredentials`] - argon2 password check
//! - [`require_auth`] - middleware guarding the staff API

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use password::{StaffCredentials, hash_password, verify_password};
