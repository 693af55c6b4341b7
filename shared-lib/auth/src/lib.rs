//! Bearer token authentication and role-based authorization.
//!
//! [`TokenService`] issues HS256 tokens that embed a credential store key
//! and resolves them back to subject records. [`RolePolicy`] decides which
//! API resources a role may reach.

mod claims;
mod clock;
mod policy;
mod service;
mod token;

pub use claims::{Claims, DEFAULT_EXPIRES_IN_SECS, MAX_EXPIRES_IN_SECS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::{resource_of, Decision, Resource, Role, RolePolicy, API_PREFIX};
pub use service::{TokenService, Verification, DEFAULT_STORE_TIMEOUT};
pub use token::{decode_token, encode_token, HmacSha256, JwtConfig};
