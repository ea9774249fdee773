//! Token lifecycle: claims, issuing and verification, the per-request gate
//! state machine and password hashing.

pub mod claims;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod password;

pub use claims::{AuthenticatedUser, Claims, TokenClass};
pub use error::AuthError;
pub use gate::{authenticate, parse_bearer, GateMode, GateOutcome};
pub use jwt::{TokenIssuer, TokenPair};
pub use password::PasswordHasher;
