//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (Cookie header, ?token=)
//!     → session.rs (extract Credentials)
//!     → authenticator.rs (cookie-then-token policy)
//!     → provider.rs (IdentityProvider seam)
//!     → firebase.rs (Identity Toolkit REST, JWKS)
//!     → Return: AuthOutcome or AuthFailure
//! ```

pub mod authenticator;
pub mod firebase;
pub mod provider;
pub mod session;
pub mod token_source;

pub use authenticator::{AuthFailure, AuthOutcome, Authenticator};
pub use firebase::FirebaseAuth;
pub use provider::{AuthError, Claims, IdentityProvider};
pub use session::{Credentials, SESSION_COOKIE, SESSION_TTL};
