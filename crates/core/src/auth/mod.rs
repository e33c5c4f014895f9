//! Request authentication with signed JSON Web Tokens
//!
//! Every outgoing request carries `Authorization: JWT token="<jwt>"`. The
//! token's claims are produced per request by the generators registered on
//! a [`RequestSigner`]; the standard set (`key`, `exp`, `method`, `path`,
//! `body`) ties the token to the exact request it authorizes.

pub mod claims;
pub mod signer;

pub use claims::{is_falsy, Claim, ClaimGenerator};
pub use signer::RequestSigner;
