//! eduquery-auth
//!
//! Session lifecycle: bootstrap, auth-change subscription, credential
//! operations, and account resolution against an injected [`store::AccountStore`].

pub mod error;
pub mod session;
pub mod store;
