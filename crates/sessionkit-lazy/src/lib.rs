//! SessionKit Lazy Session
//!
//! A session handle every request can carry for free:
//! - Nothing is loaded until a handler touches session data
//! - The real session is obtained at most once per request
//! - Regeneration swaps the real session behind a stable handle

mod lazy;

pub use lazy::LazySession;
