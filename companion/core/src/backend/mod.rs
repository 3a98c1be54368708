//! Remote Reply Backends
//!
//! The contract for the remote text-generation collaborator and its HTTP
//! implementation. The engine only ever sees the [`ReplySource`] trait, so
//! tests can script replies without a network.

pub mod http;
pub mod traits;

pub use http::{HttpReplyClient, DEFAULT_ENDPOINT, MISSING_REASON_FALLBACK};
pub use traits::{ReplyError, ReplySource};
