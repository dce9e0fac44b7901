//! Types used throughout the expense integration.
//!
//! Request and response shapes for the five operations, plus the
//! [`Service`] identifiers used for endpoints and signing.

mod common;
mod requests;
mod responses;

pub use common::*;
pub use requests::*;
pub use responses::*;
