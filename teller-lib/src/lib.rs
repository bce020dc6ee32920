//! A client library for a bank-account service
//!
//! Observable session state with best-effort snapshot persistence, an
//! account service client whose mutating requests carry client-generated
//! idempotency tokens, and a navigation guard over the client's routes.

#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs
)]
#![warn(clippy::pedantic)]

pub mod container;
#[doc(inline)]
pub use container::Container;
mod client;
pub use client::{Client, HealthReport, DEFAULT_TIMEOUT};
mod error;
pub use error::Error;
pub mod persist;
mod route;
pub use route::Route;
mod service;
pub use service::AccountService;
pub mod state;
#[doc(inline)]
pub use state::Session;
pub mod store;
pub mod types;
