//! carebook-core: session model and domain types for the hospital booking client.
//!
//! The HTTP side lives in `carebook-plugins`; this crate only knows the
//! [`session::SessionBackend`] seam.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod portal;
pub mod session;
