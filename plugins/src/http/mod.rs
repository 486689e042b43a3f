pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{find_api_error, ApiError, ApiErrorKind};
