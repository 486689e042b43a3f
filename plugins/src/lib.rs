pub mod factory;
pub mod http;
pub mod portal;
pub mod services;
pub mod session;
