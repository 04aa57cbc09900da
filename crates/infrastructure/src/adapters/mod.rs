//! Adapters implementing the application-layer ports.

pub mod reqwest_client;

pub use reqwest_client::ReqwestHttpClient;
