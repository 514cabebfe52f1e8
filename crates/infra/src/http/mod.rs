//! HTTP client shared by the remote service adapters

mod client;

pub use client::{HttpClient, HttpClientBuilder};
