//! # ob-infra
//!
//! Driven adapters for the onboarding ports: the HTTP backend client and the
//! progress stores.

pub mod http;
pub mod progress;

pub use http::HttpOnboardingApi;
pub use progress::{FileProgressStore, InMemoryProgressStore};
