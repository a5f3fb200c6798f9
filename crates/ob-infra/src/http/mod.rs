mod client;

pub use client::HttpOnboardingApi;
