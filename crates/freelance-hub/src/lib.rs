//! FreelanceHub core library.
//!
//! Houses the marketplace domain (accounts, jobs, applications), the
//! application lifecycle manager and its denormalized side effects, the
//! dashboard aggregators, and the HTTP router the API service mounts.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
