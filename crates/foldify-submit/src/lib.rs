//! Sending built jobs to the prediction backend.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod multifold;

pub use client::{BackendClient, DashboardClient, JobList, ZipAvailability};
pub use controller::{FormController, SubmitOutcome};
pub use error::{SubmitError, SubmitRejected};
pub use http::HttpBackend;
pub use multifold::{submit_multifold, MultiFoldReport, ToolResult};
