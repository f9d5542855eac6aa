//! # Postita Client
//! Asynchronous wrapper around the Postita.fi print and mail HTTP API: upload a PDF or Finvoice document and the service prints, envelopes and posts it. Each [`Client`] method maps to exactly one API endpoint.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest` with HTTP basic authentication on every request.
//!
//! ## Out of scope
//! No retries, caching, rate limiting or validation of server payloads. Responses come back as the server sent them: JSON as [`serde_json::Value`] (see [`JobRecord`] and [`AccountInfo`] for typed views), documents as raw bytes.
//!
//! ## Errors
//! Transport failures surface as [`Error::Request`]. Any non-2xx answer becomes [`Error::Status`] carrying the server's status code and body unchanged: `400` for a malformed request or a job in the wrong state, `401` for bad credentials, `404` for an unknown job.
//!
//! ## Example
//! ```no_run
//! use postita_client::{Client, Document, JobStatus, SendOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postita_client::Error> {
//!     let client = Client::new("myuser", "mypass123")?;
//!
//!     let pdf = Document::from_path("mypdf.pdf").await?;
//!     let job = client.send("my-test-job-name", &pdf, &SendOptions::default()).await?;
//!     println!("Sent: {job}");
//!
//!     let unconfirmed = client.list_jobs(JobStatus::New).await?;
//!     println!("Waiting for confirmation: {unconfirmed}");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;
mod request;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::{AccountInfo, JobRecord, JobStatus, UnknownStatus};
pub use request::{Address, Document, FinvoiceOptions, JobFilter, PostClass, SendOptions};

/// Result type alias for Postita operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
