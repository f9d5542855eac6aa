//! Typed views of Postita response payloads.
//!
//! Client methods return the server JSON untouched; these types are for callers
//! that want to `serde_json::from_value` it into something structured.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a job on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "DR")]
    Draft,
    /// Waiting for confirmation.
    #[serde(rename = "NE")]
    New,
    #[serde(rename = "CO")]
    Confirmed,
    #[serde(rename = "CA")]
    Cancelled,
    #[serde(rename = "PR")]
    Processing,
    #[serde(rename = "SE")]
    Sent,
}

impl JobStatus {
    /// Two-letter code used by the API.
    pub fn as_code(&self) -> &'static str {
        match self {
            JobStatus::Draft => "DR",
            JobStatus::New => "NE",
            JobStatus::Confirmed => "CO",
            JobStatus::Cancelled => "CA",
            JobStatus::Processing => "PR",
            JobStatus::Sent => "SE",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Returned when parsing a string that is not one of the known status codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status code: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DR" => Ok(JobStatus::Draft),
            "NE" => Ok(JobStatus::New),
            "CO" => Ok(JobStatus::Confirmed),
            "CA" => Ok(JobStatus::Cancelled),
            "PR" => Ok(JobStatus::Processing),
            "SE" => Ok(JobStatus::Sent),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One job as reported by `job_info`, `confirm` and `list_jobs`.
///
/// Fields missing from the shorter `job_info` answer are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Id accepted by `confirm`, `delete`, `job_info` and `job_pdf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub status: JobStatus,
    pub name: String,
    /// `DD.MM.YYYY HH:MM:SS` as sent by the service.
    pub created: String,
    /// Decimal string, e.g. `"26.60"`.
    pub price: String,
    pub total_pages: u32,
    pub is_massmail: bool,
    pub recipient_count: u32,
    /// Price including VAT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_einvoice: Option<bool>,
    /// Dispatch time, absent until the job is sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<String>,
    /// Pages per letter, or `""` when the job was not split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_splitter: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_set: Option<serde_json::Value>,
}

/// Account balance summary from `account_info`.
///
/// `available_funds` is the balance minus the price of every queued job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub balance: serde_json::Value,
    pub credit_limit: serde_json::Value,
    pub available_funds: serde_json::Value,
}
