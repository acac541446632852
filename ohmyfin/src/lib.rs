//! # Ohmyfin
//!
//! Client for the Ohmyfin API (formerly TrackMySwift):
//! - SWIFT transaction tracking by UETR or reference
//! - Pre-send validation of BIC/IBAN and correspondents
//! - Standard Settlement Instructions (SSI) lookup
//! - Status reporting for banks in the payment chain
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Client: track / validate / get_ssi / change │
//! └──────────────────────┬───────────────────────┘
//!                        │  HttpRequest (KEY header, JSON)
//! ┌──────────────────────▼───────────────────────┐
//! │       Transport (ReqwestTransport, stubs)    │
//! └──────────────────────┬───────────────────────┘
//!                        │  status + body
//! ┌──────────────────────▼───────────────────────┐
//! │   2xx → typed result | 4xx/5xx → Error::Api  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use ohmyfin::{Client, ClientConfig, TrackRequest};
//! use rust_decimal::Decimal;
//!
//! # async fn run() -> ohmyfin::Result<()> {
//! let client = Client::new(ClientConfig::new("your-api-key"))?;
//! let request = TrackRequest::by_uetr(
//!     "97ed4827-7b6f-4491-a06f-b548d5a7512d",
//!     Decimal::new(10000, 0),
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     "USD",
//! );
//! let result = client.track(&request).await?;
//! println!("{}", result.status);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod transport;
pub mod types;

pub use cancel::cancellable;
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, FieldErrors, Result, TransportError};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use types::*;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://ohmyfin.ai";

/// Default request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default User-Agent header
pub const USER_AGENT: &str = concat!("ohmyfin-rust/", env!("CARGO_PKG_VERSION"));
