//! Request and response shapes for the Ohmyfin API

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

// =========================================================================
// STATUSES & ROLES
// =========================================================================

/// Status of a tracked transaction or of one leg of its route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Credited to the beneficiary
    #[serde(rename = "success")]
    Success,
    /// Still moving through the chain
    #[serde(rename = "in progress", alias = "in process", alias = "in_progress")]
    InProgress,
    /// Rejected by a bank in the chain
    #[serde(rename = "rejected")]
    Rejected,
    /// Held for investigation
    #[serde(rename = "on hold", alias = "on_hold")]
    OnHold,
    /// No information yet
    #[serde(rename = "unknown")]
    Unknown,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::InProgress => write!(f, "in progress"),
            TransactionStatus::Rejected => write!(f, "rejected"),
            TransactionStatus::OnHold => write!(f, "on hold"),
            TransactionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Status a financial institution reports through `change`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Being processed
    #[serde(rename = "in process")]
    InProcess,
    /// Completed
    #[serde(rename = "success")]
    Success,
    /// Rejected
    #[serde(rename = "rejected")]
    Rejected,
    /// On hold
    #[serde(rename = "on hold")]
    OnHold,
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeStatus::InProcess => write!(f, "in process"),
            ChangeStatus::Success => write!(f, "success"),
            ChangeStatus::Rejected => write!(f, "rejected"),
            ChangeStatus::OnHold => write!(f, "on hold"),
        }
    }
}

impl FromStr for ChangeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', " ").as_str() {
            "in process" => Ok(ChangeStatus::InProcess),
            "success" => Ok(ChangeStatus::Success),
            "rejected" => Ok(ChangeStatus::Rejected),
            "on hold" => Ok(ChangeStatus::OnHold),
            _ => Err(Error::Validation(format!(
                "Invalid status '{}': expected one of 'in process', 'success', 'rejected', 'on hold'",
                s
            ))),
        }
    }
}

/// Role of the reporting institution in the payment chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Originator's bank
    Originator,
    /// Beneficiary's bank
    Beneficiary,
    /// Intermediary bank
    Intermediary,
    /// Correspondent bank
    Correspondent,
    /// Anyone else
    Other,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Originator => write!(f, "originator"),
            Role::Beneficiary => write!(f, "beneficiary"),
            Role::Intermediary => write!(f, "intermediary"),
            Role::Correspondent => write!(f, "correspondent"),
            Role::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "originator" => Ok(Role::Originator),
            "beneficiary" => Ok(Role::Beneficiary),
            "intermediary" => Ok(Role::Intermediary),
            "correspondent" => Ok(Role::Correspondent),
            "other" => Ok(Role::Other),
            _ => Err(Error::Validation(format!(
                "Invalid role '{}': expected one of 'originator', 'beneficiary', 'intermediary', 'correspondent', 'other'",
                s
            ))),
        }
    }
}

/// Outcome of a single validated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Valid
    Ok,
    /// Valid but suspicious
    Warning,
    /// Invalid
    Error,
}

// =========================================================================
// TRACK
// =========================================================================

/// Track a SWIFT transaction by UETR or by reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRequest {
    /// Unique End-to-end Transaction Reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uetr: Option<String>,
    /// Transaction reference (used when the UETR is not known)
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Transaction amount
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Value date
    pub date: NaiveDate,
    /// ISO 4217 currency code
    pub currency: String,
}

impl TrackRequest {
    /// Track by UETR
    pub fn by_uetr(
        uetr: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            uetr: Some(uetr.into()),
            reference: None,
            amount,
            date,
            currency: currency.into(),
        }
    }

    /// Track by transaction reference
    pub fn by_reference(
        reference: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            uetr: None,
            reference: Some(reference.into()),
            amount,
            date,
            currency: currency.into(),
        }
    }

    /// Check required fields; exactly one of uetr/ref must be set
    pub fn validate(&self) -> Result<()> {
        match (present(&self.uetr), present(&self.reference)) {
            (true, true) => {
                return Err(Error::Validation(
                    "Provide either uetr or ref, not both".to_string(),
                ))
            }
            (false, false) => {
                return Err(Error::Validation(
                    "Either uetr or ref is required".to_string(),
                ))
            }
            _ => {}
        }
        require("currency", &self.currency)
    }

    /// Copy with a blank uetr/ref dropped, so only the real identifier is sent
    pub(crate) fn without_empty_fields(&self) -> Self {
        Self {
            uetr: non_blank(&self.uetr),
            reference: non_blank(&self.reference),
            ..self.clone()
        }
    }
}

/// Tracking result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResult {
    /// Overall status
    pub status: TransactionStatus,
    /// Date of the last status change
    #[serde(deserialize_with = "date_or_datetime")]
    pub lastupdate: NaiveDate,
    /// Status per bank in the payment chain, in route order
    pub details: Vec<LegDetail>,
    /// API usage limits
    pub limits: Limits,
}

/// Status of one bank in the payment chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegDetail {
    /// Leg ID
    pub id: i64,
    /// Bank name
    pub bank: String,
    /// Bank BIC
    pub swift: String,
    /// Leg status
    pub status: TransactionStatus,
    /// Rejection or hold reason (empty when none)
    #[serde(deserialize_with = "null_as_empty")]
    pub reason: String,
    /// Route description
    pub route: String,
}

/// API usage limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Requests left today
    pub daily: i64,
    /// Requests left this month
    pub monthly: i64,
    /// Requests left this year
    pub annual: i64,
}

// =========================================================================
// VALIDATE
// =========================================================================

/// Pre-send validation of payment details
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidateRequest {
    /// Beneficiary bank BIC
    pub beneficiary_bic: String,
    /// ISO 4217 currency code
    pub currency: String,
    /// Beneficiary IBAN
    pub beneficiary_iban: String,
    /// Correspondent bank BIC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correspondent_bic: Option<String>,
    /// Account at the correspondent bank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correspondent_account: Option<String>,
    /// Beneficiary name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_owner: Option<String>,
    /// Beneficiary country
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_country: Option<String>,
    /// Beneficiary region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_region: Option<String>,
    /// Sender bank BIC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_bic: Option<String>,
    /// Sender's correspondent BIC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_correspondent_bic: Option<String>,
}

impl ValidateRequest {
    /// Create request with the required fields
    pub fn new(
        beneficiary_bic: impl Into<String>,
        currency: impl Into<String>,
        beneficiary_iban: impl Into<String>,
    ) -> Self {
        Self {
            beneficiary_bic: beneficiary_bic.into(),
            currency: currency.into(),
            beneficiary_iban: beneficiary_iban.into(),
            ..Default::default()
        }
    }

    /// Set correspondent bank BIC
    pub fn correspondent_bic(mut self, bic: impl Into<String>) -> Self {
        self.correspondent_bic = Some(bic.into());
        self
    }

    /// Set sender bank BIC
    pub fn sender_bic(mut self, bic: impl Into<String>) -> Self {
        self.sender_bic = Some(bic.into());
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        require("beneficiary_bic", &self.beneficiary_bic)?;
        require("currency", &self.currency)?;
        require("beneficiary_iban", &self.beneficiary_iban)
    }

    /// Copy with empty optional fields dropped, so they are left out of the body
    pub(crate) fn without_empty_fields(&self) -> Self {
        Self {
            beneficiary_bic: self.beneficiary_bic.clone(),
            currency: self.currency.clone(),
            beneficiary_iban: self.beneficiary_iban.clone(),
            correspondent_bic: non_blank(&self.correspondent_bic),
            correspondent_account: non_blank(&self.correspondent_account),
            beneficiary_owner: non_blank(&self.beneficiary_owner),
            beneficiary_country: non_blank(&self.beneficiary_country),
            beneficiary_region: non_blank(&self.beneficiary_region),
            sender_bic: non_blank(&self.sender_bic),
            sender_correspondent_bic: non_blank(&self.sender_correspondent_bic),
        }
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResult {
    /// Beneficiary BIC outcome
    pub beneficiary_bic: FieldOutcome,
    /// Beneficiary IBAN outcome
    #[serde(default)]
    pub beneficiary_iban: Option<FieldOutcome>,
    /// Correspondent BIC outcome (present when a correspondent was sent)
    #[serde(default)]
    pub correspondent_bic: Option<FieldOutcome>,
    /// Estimated delivery time
    pub avg_business_days: i64,
    /// Correspondents the beneficiary bank accepts for this currency
    pub available_correspondents: Vec<AvailableCorrespondent>,
}

/// Outcome of one validated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    /// Outcome
    pub status: FieldStatus,
    /// Explanation
    #[serde(default)]
    pub details: Option<String>,
}

/// Correspondent suggested by `validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableCorrespondent {
    /// Correspondent BIC
    #[serde(rename = "corresBIC")]
    pub corres_bic: String,
    /// Preferred by the beneficiary bank
    pub is_preferred: bool,
}

// =========================================================================
// SSI
// =========================================================================

/// Standard Settlement Instructions lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsiRequest {
    /// Bank BIC
    pub swift: String,
    /// ISO 4217 currency code
    pub currency: String,
}

impl SsiRequest {
    /// Create request
    pub fn new(swift: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            swift: swift.into(),
            currency: currency.into(),
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        require("swift", &self.swift)?;
        require("currency", &self.currency)
    }

    pub(crate) fn query(&self) -> Vec<(String, String)> {
        vec![
            ("swift".to_string(), self.swift.clone()),
            ("currency".to_string(), self.currency.clone()),
        ]
    }
}

/// SSI lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsiResult {
    /// Correspondent banks, in the order the service returns them
    pub correspondents: Vec<SsiCorrespondent>,
    /// Currencies the bank settles in
    pub currencies: BTreeSet<String>,
    /// API usage limits
    #[serde(default)]
    pub limits: Option<Limits>,
}

impl SsiResult {
    /// Correspondent marked as preferred, if any
    pub fn preferred(&self) -> Option<&SsiCorrespondent> {
        self.correspondents.iter().find(|c| c.is_preferred)
    }
}

/// Correspondent account from an SSI lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsiCorrespondent {
    /// Record ID
    pub id: i64,
    /// Correspondent bank name
    pub bank: String,
    /// Correspondent BIC
    pub swift: String,
    /// ISO 4217 currency code
    pub currency: String,
    /// Account number
    pub account: String,
    /// Preferred correspondent
    pub is_preferred: bool,
}

// =========================================================================
// CHANGE
// =========================================================================

/// Status report from a financial institution in the payment chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRequest {
    /// Unique End-to-end Transaction Reference
    pub uetr: String,
    /// Transaction amount
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Value date
    pub date: NaiveDate,
    /// ISO 4217 currency code
    pub currency: String,
    /// Reported status
    pub status: ChangeStatus,
    /// Reporter's role
    pub role: Role,
    /// Reporter's BIC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift: Option<String>,
    /// Next bank name in the chain
    #[serde(rename = "nextName", skip_serializing_if = "Option::is_none")]
    pub next_name: Option<String>,
    /// Next bank BIC in the chain
    #[serde(rename = "nextSwift", skip_serializing_if = "Option::is_none")]
    pub next_swift: Option<String>,
    /// Free-text message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Free-text details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ChangeRequest {
    /// Create request with the required fields
    pub fn new(
        uetr: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        currency: impl Into<String>,
        status: ChangeStatus,
        role: Role,
    ) -> Self {
        Self {
            uetr: uetr.into(),
            amount,
            date,
            currency: currency.into(),
            status,
            role,
            swift: None,
            next_name: None,
            next_swift: None,
            message: None,
            details: None,
        }
    }

    /// Set reporter's BIC
    pub fn swift(mut self, swift: impl Into<String>) -> Self {
        self.swift = Some(swift.into());
        self
    }

    /// Set next bank in the chain
    pub fn next_bank(mut self, name: impl Into<String>, swift: impl Into<String>) -> Self {
        self.next_name = Some(name.into());
        self.next_swift = Some(swift.into());
        self
    }

    /// Set free-text message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set free-text details
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        require("uetr", &self.uetr)?;
        require("currency", &self.currency)
    }

    /// Copy with empty optional fields dropped, so they are left out of the body
    pub(crate) fn without_empty_fields(&self) -> Self {
        Self {
            swift: non_blank(&self.swift),
            next_name: non_blank(&self.next_name),
            next_swift: non_blank(&self.next_swift),
            message: non_blank(&self.message),
            details: non_blank(&self.details),
            ..self.clone()
        }
    }
}

/// Acknowledgement of a `change` report
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeAck {
    /// Confirmation message, when the service sends one
    pub message: Option<String>,
    /// Response body as returned (`Null` when empty)
    pub body: serde_json::Value,
}

impl ChangeAck {
    pub(crate) fn from_body(body: serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string);
        Self { message, body }
    }
}

// =========================================================================
// HELPERS
// =========================================================================

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn non_blank(field: &Option<String>) -> Option<String> {
    field.clone().filter(|v| !v.trim().is_empty())
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", name)));
    }
    Ok(())
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `YYYY-MM-DD` or a date-time whose date part is kept
fn date_or_datetime<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}
