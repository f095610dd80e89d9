//! Wallet types: spendable balance, payment parameters and payment records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::CurrencyCode;
use crate::de::null_as_default;
use crate::error::ParseEnumError;

/// Request body for the spendable-balance endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
    /// Currency in which the fiat balance is expressed.
    pub currency_code: CurrencyCode,
}

/// The amount the app may still spend on the user's behalf.
///
/// `currency_code` is kept as sent by the server; [`SpendableBalance::currency`]
/// maps it onto [`CurrencyCode`] when it is one of the known codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpendableBalance {
    /// Spendable amount in satoshis.
    #[serde(deserialize_with = "null_as_default")]
    pub spendable_satoshi_balance: u64,
    /// Spendable amount in `currency_code`.
    #[serde(deserialize_with = "null_as_default")]
    pub spendable_fiat_balance: f64,
    /// Currency of `spendable_fiat_balance`.
    #[serde(deserialize_with = "null_as_default")]
    pub currency_code: String,
}

impl SpendableBalance {
    /// Returns the fiat currency, or `None` for a code this crate does not know.
    #[must_use]
    pub fn currency(&self) -> Option<CurrencyCode> {
        self.currency_code.parse().ok()
    }
}

/// Action label attached to a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppAction {
    /// `tip-group`
    TipGroup,
    /// `publish`
    Publish,
    /// `like`
    Like,
}

impl AppAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TipGroup => "tip-group",
            Self::Publish => "publish",
            Self::Like => "like",
        }
    }
}

impl fmt::Display for AppAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tip-group" => Ok(Self::TipGroup),
            "publish" => Ok(Self::Publish),
            "like" => Ok(Self::Like),
            _ => Err(ParseEnumError::new("app action", s)),
        }
    }
}

/// Encoding of an [`Attachment`] value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentFormat {
    /// Base64-encoded bytes.
    Base64,
    /// Hex-encoded bytes.
    Hex,
    /// Arbitrary JSON.
    #[default]
    Json,
}

/// Extra data written alongside a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    /// How `value` is encoded.
    #[serde(deserialize_with = "null_as_default")]
    pub format: AttachmentFormat,
    /// The attached data.
    pub value: Value,
}

/// One receiver of a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Handle, paymail or address of the receiver.
    pub to: String,
    /// Currency of `amount`.
    pub currency_code: CurrencyCode,
    /// Amount to send.
    pub amount: f64,
}

impl Payment {
    /// Creates a payment to `to`.
    #[must_use]
    pub fn new(to: impl Into<String>, amount: f64, currency_code: CurrencyCode) -> Self {
        Self {
            to: to.into(),
            currency_code,
            amount,
        }
    }
}

/// Request body for the pay endpoint.
///
/// # Example
///
/// ```rust
/// use handcash::CurrencyCode;
/// use handcash::wallet::{AppAction, PayParameters, Payment};
///
/// let params = PayParameters::new()
///     .with_description("Thanks dude!")
///     .with_app_action(AppAction::Like)
///     .with_receiver(Payment::new("mrz@moneybutton.com", 0.01, CurrencyCode::Usd));
/// assert_eq!(params.receivers.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayParameters {
    /// Note shown to the receivers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Action label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_action: Option<AppAction>,
    /// Extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Receivers of the payment. Must not be empty.
    #[serde(default)]
    pub receivers: Vec<Payment>,
}

impl PayParameters {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the app action.
    #[must_use]
    pub const fn with_app_action(mut self, app_action: AppAction) -> Self {
        self.app_action = Some(app_action);
        self
    }

    /// Sets the attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Adds a receiver.
    #[must_use]
    pub fn with_receiver(mut self, payment: Payment) -> Self {
        self.receivers.push(payment);
        self
    }
}

/// Request body for fetching a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Transaction id of the payment.
    pub transaction_id: String,
}

/// Direction of a payment from the user's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Sent by the user.
    #[default]
    Send,
    /// Received by the user.
    Receive,
}

impl FromStr for PaymentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "send" => Ok(Self::Send),
            "receive" => Ok(Self::Receive),
            _ => Err(ParseEnumError::new("payment type", s)),
        }
    }
}

/// Kind of payment participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    /// A HandCash user.
    #[default]
    User,
    /// A paymail address.
    Paymail,
    /// A raw address.
    Address,
}

impl FromStr for ParticipantType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "paymail" => Ok(Self::Paymail),
            "address" => Ok(Self::Address),
            _ => Err(ParseEnumError::new("participant type", s)),
        }
    }
}

/// Counterparty of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    /// Kind of participant (`user`, `paymail`, `address`), as sent.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub participant_type: String,
    /// Handle or address.
    #[serde(deserialize_with = "null_as_default")]
    pub alias: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Profile picture URL.
    #[serde(deserialize_with = "null_as_default")]
    pub profile_picture_url: String,
    /// Reply left by the participant.
    #[serde(deserialize_with = "null_as_default")]
    pub response_note: String,
}

impl Participant {
    /// Parsed participant kind, `None` if the server sent an unknown one.
    #[must_use]
    pub fn kind(&self) -> Option<ParticipantType> {
        self.participant_type.parse().ok()
    }
}

/// A payment as returned by the pay and payment endpoints.
///
/// Codes and labels are kept as the server sent them so that a payment that
/// went through always decodes; the accessor methods give typed views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentResponse {
    /// Bitcoin SV transaction id.
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_id: String,
    /// Description entered by the payer.
    #[serde(deserialize_with = "null_as_default")]
    pub note: String,
    /// Direction of the payment (`send`, `receive`), as sent.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub payment_type: String,
    /// Unix time, seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub time: u64,
    /// Network fee in satoshis.
    #[serde(deserialize_with = "null_as_default")]
    pub satoshi_fees: u64,
    /// Amount in satoshis.
    #[serde(deserialize_with = "null_as_default")]
    pub satoshi_amount: u64,
    /// Exchange rate used for the fiat conversion.
    #[serde(deserialize_with = "null_as_default")]
    pub fiat_exchange_rate: f64,
    /// Fiat currency of the conversion, as sent.
    #[serde(deserialize_with = "null_as_default")]
    pub fiat_currency_code: String,
    /// Counterparties.
    #[serde(deserialize_with = "null_as_default")]
    pub participants: Vec<Participant>,
    /// Attachments written with the payment.
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
    /// Action label, empty when none was set.
    #[serde(deserialize_with = "null_as_default")]
    pub app_action: String,
}

impl PaymentResponse {
    /// Parsed direction, `None` if the server sent an unknown one.
    #[must_use]
    pub fn direction(&self) -> Option<PaymentType> {
        self.payment_type.parse().ok()
    }

    /// Parsed fiat currency, `None` for a code this crate does not know.
    #[must_use]
    pub fn fiat_currency(&self) -> Option<CurrencyCode> {
        self.fiat_currency_code.parse().ok()
    }

    /// Parsed action label, `None` when absent or unknown.
    #[must_use]
    pub fn action(&self) -> Option<AppAction> {
        self.app_action.parse().ok()
    }
}
