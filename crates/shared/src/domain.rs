use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                Ok(Self(RemoteId::deserialize(deserializer)?.into_string()))
            }
        }

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// Ids are opaque strings here, but some resource routes hand them back as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Text(String),
    Int(i64),
}

impl RemoteId {
    fn into_string(self) -> String {
        match self {
            Self::Text(v) => v,
            Self::Int(v) => v.to_string(),
        }
    }
}

id_newtype!(InvoiceId);
id_newtype!(CustomerId);
id_newtype!(UserId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Strict parse used for form input.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Listing rows treat anything that is not `paid` as pending.
    pub fn normalize(raw: &str) -> Self {
        if raw == "paid" {
            Self::Paid
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money in integer minor units.
///
/// The resource API stores and transmits amounts in cents. Conversion to decimal dollars
/// happens only for edit forms ([`Cents::to_dollars`]) and to strings only through
/// [`crate::money::format_currency`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    /// Rounds to the nearest cent; `None` when the result does not fit in `i64` cents.
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        round_to_i64(dollars * 100.0).map(Self)
    }

    pub fn to_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match LenientNumber::deserialize(deserializer)? {
            LenientNumber::Int(v) => Ok(Cents(v)),
            LenientNumber::Float(v) => round_to_i64(v)
                .map(Cents)
                .ok_or_else(|| de::Error::custom(format!("amount out of range: {v}"))),
            LenientNumber::Text(raw) => parse_numeric_text(&raw)
                .map(Cents)
                .ok_or_else(|| de::Error::custom(format!("amount is not numeric: {raw:?}"))),
        }
    }
}

/// Numbers the resource API sends either as JSON numbers or as numeric strings
/// (aggregate columns come back as text).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    /// `None` for text that is not a number and for values outside the `i64` range.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => round_to_i64(*v),
            Self::Text(raw) => parse_numeric_text(raw),
        }
    }
}

fn parse_numeric_text(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    raw.parse::<f64>().ok().and_then(round_to_i64)
}

/// `i64::MAX as f64` is 2^63, one past the largest `i64`, so the upper bound is exclusive.
fn round_to_i64(value: f64) -> Option<i64> {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
