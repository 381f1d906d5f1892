//! Transaction data structures submitted through the fraud check form

use serde::{Deserialize, Serialize};

/// Customer gender as offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Label handed to the gender encoder.
    ///
    /// This is the text shown in the form, not a shortened code.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Raw attributes of a single transaction submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Merchant name (free-form)
    pub merchant: String,

    /// Merchant category (free-form, e.g. "grocery")
    pub category: String,

    /// Transaction amount
    pub amount: f64,

    /// Where the customer is
    pub customer_location: Coordinates,

    /// Where the merchant is
    pub merchant_location: Coordinates,

    /// Hour of day (0-23)
    pub hour: u32,

    /// Day of month (1-31)
    pub day: u32,

    /// Month (1-12)
    pub month: u32,

    pub gender: Gender,

    /// Card number, treated as an opaque label
    pub card_identifier: String,
}

impl TransactionInput {
    /// Create a transaction with the form's default location, time and amount
    pub fn new(merchant: &str, category: &str, card_identifier: &str) -> Self {
        Self {
            merchant: merchant.to_string(),
            category: category.to_string(),
            card_identifier: card_identifier.to_string(),
            ..Self::default()
        }
    }

    /// Names of the required text fields that were left empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.merchant.is_empty() {
            missing.push("merchant");
        }
        if self.category.is_empty() {
            missing.push("category");
        }
        if self.card_identifier.is_empty() {
            missing.push("card_identifier");
        }
        missing
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self {
            merchant: String::new(),
            category: String::new(),
            amount: 100.0,
            customer_location: Coordinates::new(40.7128, -74.0060),
            merchant_location: Coordinates::new(40.7589, -73.9851),
            hour: 12,
            day: 15,
            month: 6,
            gender: Gender::Male,
            card_identifier: String::new(),
        }
    }
}
