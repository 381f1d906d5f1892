//! Submitted form fields

use crate::checker::CheckError;
use crate::geo;
use crate::types::transaction::{Coordinates, Gender, TransactionInput};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// URL-encoded body of the fraud check form.
///
/// Omitted fields take the form defaults, so a missing text field reaches
/// validation instead of failing extraction. Numeric fields that are blank or
/// not a number come through as `None`. An unticked voice checkbox is simply
/// absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckForm {
    pub merchant: String,
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub amount: Option<f64>,
    pub cc_num: String,
    #[serde(deserialize_with = "number")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub long: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub merch_lat: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub merch_long: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub hour: Option<u32>,
    #[serde(deserialize_with = "number")]
    pub day: Option<u32>,
    #[serde(deserialize_with = "number")]
    pub month: Option<u32>,
    pub gender: Gender,
    /// Checkbox value; absent when unticked
    pub voice: Option<String>,
}

/// Parse a numeric form value, mapping blank or malformed input to `None`
fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().ok())
}

impl CheckForm {
    /// Blank form with the voice checkbox in its configured state
    pub fn with_voice(enabled: bool) -> Self {
        Self {
            voice: enabled.then(|| "on".to_string()),
            ..Self::default()
        }
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice.is_some()
    }

    pub fn customer_location(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.long?))
    }

    pub fn merchant_location(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.merch_lat?, self.merch_long?))
    }

    /// Distance shown under the form, if all four coordinates are filled in
    pub fn distance_km(&self) -> Option<f64> {
        Some(geo::distance_km(
            &self.customer_location()?,
            &self.merchant_location()?,
        ))
    }

    /// Numeric fields left blank or not holding a number, in form order
    pub fn invalid_numbers(&self) -> Vec<&'static str> {
        let floats = [
            ("amount", self.amount),
            ("lat", self.lat),
            ("long", self.long),
            ("merch_lat", self.merch_lat),
            ("merch_long", self.merch_long),
        ];
        let integers = [("hour", self.hour), ("day", self.day), ("month", self.month)];

        floats
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .chain(
                integers
                    .iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| *name),
            )
            .collect()
    }

    /// Convert into a transaction, keeping text exactly as typed.
    ///
    /// Missing text fields are reported ahead of unusable numbers.
    pub fn to_transaction(&self) -> Result<TransactionInput, CheckError> {
        let defaults = TransactionInput::default();
        let tx = TransactionInput {
            merchant: self.merchant.clone(),
            category: self.category.clone(),
            amount: self.amount.unwrap_or(defaults.amount),
            customer_location: self
                .customer_location()
                .unwrap_or(defaults.customer_location),
            merchant_location: self
                .merchant_location()
                .unwrap_or(defaults.merchant_location),
            hour: self.hour.unwrap_or(defaults.hour),
            day: self.day.unwrap_or(defaults.day),
            month: self.month.unwrap_or(defaults.month),
            gender: self.gender,
            card_identifier: self.cc_num.clone(),
        };

        let invalid = self.invalid_numbers();
        if invalid.is_empty() {
            return Ok(tx);
        }

        let missing = tx.missing_fields();
        if missing.is_empty() {
            Err(CheckError::InvalidNumbers(invalid))
        } else {
            Err(CheckError::MissingFields(missing))
        }
    }
}

impl Default for CheckForm {
    fn default() -> Self {
        let tx = TransactionInput::default();
        Self {
            merchant: tx.merchant,
            category: tx.category,
            amount: Some(tx.amount),
            cc_num: tx.card_identifier,
            lat: Some(tx.customer_location.latitude),
            long: Some(tx.customer_location.longitude),
            merch_lat: Some(tx.merchant_location.latitude),
            merch_long: Some(tx.merchant_location.longitude),
            hour: Some(tx.hour),
            day: Some(tx.day),
            month: Some(tx.month),
            gender: tx.gender,
            voice: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_transaction() {
        let form = CheckForm {
            merchant: "CoffeeShop".to_string(),
            category: "grocery".to_string(),
            cc_num: "4111111111111111".to_string(),
            gender: Gender::Female,
            ..CheckForm::default()
        };
        let tx = form.to_transaction().unwrap();

        assert_eq!(tx.merchant, "CoffeeShop");
        assert_eq!(tx.card_identifier, "4111111111111111");
        assert_eq!(tx.gender, Gender::Female);
        assert_eq!(tx.customer_location, Coordinates::new(40.7128, -74.0060));
        assert_eq!(tx.merchant_location, Coordinates::new(40.7589, -73.9851));
    }

    #[test]
    fn test_voice_checkbox() {
        assert!(CheckForm::with_voice(true).voice_enabled());
        assert!(!CheckForm::with_voice(false).voice_enabled());
    }

    #[test]
    fn test_invalid_numbers_in_form_order() {
        let form = CheckForm {
            amount: None,
            lat: None,
            hour: None,
            ..CheckForm::default()
        };

        assert_eq!(form.invalid_numbers(), vec!["amount", "lat", "hour"]);
        assert_eq!(form.customer_location(), None);
        assert_eq!(form.distance_km(), None);
        assert!(CheckForm::default().invalid_numbers().is_empty());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let form = CheckForm {
            merchant: "CoffeeShop".to_string(),
            category: "grocery".to_string(),
            cc_num: "4111".to_string(),
            amount: None,
            month: None,
            ..CheckForm::default()
        };

        let err = form.to_transaction().unwrap_err();
        assert!(matches!(&err, CheckError::InvalidNumbers(fields) if fields == &["amount", "month"]));
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_text_reported_before_numbers() {
        let form = CheckForm {
            category: "grocery".to_string(),
            cc_num: "4111".to_string(),
            amount: None,
            ..CheckForm::default()
        };

        let err = form.to_transaction().unwrap_err();
        assert!(matches!(&err, CheckError::MissingFields(fields) if fields == &["merchant"]));
    }
}
