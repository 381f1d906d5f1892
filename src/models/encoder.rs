//! Label encoders for the categorical transaction fields

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Code assigned to any label the encoder was not fitted on
pub const UNSEEN_LABEL: i64 = -1;

/// Categorical fields that go through a label encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Merchant,
    Category,
    Gender,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::Merchant,
        CategoricalField::Category,
        CategoricalField::Gender,
    ];

    /// Key of the field in the encoder artifact
    pub fn key(&self) -> &'static str {
        match self {
            CategoricalField::Merchant => "merchant",
            CategoricalField::Category => "category",
            CategoricalField::Gender => "gender",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fixed label → code mapping for one field.
///
/// Built from the ordered class list of a fitted encoder; a label's code is
/// its position in that list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct LabelEncoder {
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = classes
            .into_iter()
            .enumerate()
            .map(|(code, label)| (label.into(), code as i64))
            .collect();
        Self { codes }
    }

    /// Code for `label`, or [`UNSEEN_LABEL`] if the encoder never saw it
    pub fn encode(&self, label: &str) -> i64 {
        self.codes.get(label).copied().unwrap_or(UNSEEN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl From<Vec<String>> for LabelEncoder {
    fn from(classes: Vec<String>) -> Self {
        Self::new(classes)
    }
}

/// One encoder per categorical field, as loaded from the encoder artifact
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelEncoders {
    pub merchant: LabelEncoder,
    pub category: LabelEncoder,
    pub gender: LabelEncoder,
}

impl LabelEncoders {
    pub fn get(&self, field: CategoricalField) -> &LabelEncoder {
        match field {
            CategoricalField::Merchant => &self.merchant,
            CategoricalField::Category => &self.category,
            CategoricalField::Gender => &self.gender,
        }
    }

    pub fn encode(&self, field: CategoricalField, label: &str) -> i64 {
        self.get(field).encode(label)
    }
}
