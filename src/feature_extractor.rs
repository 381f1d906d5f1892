//! Feature preparation for fraud model inference.
//!
//! Turns a submitted transaction into the fixed-order feature record the
//! classifier was trained on.

use crate::geo;
use crate::models::encoder::{CategoricalField, LabelEncoders};
use crate::types::transaction::TransactionInput;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Number of buckets card identifiers are hashed into
pub const CARD_BUCKETS: u64 = 100;

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; 9] = [
    "merchant", "category", "amt", "distance", "hour", "day", "month", "gender", "cc_num",
];

/// Model-ready features for one transaction.
///
/// Field order follows [`FEATURE_NAMES`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub merchant_code: i64,
    pub category_code: i64,
    pub amount: f64,
    pub distance_km: f64,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub gender_code: i64,
    pub card_bucket: u8,
}

impl FeatureVector {
    /// Flatten into the `f32` row fed to the model
    pub fn to_model_input(&self) -> [f32; 9] {
        [
            self.merchant_code as f32,
            self.category_code as f32,
            self.amount as f32,
            self.distance_km as f32,
            self.hour as f32,
            self.day as f32,
            self.month as f32,
            self.gender_code as f32,
            self.card_bucket as f32,
        ]
    }
}

/// Hash a card identifier into `[0, CARD_BUCKETS)`.
///
/// Uses the first eight bytes of the SHA-256 digest, so the bucket is the same
/// across processes and restarts.
pub fn card_bucket(card_identifier: &str) -> u8 {
    let digest = Sha256::digest(card_identifier.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % CARD_BUCKETS) as u8
}

/// Prepares feature vectors using encoders fixed at load time
#[derive(Clone)]
pub struct FeaturePreparer {
    encoders: Arc<LabelEncoders>,
}

impl FeaturePreparer {
    pub fn new(encoders: Arc<LabelEncoders>) -> Self {
        Self { encoders }
    }

    /// Build the feature vector for a transaction.
    ///
    /// Unknown merchants, categories and genders encode to the sentinel code
    /// and never fail.
    pub fn prepare(&self, tx: &TransactionInput) -> FeatureVector {
        let distance_km = geo::distance_km(&tx.customer_location, &tx.merchant_location);

        FeatureVector {
            merchant_code: self.encoders.encode(CategoricalField::Merchant, &tx.merchant),
            category_code: self.encoders.encode(CategoricalField::Category, &tx.category),
            amount: tx.amount,
            distance_km,
            hour: tx.hour,
            day: tx.day,
            month: tx.month,
            gender_code: self.encoders.encode(CategoricalField::Gender, tx.gender.label()),
            card_bucket: card_bucket(&tx.card_identifier),
        }
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::encoder::{LabelEncoder, UNSEEN_LABEL};
    use crate::types::transaction::Gender;

    fn preparer() -> FeaturePreparer {
        FeaturePreparer::new(Arc::new(LabelEncoders {
            merchant: LabelEncoder::new(["BookStore", "CoffeeShop"]),
            category: LabelEncoder::new(["entertainment", "grocery"]),
            gender: LabelEncoder::new(["Female", "Male"]),
        }))
    }

    #[test]
    fn test_prepare_known_labels() {
        let tx = TransactionInput::new("CoffeeShop", "grocery", "4111111111111111");
        let features = preparer().prepare(&tx);

        assert_eq!(features.merchant_code, 1);
        assert_eq!(features.category_code, 1);
        assert_eq!(features.gender_code, 1);
        assert_eq!(features.amount, 100.0);
        assert_eq!((features.hour, features.day, features.month), (12, 15, 6));
        assert!(features.distance_km > 5.3 && features.distance_km < 5.5);
        assert_eq!(features.card_bucket, card_bucket("4111111111111111"));
    }

    #[test]
    fn test_prepare_unseen_labels() {
        let mut tx = TransactionInput::new("Unknown Diner", "travel", "4111111111111111");
        tx.gender = Gender::Female;
        let features = FeaturePreparer::new(Arc::new(LabelEncoders::default())).prepare(&tx);

        assert_eq!(features.merchant_code, UNSEEN_LABEL);
        assert_eq!(features.category_code, UNSEEN_LABEL);
        assert_eq!(features.gender_code, UNSEEN_LABEL);
    }

    #[test]
    fn test_model_input_order() {
        let tx = TransactionInput {
            amount: 42.5,
            hour: 3,
            day: 9,
            month: 11,
            ..TransactionInput::new("BookStore", "entertainment", "card")
        };
        let features = preparer().prepare(&tx);
        let row = features.to_model_input();

        assert_eq!(row.len(), FEATURE_NAMES.len());
        assert_eq!(row[0], 0.0);
        assert_eq!(row[1], 0.0);
        assert_eq!(row[2], 42.5);
        assert_eq!(row[3], features.distance_km as f32);
        assert_eq!(row[4..7], [3.0_f32, 9.0, 11.0]);
        assert_eq!(row[7], 1.0);
        assert_eq!(row[8], features.card_bucket as f32);
    }

    #[test]
    fn test_card_bucket_range() {
        let long = "9".repeat(4096);
        for card in ["", "4111111111111111", "5500 0000 0000 0004", "😀", long.as_str()] {
            assert!((card_bucket(card) as u64) < CARD_BUCKETS);
        }
    }

    #[test]
    fn test_card_bucket_deterministic() {
        assert_eq!(card_bucket("4111111111111111"), card_bucket("4111111111111111"));
        assert_eq!(card_bucket(""), card_bucket(""));
    }

    #[test]
    fn test_feature_count() {
        assert_eq!(preparer().feature_count(), 9);
    }
}
