//! Fraud classifier inference

use crate::feature_extractor::FeatureVector;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::verdict::Verdict;
use anyhow::{anyhow, Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Pre-trained binary classifier.
///
/// Implementations are loaded once and shared read-only between submissions.
pub trait Scorer: Send + Sync {
    /// Classify one feature vector
    fn score(&self, features: &FeatureVector) -> Result<Verdict>;

    /// Model name for logging
    fn name(&self) -> &str;
}

/// Scorer backed by an ONNX Runtime session
pub struct OnnxScorer {
    name: String,
    /// Sessions need exclusive access to run
    model: Mutex<LoadedModel>,
}

impl OnnxScorer {
    /// Load the classifier from an ONNX file
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let loader = ModelLoader::with_threads(onnx_threads)?;
        let model = loader.load_model(path)?;
        Ok(Self::new(model))
    }

    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }

    fn run(model: &mut LoadedModel, features: &FeatureVector) -> Result<Verdict> {
        let row = features.to_model_input();
        let shape = vec![1_i64, row.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, row.to_vec())).context("Failed to create input tensor")?;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        let label = model
            .label_output
            .as_deref()
            .and_then(|name| outputs.get(name));
        let probability = model
            .probability_output
            .as_deref()
            .and_then(|name| outputs.get(name));

        read_verdict(&model.name, label, probability)
    }
}

impl Scorer for OnnxScorer {
    fn score(&self, features: &FeatureVector) -> Result<Verdict> {
        let mut guard = self
            .model
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        let model: &mut LoadedModel = &mut guard;
        Self::run(model, features)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pick the verdict from the model outputs, preferring the predicted label
fn read_verdict(
    model_name: &str,
    label: Option<&DynValue>,
    probability: Option<&DynValue>,
) -> Result<Verdict> {
    if let Some(output) = label {
        if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
            if let Some(&label) = labels.first() {
                debug!(model = %model_name, label, "Extracted label");
                return Ok(Verdict::from_label(label));
            }
        }
    }

    if let Some(output) = probability {
        let probability = extract_fraud_probability(output)?;
        debug!(model = %model_name, probability, "Extracted fraud probability");
        return Ok(Verdict::from_probability(probability));
    }

    Err(anyhow!("Model {} produced no usable output", model_name))
}

/// Read the fraud-class probability from a probabilities output.
///
/// Handles plain `[batch, classes]` tensors and the `seq(map(int64, float))`
/// layout that gradient boosting exports use.
fn extract_fraud_probability(output: &DynValue) -> Result<f64> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        let classes = dims.last().copied().unwrap_or(1);
        let probability = if classes >= 2 {
            data.get(1)
        } else {
            data.first()
        };
        return probability
            .map(|&p| p as f64)
            .ok_or_else(|| anyhow!("Empty probability tensor"));
    }

    if !DynSequenceValueType::can_downcast(&output.dtype()) {
        return Err(anyhow!("Unsupported probability output type"));
    }

    let allocator = Allocator::default();
    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;
    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    let first = maps.first().ok_or_else(|| anyhow!("Empty probability sequence"))?;
    let class_probabilities = first.try_extract_key_values::<i64, f32>()?;

    if let Some((_, p)) = class_probabilities.iter().find(|(class, _)| *class == 1) {
        return Ok(*p as f64);
    }
    if let Some((_, p)) = class_probabilities.iter().find(|(class, _)| *class == 0) {
        return Ok(1.0 - *p as f64);
    }

    Err(anyhow!("No class probability found in map"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ort::value::{Map, Sequence};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scorer that returns a fixed verdict and counts its calls
    pub(crate) struct StubScorer {
        verdict: Verdict,
        calls: AtomicUsize,
    }

    impl StubScorer {
        pub(crate) fn new(verdict: Verdict) -> Self {
            Self {
                verdict,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Scorer for StubScorer {
        fn score(&self, _features: &FeatureVector) -> Result<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.verdict)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Scorer that always fails
    pub(crate) struct FailingScorer;

    impl Scorer for FailingScorer {
        fn score(&self, _features: &FeatureVector) -> Result<Verdict> {
            Err(anyhow!("session run failed"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn probabilities(shape: Vec<i64>, data: Vec<f32>) -> DynValue {
        Tensor::from_array((shape, data)).unwrap().into_dyn()
    }

    fn labels(data: Vec<i64>) -> DynValue {
        Tensor::from_array((vec![data.len() as i64], data))
            .unwrap()
            .into_dyn()
    }

    #[test]
    fn test_fraud_probability_from_class_columns() {
        let output = probabilities(vec![1, 2], vec![0.3, 0.7]);
        let p = extract_fraud_probability(&output).unwrap();
        assert!((p - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_fraud_probability_from_single_column() {
        let output = probabilities(vec![1, 1], vec![0.25]);
        let p = extract_fraud_probability(&output).unwrap();
        assert!((p - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_empty_probability_tensor_is_an_error() {
        let output = probabilities(vec![1, 0], Vec::new());
        let err = extract_fraud_probability(&output).unwrap_err();
        assert!(err.to_string().contains("Empty probability tensor"));
    }

    #[test]
    fn test_fraud_probability_from_sequence_of_maps() {
        let map = Map::<i64, f32>::new([(0_i64, 0.2_f32), (1, 0.8)]).unwrap();
        let output = Sequence::new(vec![map]).unwrap().into_dyn();

        let p = extract_fraud_probability(&output).unwrap();
        assert!((p - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_label_output_preferred() {
        let label = labels(vec![0]);
        let probability = probabilities(vec![1, 2], vec![0.1, 0.9]);

        let verdict = read_verdict("model", Some(&label), Some(&probability)).unwrap();
        assert_eq!(verdict, Verdict::Legitimate);
    }

    #[test]
    fn test_probability_fallback() {
        let probability = probabilities(vec![1, 2], vec![0.1, 0.9]);
        assert_eq!(
            read_verdict("model", None, Some(&probability)).unwrap(),
            Verdict::Fraudulent
        );

        let tie = probabilities(vec![1, 2], vec![0.5, 0.5]);
        assert_eq!(
            read_verdict("model", None, Some(&tie)).unwrap(),
            Verdict::Legitimate
        );
    }

    #[test]
    fn test_no_usable_output() {
        let err = read_verdict("model", None, None).unwrap_err();
        assert!(err.to_string().contains("produced no usable output"));
    }

    #[test]
    fn test_stub_scorer_counts_calls() {
        let scorer = StubScorer::new(Verdict::Fraudulent);
        let features = FeatureVector {
            merchant_code: -1,
            category_code: -1,
            amount: 1.0,
            distance_km: 0.0,
            hour: 0,
            day: 1,
            month: 1,
            gender_code: -1,
            card_bucket: 0,
        };

        assert_eq!(scorer.score(&features).unwrap(), Verdict::Fraudulent);
        assert_eq!(scorer.calls(), 1);
        assert!(FailingScorer.score(&features).is_err());
    }
}
