//! Loader for the model and encoder artifacts

use crate::models::encoder::{CategoricalField, LabelEncoders};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Loaded ONNX classifier with its tensor names
pub struct LoadedModel {
    /// Model name (file stem)
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature row
    pub input_name: String,
    /// Output holding the predicted class label, if the export has one
    pub label_output: Option<String>,
    /// Output holding class probabilities, if the export has one
    pub probability_output: Option<String>,
}

/// Loads artifacts produced by the training process
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the fraud classifier from an ONNX file
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        if label_output.is_none() && probability_output.is_none() {
            warn!(model = %name, "Model exposes neither a label nor a probability output");
        }

        info!(
            model = %name,
            input = %input_name,
            label_output = ?label_output,
            probability_output = ?probability_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name,
            session,
            input_name,
            label_output,
            probability_output,
        })
    }
}

/// Read the encoder artifact: a JSON object mapping each categorical field to
/// its ordered class list.
pub fn load_encoders<P: AsRef<Path>>(path: P) -> Result<LabelEncoders> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read label encoders from {}", path.display()))?;
    let encoders: LabelEncoders = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse label encoders in {}", path.display()))?;

    for field in CategoricalField::ALL {
        let classes = encoders.get(field).len();
        if classes == 0 {
            warn!(field = %field, "Encoder has no classes, every label will use the sentinel");
        }
        info!(field = %field, classes, "Label encoder loaded");
    }

    Ok(encoders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_encoders() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"merchant": ["CoffeeShop"], "category": ["grocery", "travel"], "gender": ["Female", "Male"]}}"#
        )
        .unwrap();

        let encoders = load_encoders(file.path()).unwrap();
        assert_eq!(encoders.encode(CategoricalField::Merchant, "CoffeeShop"), 0);
        assert_eq!(encoders.encode(CategoricalField::Category, "travel"), 1);
        assert_eq!(encoders.gender.len(), 2);
    }

    #[test]
    fn test_load_encoders_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_encoders(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read label encoders"));
    }

    #[test]
    fn test_load_encoders_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"merchant": "not a list"}}"#).unwrap();

        let err = load_encoders(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse label encoders"));
    }
}
