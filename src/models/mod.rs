//! Model and encoder artifacts

pub mod encoder;
pub mod inference;
pub mod loader;

pub use encoder::{LabelEncoder, LabelEncoders, UNSEEN_LABEL};
pub use inference::{OnnxScorer, Scorer};
pub use loader::ModelLoader;
