// ONNX session wrapper for the wheat disease model

use std::path::Path;
use std::sync::{Arc, Mutex};

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use thiserror::Error;

use super::labels::{label_for, CLASS_LABELS};
use super::preprocess::{image_to_tensor, INPUT_CHANNELS, INPUT_SIZE};
use crate::log_warn;

/// Errors on the decode → infer → label path. All of them collapse into the
/// same generic message at the HTTP boundary; the variant only reaches the log.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),
    #[error("model returned an empty score vector")]
    EmptyOutput,
}

/// Loaded-once model handle, shared read-mostly across requests.
///
/// ONNX Runtime's `run` takes `&mut self`, so callers share this behind
/// `Arc<Mutex<..>>` and forward passes are serialized.
pub struct WheatClassifier {
    session: Session,
    input_name: String,
    output_name: String,
    warned_class_count: bool,
}

pub type SharedClassifier = Arc<Mutex<WheatClassifier>>;

impl WheatClassifier {
    /// Build the session from the artifact on disk. Called exactly once at
    /// startup; requests never reload.
    pub fn load(model_path: &Path) -> Result<Self, ort::Error> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;

        // Tensor names come from the model metadata, not from constants
        let input_name = session.inputs()[0].name().to_string();
        let output_name = session.outputs()[0].name().to_string();

        Ok(Self {
            session,
            input_name,
            output_name,
            warned_class_count: false,
        })
    }

    /// Full per-request pipeline: decode, normalize to 1x255x255x3 in [0,1],
    /// forward pass, arg-max, label lookup.
    pub fn predict(&mut self, image_bytes: &[u8]) -> Result<String, ClassifierError> {
        let pixels = image_to_tensor(image_bytes)?;
        let shape = [
            1usize,
            INPUT_SIZE as usize,
            INPUT_SIZE as usize,
            INPUT_CHANNELS,
        ];
        let input = Tensor::from_array((shape, pixels))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input])?;
        let (_, scores) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;

        // The label table assumes 15 classes. A different artifact silently
        // lands in the fallback label, so at least make it diagnosable.
        if scores.len() != CLASS_LABELS.len() && !self.warned_class_count {
            log_warn!(
                "[MODEL] output has {} scores but the label table has {} entries",
                scores.len(),
                CLASS_LABELS.len()
            );
            self.warned_class_count = true;
        }

        let best = argmax(scores).ok_or(ClassifierError::EmptyOutput)?;
        Ok(label_for(best).to_string())
    }
}

/// Index of the maximum score.
fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_basic() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.9]), Some(0));
    }

    #[test]
    fn test_argmax_takes_first_of_ties() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), Some(0));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_all_negative() {
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some(1));
    }
}
