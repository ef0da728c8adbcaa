//! Classification result types returned to the caller.

use std::sync::Arc;

use serde::Serialize;

/// Axis-aligned region within the source image, in pixel coordinates.
///
/// Carried for forward compatibility with detection-style models; the current
/// classification pipeline never populates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

/// One ranked classification result.
///
/// Immutable once produced; created only by the top-k selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Identifier of the recognized class (the output tensor slot index).
    /// Specific to the class, not the instance of the object.
    pub class_id: Option<usize>,
    /// Display name for the recognition.
    pub title: Option<Arc<str>>,
    /// Confidence in 0.0 to 1.0 after output normalization; higher is better.
    pub confidence: f32,
    /// Optional location of the recognized object within the source image.
    pub region: Option<Region>,
}

impl Recognition {
    /// Creates a recognition with no region.
    pub fn new(class_id: Option<usize>, title: Option<Arc<str>>, confidence: f32) -> Self {
        Self {
            class_id,
            title,
            confidence,
            region: None,
        }
    }
}

impl std::fmt::Display for Recognition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut wrote = false;
        if let Some(id) = self.class_id {
            write!(f, "[{id}]")?;
            wrote = true;
        }
        if let Some(title) = &self.title {
            if wrote {
                write!(f, " ")?;
            }
            write!(f, "{title}")?;
            wrote = true;
        }
        if wrote {
            write!(f, " ")?;
        }
        write!(f, "({:.1}%)", self.confidence * 100.0)
    }
}

/// Caller-facing parallel-array form of a ranked result list.
///
/// `class_ids[i]` and `probabilities[i]` describe the same recognition; both
/// arrays have equal length, at most the configured result budget. This is
/// the shape the host application channel expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationOutput {
    /// Class ids in descending confidence order.
    pub class_ids: Vec<usize>,
    /// Confidence scores aligned with `class_ids`.
    pub probabilities: Vec<f32>,
}

impl From<&[Recognition]> for ClassificationOutput {
    fn from(recognitions: &[Recognition]) -> Self {
        let mut class_ids = Vec::with_capacity(recognitions.len());
        let mut probabilities = Vec::with_capacity(recognitions.len());
        for recognition in recognitions {
            if let Some(id) = recognition.class_id {
                class_ids.push(id);
                probabilities.push(recognition.confidence);
            }
        }
        Self {
            class_ids,
            probabilities,
        }
    }
}
