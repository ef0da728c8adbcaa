//! The ordered label table mapping output tensor slots to class names.

use std::path::Path;
use std::sync::Arc;

use crate::core::errors::{ClassifyError, ClassifyResult};

/// Ordered, index-addressable table of class labels.
///
/// Entry `i` names the class produced at output tensor slot `i`. The table is
/// loaded once per session and immutable afterward; its length must equal the
/// model's class dimension, which is checked once at session open.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<Arc<str>>,
}

impl LabelTable {
    /// Loads a label table from a newline-separated text file.
    ///
    /// Each line becomes one label, in file order. Trailing blank lines are
    /// ignored; blank lines between labels are kept so slot indices stay
    /// aligned with the file.
    ///
    /// # Errors
    ///
    /// Returns `LabelLoad` if the file cannot be read or contains no labels.
    pub fn load(path: &Path) -> ClassifyResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClassifyError::label_load(path, "failed to read label file", Some(e)))?;

        let mut labels: Vec<Arc<str>> = content
            .lines()
            .map(|line| Arc::from(line.trim_end_matches('\r')))
            .collect();
        while labels.last().is_some_and(|label| label.is_empty()) {
            labels.pop();
        }

        if labels.is_empty() {
            return Err(ClassifyError::label_load(
                path,
                "label file contains no labels",
                None::<std::io::Error>,
            ));
        }

        Ok(Self { labels })
    }

    /// Creates a label table from labels already in memory.
    pub fn from_labels(labels: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            labels: labels
                .into_iter()
                .map(|label| Arc::from(label.as_ref()))
                .collect(),
        }
    }

    /// Returns the label at the given output slot, if in range.
    pub fn get(&self, index: usize) -> Option<&Arc<str>> {
        self.labels.get(index)
    }

    /// Number of labels in the table.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Checks the table length against the model's class dimension.
    ///
    /// # Errors
    ///
    /// Returns `LabelCountMismatch` if the lengths differ.
    pub fn validate_class_count(&self, classes: usize) -> ClassifyResult<()> {
        if self.labels.len() != classes {
            return Err(ClassifyError::LabelCountMismatch {
                labels: self.labels.len(),
                classes,
            });
        }
        Ok(())
    }

    /// Iterates over the labels in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_one_label_per_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sparrow\nrobin\nhawk").unwrap();

        let table = LabelTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).map(|l| l.as_ref()), Some("robin"));
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sparrow\nrobin\n\n\n").unwrap();

        let table = LabelTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn crlf_labels_are_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sparrow\r\nrobin\r\n").unwrap();

        let table = LabelTable::load(file.path()).unwrap();
        assert_eq!(table.get(0).map(|l| l.as_ref()), Some("sparrow"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            LabelTable::load(file.path()),
            Err(ClassifyError::LabelLoad { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = LabelTable::load(Path::new("does/not/exist.txt"));
        assert!(matches!(result, Err(ClassifyError::LabelLoad { .. })));
    }

    #[test]
    fn class_count_validation() {
        let table = LabelTable::from_labels(["sparrow", "robin", "hawk"]);
        assert!(table.validate_class_count(3).is_ok());
        assert!(matches!(
            table.validate_class_count(4),
            Err(ClassifyError::LabelCountMismatch {
                labels: 3,
                classes: 4
            })
        ));
    }
}
