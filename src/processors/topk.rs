//! Bounded top-k selection over labeled probabilities.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::labels::LabelTable;
use crate::core::predictions::Recognition;

/// One scored output slot, ordered for ranking.
///
/// `Greater` means "ranks higher in the result list": higher confidence wins,
/// and equal confidences are broken by ascending class id so selection is
/// reproducible across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    class_id: usize,
    confidence: f32,
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.confidence
            .partial_cmp(&other.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.class_id.cmp(&self.class_id))
    }
}

/// Selects the k most confident classes without sorting all n slots.
///
/// A k-bounded min-heap keeps only the current best candidates, so selection
/// runs in `O(n log k)` with `O(k)` extra memory even when the label set has
/// thousands of entries.
#[derive(Debug, Clone)]
pub struct TopKSelector {
    max_results: usize,
}

impl TopKSelector {
    /// Creates a selector with the given result budget.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_results` is zero.
    pub fn new(max_results: usize) -> ClassifyResult<Self> {
        if max_results == 0 {
            return Err(ClassifyError::invalid_config(
                "max_results must be at least 1",
            ));
        }
        Ok(Self { max_results })
    }

    /// The configured result budget.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Returns the `min(k, n)` most confident recognitions, best first.
    ///
    /// Output confidences are non-increasing; equal confidences appear in
    /// ascending class id order. Slot `i` of `probabilities` is joined with
    /// label `i` of the table (slots past the table length stay untitled).
    pub fn select(&self, labels: &LabelTable, probabilities: &[f32]) -> Vec<Recognition> {
        let mut heap: BinaryHeap<Reverse<Candidate>> =
            BinaryHeap::with_capacity(self.max_results + 1);

        for (class_id, &confidence) in probabilities.iter().enumerate() {
            let candidate = Candidate {
                class_id,
                confidence,
            };
            if heap.len() < self.max_results {
                heap.push(Reverse(candidate));
            } else if let Some(Reverse(worst)) = heap.peek() {
                if candidate > *worst {
                    heap.pop();
                    heap.push(Reverse(candidate));
                }
            }
        }

        let mut ranked: Vec<Candidate> = heap.into_iter().map(|Reverse(c)| c).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));

        ranked
            .into_iter()
            .map(|candidate| {
                Recognition::new(
                    Some(candidate.class_id),
                    labels.get(candidate.class_id).cloned(),
                    candidate.confidence,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird_table() -> LabelTable {
        LabelTable::from_labels(["sparrow", "robin", "hawk"])
    }

    #[test]
    fn picks_the_two_most_confident_birds() {
        let selector = TopKSelector::new(2).unwrap();
        let results = selector.select(&bird_table(), &[0.10, 0.75, 0.15]);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title.as_deref(), Some("robin"));
        assert_eq!(results[0].confidence, 0.75);
        assert_eq!(results[1].title.as_deref(), Some("hawk"));
        assert_eq!(results[1].confidence, 0.15);
    }

    #[test]
    fn budget_larger_than_label_set_returns_everything_sorted() {
        let labels =
            LabelTable::from_labels(["finch", "wren", "crow", "jay", "dove"]);
        let selector = TopKSelector::new(20).unwrap();
        let results = selector.select(&labels, &[0.05, 0.40, 0.10, 0.25, 0.20]);

        assert_eq!(results.len(), 5);
        let ids: Vec<usize> = results.iter().filter_map(|r| r.class_id).collect();
        assert_eq!(ids, vec![1, 3, 4, 2, 0]);
    }

    #[test]
    fn confidences_are_non_increasing_and_complete() {
        // Deterministic pseudo-random probabilities over a large label space.
        let mut state: u32 = 0x2545_F491;
        let probabilities: Vec<f32> = (0..4096)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1u32 << 24) as f32
            })
            .collect();
        let labels = LabelTable::from_labels(probabilities.iter().map(|_| "x"));

        let k = 20;
        let selector = TopKSelector::new(k).unwrap();
        let results = selector.select(&labels, &probabilities);

        assert_eq!(results.len(), k);
        for pair in results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }

        // Completeness: nothing excluded beats the last kept entry.
        let kept: Vec<usize> = results.iter().filter_map(|r| r.class_id).collect();
        let cutoff = results.last().unwrap().confidence;
        for (id, &p) in probabilities.iter().enumerate() {
            if !kept.contains(&id) {
                assert!(p <= cutoff);
            }
        }
    }

    #[test]
    fn ties_break_by_ascending_class_id() {
        let labels = LabelTable::from_labels(["a", "b", "c", "d"]);
        let selector = TopKSelector::new(3).unwrap();
        let results = selector.select(&labels, &[0.25, 0.25, 0.25, 0.25]);

        let ids: Vec<usize> = results.iter().filter_map(|r| r.class_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn selection_is_deterministic() {
        let labels = bird_table();
        let selector = TopKSelector::new(2).unwrap();
        let probabilities = [0.2, 0.2, 0.6];

        let first = selector.select(&labels, &probabilities);
        let second = selector.select(&labels, &probabilities);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_budget_is_rejected() {
        assert!(matches!(
            TopKSelector::new(0),
            Err(ClassifyError::InvalidConfig { .. })
        ));
    }
}
