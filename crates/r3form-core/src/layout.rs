//! Vertical stacking of form children from their measured heights.
//!
//! Layout is two-pass: children are first placed with a provisional height so
//! the container renders something, each child's rendered extent is measured,
//! and once every child has reported a height the real offsets are computed.
//! A child whose content changes is invalidated and re-measured, which
//! recomputes the offsets of all its siblings.

use crate::error::{FormError, FormResult};

/// Container height used until every child has been measured.
pub const DEFAULT_FORM_HEIGHT: f64 = 6.0;

/// Row height assumed by the provisional layout.
const PROVISIONAL_ROW_HEIGHT: f64 = 1.0;

/// Measurement record for one child, in composition order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEntry {
    pub index: usize,
    pub measured_height: Option<f64>,
}

/// Where the container is in its measure-then-layout cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutPhase {
    /// No child has reported a height yet.
    Unmeasured,
    /// Some, but not all, children have reported.
    Measuring { measured: usize, count: usize },
    /// Every child has a height; offsets are final.
    Measured {
        total_height: f64,
        offsets: Vec<f64>,
    },
}

impl LayoutPhase {
    /// Check if the layout is final.
    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured { .. })
    }
}

/// Compute the container height and the vertical center offset of each child.
///
/// `total = sum(heights) + gap * (n - 1) + 2 * padding`. Children are walked
/// top to bottom starting `padding` below the top edge; each child's center
/// is mirrored around `total / 2`, so index 0 ends up topmost.
pub fn compute_offsets(heights: &[f64], gap: f64, padding: f64) -> (f64, Vec<f64>) {
    let gaps = heights.len().saturating_sub(1) as f64;
    let total = heights.iter().sum::<f64>() + gap * gaps + 2.0 * padding;
    let half = total / 2.0;

    let mut cursor = padding;
    let offsets = heights
        .iter()
        .map(|height| {
            let center = cursor + height / 2.0;
            cursor += height + gap;
            half - center
        })
        .collect();

    (total, offsets)
}

/// Tracks child measurements and derives the container layout.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    entries: Vec<LayoutEntry>,
    gap: f64,
    padding: f64,
    phase: LayoutPhase,
}

impl LayoutEngine {
    /// Create an engine for `count` children.
    pub fn new(count: usize, gap: f64, padding: f64) -> Self {
        let mut engine = Self {
            entries: (0..count)
                .map(|index| LayoutEntry {
                    index,
                    measured_height: None,
                })
                .collect(),
            gap,
            padding,
            phase: LayoutPhase::Unmeasured,
        };
        engine.update_phase();
        engine
    }

    /// Number of children laid out.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Measurement records in composition order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Current phase.
    pub fn phase(&self) -> &LayoutPhase {
        &self.phase
    }

    /// Record the measured height of child `index`.
    ///
    /// Returns `true` if the reported layout changed, i.e. the caller should
    /// push new offsets to the children.
    pub fn register_measurement(&mut self, index: usize, height: f64) -> FormResult<bool> {
        let count = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(FormError::LayoutIndex { index, count })?;

        let height = height.max(0.0);
        if entry
            .measured_height
            .is_some_and(|known| (known - height).abs() <= f64::EPSILON)
        {
            return Ok(false);
        }
        entry.measured_height = Some(height);
        Ok(self.update_phase())
    }

    /// Forget the height of child `index` because its content changed.
    pub fn invalidate(&mut self, index: usize) -> FormResult<bool> {
        let count = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(FormError::LayoutIndex { index, count })?;
        if entry.measured_height.take().is_none() {
            return Ok(false);
        }
        Ok(self.update_phase())
    }

    /// Height of the container: final once measured, provisional before.
    pub fn container_height(&self) -> f64 {
        match &self.phase {
            LayoutPhase::Measured { total_height, .. } => *total_height,
            _ => DEFAULT_FORM_HEIGHT,
        }
    }

    /// Vertical offset of child `index`.
    pub fn offset(&self, index: usize) -> Option<f64> {
        if index >= self.entries.len() {
            return None;
        }
        match &self.phase {
            LayoutPhase::Measured { offsets, .. } => offsets.get(index).copied(),
            _ => Some(self.provisional_offset(index)),
        }
    }

    /// Offsets of all children in composition order.
    pub fn offsets(&self) -> Vec<f64> {
        (0..self.entries.len())
            .filter_map(|index| self.offset(index))
            .collect()
    }

    /// Offset used before measurement: fixed rows from the top edge of the
    /// default-height container.
    fn provisional_offset(&self, index: usize) -> f64 {
        DEFAULT_FORM_HEIGHT / 2.0 - (PROVISIONAL_ROW_HEIGHT + self.gap) * index as f64
    }

    /// Recompute the phase; returns whether the reported layout changed.
    fn update_phase(&mut self) -> bool {
        let count = self.entries.len();
        let heights: Vec<f64> = self
            .entries
            .iter()
            .filter_map(|entry| entry.measured_height)
            .collect();

        let next = if heights.len() == count {
            let (total_height, offsets) = compute_offsets(&heights, self.gap, self.padding);
            LayoutPhase::Measured {
                total_height,
                offsets,
            }
        } else if heights.is_empty() {
            LayoutPhase::Unmeasured
        } else {
            LayoutPhase::Measuring {
                measured: heights.len(),
                count,
            }
        };

        // Provisional offsets are the same while unmeasured or measuring.
        let changed = (self.phase.is_measured() || next.is_measured()) && self.phase != next;
        if self.phase != next {
            log::debug!("Layout phase: {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_compute_offsets_example() {
        let (total, offsets) = compute_offsets(&[2.0, 1.0, 3.0], 0.5, 1.0);
        assert!(approx(total, 9.0));
        // Top child: 9/2 - (1 + 2/2)
        assert!(approx(offsets[0], 2.5));
        // 9/2 - (1 + 2 + 0.5 + 0.5)
        assert!(approx(offsets[1], 0.5));
        // 9/2 - (1 + 2 + 0.5 + 1 + 0.5 + 1.5)
        assert!(approx(offsets[2], -2.0));
    }

    #[test]
    fn test_compute_offsets_is_idempotent() {
        let heights = [0.8, 1.2, 0.5, 2.0];
        let first = compute_offsets(&heights, 0.3, 0.7);
        let second = compute_offsets(&heights, 0.3, 0.7);
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_offsets_empty() {
        let (total, offsets) = compute_offsets(&[], 0.5, 1.0);
        assert!(approx(total, 2.0));
        assert!(offsets.is_empty());
    }

    #[test]
    fn test_offsets_are_symmetric_for_equal_rows() {
        let (_, offsets) = compute_offsets(&[1.0, 1.0], 1.0, 2.0);
        assert!(approx(offsets[0], -offsets[1]));
    }

    #[test]
    fn test_phase_progression_any_order() {
        let mut engine = LayoutEngine::new(3, 0.5, 1.0);
        assert_eq!(engine.phase(), &LayoutPhase::Unmeasured);
        assert!(approx(engine.container_height(), DEFAULT_FORM_HEIGHT));

        assert!(!engine.register_measurement(2, 3.0).unwrap());
        assert_eq!(
            engine.phase(),
            &LayoutPhase::Measuring {
                measured: 1,
                count: 3
            }
        );
        assert!(!engine.register_measurement(0, 2.0).unwrap());
        assert!(engine.register_measurement(1, 1.0).unwrap());

        assert!(engine.phase().is_measured());
        assert!(approx(engine.container_height(), 9.0));
        assert!(approx(engine.offset(0).unwrap(), 2.5));
    }

    #[test]
    fn test_provisional_offsets_before_measurement() {
        let engine = LayoutEngine::new(3, 0.5, 1.0);
        let offsets = engine.offsets();
        assert!(approx(offsets[0], 3.0));
        assert!(approx(offsets[1], 1.5));
        assert!(approx(offsets[2], 0.0));
    }

    #[test]
    fn test_remeasure_updates_all_offsets() {
        let mut engine = LayoutEngine::new(2, 0.0, 0.0);
        engine.register_measurement(0, 1.0).unwrap();
        engine.register_measurement(1, 1.0).unwrap();
        let before = engine.offsets();

        assert!(engine.register_measurement(0, 3.0).unwrap());
        let after = engine.offsets();
        assert!(!approx(before[1], after[1]));
        assert!(approx(engine.container_height(), 4.0));
    }

    #[test]
    fn test_same_measurement_is_not_a_change() {
        let mut engine = LayoutEngine::new(1, 0.0, 0.0);
        assert!(engine.register_measurement(0, 1.0).unwrap());
        assert!(!engine.register_measurement(0, 1.0).unwrap());
    }

    #[test]
    fn test_invalidate_reenters_measuring() {
        let mut engine = LayoutEngine::new(2, 0.5, 1.0);
        engine.register_measurement(0, 1.0).unwrap();
        engine.register_measurement(1, 1.0).unwrap();

        assert!(engine.invalidate(1).unwrap());
        assert_eq!(
            engine.phase(),
            &LayoutPhase::Measuring {
                measured: 1,
                count: 2
            }
        );
        assert!(approx(engine.container_height(), DEFAULT_FORM_HEIGHT));

        assert!(engine.register_measurement(1, 2.0).unwrap());
        assert!(approx(engine.container_height(), 5.5));
    }

    #[test]
    fn test_zero_children_measured_immediately() {
        let engine = LayoutEngine::new(0, 0.5, 1.0);
        assert!(engine.is_empty());
        assert!(engine.phase().is_measured());
        assert!(approx(engine.container_height(), 2.0));
    }

    #[test]
    fn test_out_of_range_index() {
        let mut engine = LayoutEngine::new(2, 0.5, 1.0);
        let err = engine.register_measurement(5, 1.0).unwrap_err();
        assert!(matches!(err, FormError::LayoutIndex { index: 5, count: 2 }));
        assert!(engine.offset(5).is_none());
    }
}
