//! Insertion-ordered label → traces mapping

use crate::trace::Trace;

/// Task-count or class label.
pub type Label = u32;

/// A trace tagged with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledTrace {
    /// Target value
    pub label: Label,
    /// Raw trace
    pub trace: Trace,
}

/// Traces grouped by label, iterated in the order labels were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledTraces {
    groups: Vec<(Label, Vec<Trace>)>,
}

impl LabeledTraces {
    /// Empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `trace` to the group for `label`, creating the group if needed.
    pub fn insert(&mut self, label: Label, trace: Trace) {
        match self.groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, traces)) => traces.push(trace),
            None => self.groups.push((label, vec![trace])),
        }
    }

    /// Traces for `label`, in insertion order.
    #[must_use]
    pub fn get(&self, label: Label) -> Option<&[Trace]> {
        self.groups
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, traces)| traces.as_slice())
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.groups.iter().map(|(l, _)| *l)
    }

    /// `(label, traces)` groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &[Trace])> {
        self.groups.iter().map(|(l, t)| (*l, t.as_slice()))
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of traces across all labels.
    #[must_use]
    pub fn trace_count(&self) -> usize {
        self.groups.iter().map(|(_, t)| t.len()).sum()
    }

    /// True if no trace has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<(Label, Trace)> for LabeledTraces {
    fn from_iter<I: IntoIterator<Item = (Label, Trace)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (label, trace) in iter {
            data.insert(label, trace);
        }
        data
    }
}
