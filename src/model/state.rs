use std::mem::size_of;

use super::counter::Counter;

/// Variable assignment plus one satisfaction counter per clause.
///
/// Counters are 1-based: slot 0 exists so clause ids line up with the signed
/// ids in the model's affected lists, and is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatisfactionState<C: Counter = u32> {
    pub(crate) assignment: Vec<bool>,
    pub(crate) counters: Vec<C>,
}

impl<C: Counter> SatisfactionState<C> {
    /// All variables false, all counters zero.
    pub(crate) fn zeroed(num_vars: usize, num_slots: usize) -> Self {
        Self {
            assignment: vec![false; num_vars],
            counters: vec![C::ZERO; num_slots],
        }
    }

    pub fn num_vars(&self) -> usize {
        self.assignment.len()
    }

    pub fn assignment(&self) -> &[bool] {
        &self.assignment
    }

    pub fn value(&self, var: usize) -> bool {
        self.assignment[var]
    }

    /// Number of currently true literals in clause `clause_id` (1-based).
    pub fn counter(&self, clause_id: usize) -> usize {
        debug_assert!(clause_id > 0, "counter slot 0 is reserved");
        self.counters[clause_id].get()
    }

    pub fn is_satisfied(&self, clause_id: usize) -> bool {
        self.counter(clause_id) > 0
    }

    pub fn unsatisfied_count(&self) -> usize {
        self.counters
            .iter()
            .skip(1)
            .filter(|&&c| c == C::ZERO)
            .count()
    }

    pub fn memory_estimate(num_vars: usize, num_clauses: usize) -> usize {
        size_of::<C>() * num_clauses + Self::state_only_memory_estimate(num_vars)
    }

    pub fn state_only_memory_estimate(num_vars: usize) -> usize {
        size_of::<bool>() * num_vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_scale_with_counter_width() {
        assert_eq!(SatisfactionState::<u8>::memory_estimate(3, 4), 7);
        assert_eq!(SatisfactionState::<u32>::memory_estimate(3, 4), 19);
        assert_eq!(SatisfactionState::<u16>::state_only_memory_estimate(3), 3);
    }

    #[test]
    fn zeroed_state_is_all_unsatisfied() {
        let state = SatisfactionState::<u16>::zeroed(2, 4);
        assert_eq!(state.num_vars(), 2);
        assert_eq!(state.unsatisfied_count(), 3);
        assert!(!state.is_satisfied(1));
    }
}
