//! Deterministic Finite Automaton model and transition-function completion.

use std::collections::{HashMap, VecDeque};

use crate::state::{StateId, StateSet};
use crate::symbol::SymbolId;

/// A Deterministic Finite Automaton over dense state and symbol indices.
///
/// The transition function may be partial: a missing `(state, symbol)` entry
/// means the input is rejected at that point. [`Dfa::complete`] produces a
/// total equivalent. Instances are treated as immutable once built; every
/// algorithm returns a new value instead of mutating its input.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Number of states; states are numbered `0..num_states`.
    num_states: StateId,
    /// Start state (None until set).
    start: Option<StateId>,
    /// Accepting states.
    accepting: StateSet,
    /// Transitions: (source, symbol) -> destination.
    transitions: HashMap<(StateId, SymbolId), StateId>,
    /// Reverse transitions: (destination, symbol) -> set of sources.
    reverse: HashMap<(StateId, SymbolId), StateSet>,
}

impl Dfa {
    /// Create a new empty DFA.
    pub fn new() -> Self {
        Self {
            num_states: 0,
            start: None,
            accepting: StateSet::with_capacity(16),
            transitions: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Add a new state and return its identifier.
    pub fn add_state(&mut self) -> StateId {
        let id = self.num_states;
        self.num_states += 1;
        id
    }

    /// Set the start state.
    pub fn set_start(&mut self, state: StateId) {
        debug_assert!(state < self.num_states);
        self.start = Some(state);
    }

    /// Mark a state as accepting.
    pub fn add_accepting(&mut self, state: StateId) {
        debug_assert!(state < self.num_states);
        self.accepting.insert(state);
    }

    /// Add a transition. An existing transition for `(source, symbol)` is
    /// replaced so that the forward and reverse maps stay consistent.
    pub fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        debug_assert!(source < self.num_states && destination < self.num_states);
        if let Some(previous) = self.transitions.insert((source, symbol), destination) {
            if let Some(sources) = self.reverse.get_mut(&(previous, symbol)) {
                sources.remove(source);
            }
        }
        self.reverse
            .entry((destination, symbol))
            .or_insert_with(|| StateSet::with_capacity(self.num_states as usize))
            .insert(source);
    }

    /// Number of states.
    pub fn num_states(&self) -> StateId {
        self.num_states
    }

    /// The start state, if one has been set.
    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    /// The accepting states.
    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    /// Whether `state` is accepting.
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state)
    }

    /// The destination of `(source, symbol)`, if defined.
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    /// All transitions as `(source, symbol, destination)` triples.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (src, sym, dst))
    }

    /// The distinct symbols appearing in any transition, in ascending order.
    ///
    /// The alphabet is not stored; it is recomputed from the transition map
    /// so the two can never disagree.
    pub fn alphabet(&self) -> Vec<SymbolId> {
        let mut symbols: Vec<SymbolId> = self.transitions.keys().map(|&(_, sym)| sym).collect();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    /// All states whose transition on `symbol` lands inside `targets`.
    pub(crate) fn predecessors(&self, targets: &StateSet, symbol: SymbolId) -> StateSet {
        let mut sources = StateSet::with_capacity(self.num_states as usize);
        for target in targets.iter() {
            if let Some(set) = self.reverse.get(&(target, symbol)) {
                sources.union_with(set);
            }
        }
        sources
    }

    /// All states reachable from the start state via BFS.
    pub fn reachable_from_start(&self) -> StateSet {
        let mut reachable = StateSet::with_capacity(self.num_states as usize);
        let Some(start) = self.start else {
            return reachable;
        };

        let alphabet = self.alphabet();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(state) = queue.pop_front() {
            if reachable.contains(state) {
                continue;
            }
            reachable.insert(state);

            for &symbol in &alphabet {
                if let Some(next) = self.transition(state, symbol) {
                    if !reachable.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        reachable
    }

    /// Make the transition function total over `states x alphabet`.
    ///
    /// Missing `(state, symbol)` pairs are routed to a synthetic
    /// non-accepting sink state that loops to itself on every symbol. The
    /// sink is added only when at least one transition is missing; a DFA
    /// with an empty alphabet or an already-total function is returned
    /// unchanged. The result is a new value; `self` is untouched.
    pub fn complete(&self) -> Dfa {
        let alphabet = self.alphabet();
        if alphabet.is_empty() {
            return self.clone();
        }

        let missing: Vec<(StateId, SymbolId)> = (0..self.num_states)
            .flat_map(|state| alphabet.iter().map(move |&symbol| (state, symbol)))
            .filter(|&(state, symbol)| !self.transitions.contains_key(&(state, symbol)))
            .collect();
        if missing.is_empty() {
            return self.clone();
        }

        let mut completed = self.clone();
        let sink = completed.add_state();
        for (state, symbol) in missing {
            completed.add_transition(state, symbol, sink);
        }
        for &symbol in &alphabet {
            completed.add_transition(sink, symbol, sink);
        }
        completed
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_transitions(dfa: &Dfa) -> Vec<(StateId, SymbolId, StateId)> {
        let mut all: Vec<_> = dfa.transitions().collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn test_dfa_builder_basic() {
        let mut dfa = Dfa::new();
        let s0 = dfa.add_state();
        let s1 = dfa.add_state();

        dfa.set_start(s0);
        dfa.add_accepting(s1);
        dfa.add_transition(s0, 0, s1);
        dfa.add_transition(s1, 0, s1);

        assert_eq!(dfa.num_states(), 2);
        assert_eq!(dfa.start(), Some(s0));
        assert!(dfa.is_accepting(s1));
        assert!(!dfa.is_accepting(s0));
        assert_eq!(dfa.transition(s0, 0), Some(s1));
        assert_eq!(dfa.transition(s0, 1), None);
    }

    #[test]
    fn test_alphabet_is_sorted_and_distinct() {
        let mut dfa = Dfa::new();
        let s0 = dfa.add_state();
        dfa.add_transition(s0, 3, s0);
        dfa.add_transition(s0, 1, s0);

        assert_eq!(dfa.alphabet(), vec![1, 3]);
    }

    #[test]
    fn test_transition_replacement_updates_reverse() {
        let mut dfa = Dfa::new();
        let s0 = dfa.add_state();
        let s1 = dfa.add_state();
        let s2 = dfa.add_state();

        dfa.add_transition(s0, 0, s1);
        dfa.add_transition(s0, 0, s2);

        let into_s1 = StateSet::singleton(s1, 3);
        let into_s2 = StateSet::singleton(s2, 3);
        assert!(dfa.predecessors(&into_s1, 0).is_empty());
        assert_eq!(dfa.predecessors(&into_s2, 0).iter().collect::<Vec<_>>(), vec![s0]);
    }

    #[test]
    fn test_complete_adds_sink_for_missing_pairs() {
        // q0 -a-> q1, q1 missing both symbols, q0 missing 'b'
        let mut dfa = Dfa::new();
        let q0 = dfa.add_state();
        let q1 = dfa.add_state();
        dfa.set_start(q0);
        dfa.add_accepting(q1);
        dfa.add_transition(q0, 0, q1);
        dfa.add_transition(q0, 1, q0);

        let completed = dfa.complete();
        assert_eq!(completed.num_states(), 3);
        let sink = 2;
        assert_eq!(completed.transition(q1, 0), Some(sink));
        assert_eq!(completed.transition(q1, 1), Some(sink));
        assert_eq!(completed.transition(sink, 0), Some(sink));
        assert_eq!(completed.transition(sink, 1), Some(sink));
        assert!(!completed.is_accepting(sink));
        // original pairs untouched
        assert_eq!(completed.transition(q0, 0), Some(q1));

        // totality over states x alphabet
        for state in 0..completed.num_states() {
            for &symbol in &completed.alphabet() {
                assert!(completed.transition(state, symbol).is_some());
            }
        }
    }

    #[test]
    fn test_complete_is_noop_when_total_or_empty() {
        let mut total = Dfa::new();
        let q0 = total.add_state();
        total.set_start(q0);
        total.add_transition(q0, 0, q0);
        assert_eq!(total.complete().num_states(), 1);

        let mut empty = Dfa::new();
        empty.add_state();
        assert_eq!(empty.complete().num_states(), 1);
    }

    #[test]
    fn test_complete_idempotent() {
        let mut dfa = Dfa::new();
        let q0 = dfa.add_state();
        let q1 = dfa.add_state();
        dfa.set_start(q0);
        dfa.add_transition(q0, 0, q1);

        let once = dfa.complete();
        let twice = once.complete();
        assert_eq!(once.num_states(), twice.num_states());
        assert_eq!(sorted_transitions(&once), sorted_transitions(&twice));
    }

    #[test]
    fn test_reachable_from_start() {
        let mut dfa = Dfa::new();
        let q0 = dfa.add_state();
        let q1 = dfa.add_state();
        let q2 = dfa.add_state();
        dfa.set_start(q0);
        dfa.add_transition(q0, 0, q1);
        dfa.add_transition(q2, 0, q1); // q2 has no inbound path

        let reachable = dfa.reachable_from_start();
        assert!(reachable.contains(q0));
        assert!(reachable.contains(q1));
        assert!(!reachable.contains(q2));
    }
}
