//! Wire-shaped DFA model exchanged with the conversion service.
//!
//! The conversion service hands over DFAs with string state names and an
//! explicit transition list. This module validates that shape, lowers it
//! onto the dense [`Dfa`] indices the algorithms run on, and lifts results
//! back to wire form.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dfa::Dfa;
use crate::error::AutomatonError;
use crate::minimize::minimize;
use crate::simulate::{Outcome, simulate};
use crate::state::StateId;
use crate::symbol::{SymbolId, single_char};

/// A labeled transition as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineTransition {
    /// Edge identifier, used by the renderer to address the edge.
    pub id: String,
    /// Source state name.
    pub from: String,
    /// Destination state name.
    pub to: String,
    /// Transition symbol; exactly one character.
    pub symbol: String,
}

/// A DFA in the exchange format: string state names, an explicit transition
/// list, and separate start/accepting fields.
///
/// `symbols` is emitted by the conversion service for display; it is
/// recomputed on every output here and never trusted for alphabet
/// inference, which always derives from `transitions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// All state names.
    pub states: Vec<String>,
    /// The transition list.
    pub transitions: Vec<MachineTransition>,
    /// Start state name.
    pub start: String,
    /// Accepting state names.
    pub accepting: Vec<String>,
    /// Distinct transition symbols, sorted.
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// One revealed step of a wire-level simulation trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineStep {
    /// Identifier of the transition taken, for edge highlighting.
    pub id: String,
    /// State before the step.
    pub from: String,
    /// Symbol consumed.
    pub symbol: char,
    /// State after the step.
    pub to: String,
}

/// Terminal outcome of a wire-level simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MachineOutcome {
    /// Input consumed, ended in an accepting state.
    Accepted {
        /// Final state name.
        state: String,
    },
    /// No transition was available mid-input.
    Stuck {
        /// State the walk was stuck in.
        state: String,
        /// Symbol with no transition.
        symbol: char,
        /// 0-based input position of the symbol.
        position: usize,
    },
    /// Input consumed, ended in a non-accepting state.
    NotAccepting {
        /// Final state name.
        state: String,
    },
}

impl MachineOutcome {
    /// Whether the input was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl fmt::Display for MachineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { state } => write!(f, "accepted (ended in {state})"),
            Self::Stuck {
                state,
                symbol,
                position,
            } => write!(
                f,
                "rejected: no transition from {state} on '{symbol}' at position {position}"
            ),
            Self::NotAccepting { state } => write!(f, "rejected (ended in {state})"),
        }
    }
}

/// A wire-level simulation trace: the steps taken plus how the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineTrace {
    /// Steps in input order.
    pub steps: Vec<MachineStep>,
    /// Terminal outcome.
    pub outcome: MachineOutcome,
}

/// A machine lowered onto dense indices, with the tables needed to lift
/// results back to wire form.
struct Compiled {
    dfa: Dfa,
    /// StateId -> wire name.
    names: Vec<String>,
    /// SymbolId -> wire character.
    chars: Vec<char>,
    /// Wire character -> SymbolId.
    symbol_ids: IndexMap<char, SymbolId>,
    /// Wire edge identifiers by (source, symbol).
    transition_ids: HashMap<(StateId, SymbolId), String>,
}

impl Compiled {
    /// Intern an input symbol, assigning a fresh id to characters outside
    /// the machine's alphabet. Fresh ids have no transitions, so simulation
    /// reports them as stuck rather than erroring.
    fn intern_symbol(&mut self, symbol: char) -> SymbolId {
        if let Some(&id) = self.symbol_ids.get(&symbol) {
            return id;
        }
        let id = self.chars.len() as SymbolId;
        self.symbol_ids.insert(symbol, id);
        self.chars.push(symbol);
        id
    }
}

/// Validate `machine` and lower it onto dense indices.
///
/// All malformed-DFA conditions are rejected here, before any algorithm
/// runs: unknown state references, non-single-character symbols, duplicate
/// `(state, symbol)` transitions, and an unresolvable start state.
fn compile(machine: &Machine) -> Result<Compiled, AutomatonError> {
    let mut state_ids: IndexMap<String, StateId> = IndexMap::new();
    let mut dfa = Dfa::new();
    for name in &machine.states {
        if !state_ids.contains_key(name) {
            state_ids.insert(name.clone(), dfa.add_state());
        }
    }
    let names: Vec<String> = state_ids.keys().cloned().collect();

    let start = *state_ids
        .get(&machine.start)
        .ok_or_else(|| AutomatonError::UnknownState {
            name: machine.start.clone(),
            role: "start",
        })?;
    dfa.set_start(start);

    for name in &machine.accepting {
        let state = *state_ids
            .get(name)
            .ok_or_else(|| AutomatonError::UnknownState {
                name: name.clone(),
                role: "accepting set",
            })?;
        dfa.add_accepting(state);
    }

    let mut symbol_ids: IndexMap<char, SymbolId> = IndexMap::new();
    let mut chars: Vec<char> = Vec::new();
    let mut transition_ids: HashMap<(StateId, SymbolId), String> = HashMap::new();
    for transition in &machine.transitions {
        let from = *state_ids
            .get(&transition.from)
            .ok_or_else(|| AutomatonError::UnknownState {
                name: transition.from.clone(),
                role: "transition source",
            })?;
        let to = *state_ids
            .get(&transition.to)
            .ok_or_else(|| AutomatonError::UnknownState {
                name: transition.to.clone(),
                role: "transition destination",
            })?;
        let symbol = single_char(&transition.symbol).ok_or_else(|| AutomatonError::BadSymbol {
            symbol: transition.symbol.clone(),
        })?;

        let symbol_id = *symbol_ids.entry(symbol).or_insert_with(|| {
            chars.push(symbol);
            (chars.len() - 1) as SymbolId
        });

        if transition_ids.contains_key(&(from, symbol_id)) {
            return Err(AutomatonError::DuplicateTransition {
                from: transition.from.clone(),
                symbol,
            });
        }
        transition_ids.insert((from, symbol_id), transition.id.clone());
        dfa.add_transition(from, symbol_id, to);
    }

    Ok(Compiled {
        dfa,
        names,
        chars,
        symbol_ids,
        transition_ids,
    })
}

/// Lift a dense DFA back to wire form under the given name tables.
///
/// Transitions are emitted per state in symbol order with regenerated
/// `{from}_{to}_{symbol}` edge identifiers.
fn lift(dfa: &Dfa, names: &[String], chars: &[char]) -> Machine {
    let alphabet = dfa.alphabet();

    let mut transitions = Vec::new();
    for state in 0..dfa.num_states() {
        for &symbol in &alphabet {
            if let Some(destination) = dfa.transition(state, symbol) {
                let from = names[state as usize].clone();
                let to = names[destination as usize].clone();
                let symbol_char = chars[symbol as usize];
                transitions.push(MachineTransition {
                    id: format!("{from}_{to}_{symbol_char}"),
                    from,
                    to,
                    symbol: symbol_char.to_string(),
                });
            }
        }
    }

    let accepting = (0..dfa.num_states())
        .filter(|&state| dfa.is_accepting(state))
        .map(|state| names[state as usize].clone())
        .collect();

    let mut symbols: Vec<String> = alphabet
        .iter()
        .map(|&symbol| chars[symbol as usize].to_string())
        .collect();
    symbols.sort();

    let start = dfa
        .start()
        .map(|state| names[state as usize].clone())
        .unwrap_or_default();

    Machine {
        states: names.to_vec(),
        transitions,
        start,
        accepting,
        symbols,
    }
}

/// Pick a sink name that collides with no existing state name.
fn fresh_sink_name(names: &[String]) -> String {
    let mut candidate = String::from("__dead__");
    let mut counter = 2;
    while names.iter().any(|name| *name == candidate) {
        candidate = format!("__dead__{counter}");
        counter += 1;
    }
    candidate
}

impl Machine {
    /// Make the transition function total, routing missing pairs to a fresh
    /// non-accepting sink state. A machine that is already total (or has no
    /// transitions at all) comes back unchanged apart from regenerated edge
    /// identifiers.
    pub fn complete(&self) -> Result<Machine, AutomatonError> {
        let compiled = compile(self)?;
        let completed = compiled.dfa.complete();

        let mut names = compiled.names.clone();
        if completed.num_states() > compiled.dfa.num_states() {
            names.push(fresh_sink_name(&names));
        }
        Ok(lift(&completed, &names, &compiled.chars))
    }

    /// Minimize the machine: collapse indistinguishable states and drop
    /// everything unreachable from the start. Minimized states are named
    /// `S0..Sk` in a stable order.
    pub fn minimize(&self) -> Result<Machine, AutomatonError> {
        let compiled = compile(self)?;
        let minimized = minimize(&compiled.dfa)?;

        let names: Vec<String> = (0..minimized.num_states())
            .map(|index| format!("S{index}"))
            .collect();
        Ok(lift(&minimized, &names, &compiled.chars))
    }

    /// Simulate `input` against the machine, producing a wire-level trace.
    ///
    /// Input characters outside the machine's alphabet are reported as a
    /// stuck rejection at their position, like any other missing
    /// transition.
    pub fn simulate(&self, input: &str) -> Result<MachineTrace, AutomatonError> {
        let mut compiled = compile(self)?;
        let symbols: Vec<SymbolId> = input
            .chars()
            .map(|symbol| compiled.intern_symbol(symbol))
            .collect();
        let trace = simulate(&compiled.dfa, &symbols)?;

        let steps = trace
            .steps
            .iter()
            .map(|step| MachineStep {
                id: compiled
                    .transition_ids
                    .get(&(step.from, step.symbol))
                    .cloned()
                    .unwrap_or_default(),
                from: compiled.names[step.from as usize].clone(),
                symbol: compiled.chars[step.symbol as usize],
                to: compiled.names[step.to as usize].clone(),
            })
            .collect();
        let outcome = match trace.outcome {
            Outcome::Accepted { state } => MachineOutcome::Accepted {
                state: compiled.names[state as usize].clone(),
            },
            Outcome::Stuck {
                state,
                symbol,
                position,
            } => MachineOutcome::Stuck {
                state: compiled.names[state as usize].clone(),
                symbol: compiled.chars[symbol as usize],
                position,
            },
            Outcome::NotAccepting { state } => MachineOutcome::NotAccepting {
                state: compiled.names[state as usize].clone(),
            },
        };
        Ok(MachineTrace { steps, outcome })
    }
}

/// Complete the transition function of `machine`; see [`Machine::complete`].
pub fn complete_dfa(machine: &Machine) -> Result<Machine, AutomatonError> {
    machine.complete()
}

/// Minimize `machine`; see [`Machine::minimize`].
pub fn minimize_dfa(machine: &Machine) -> Result<Machine, AutomatonError> {
    machine.minimize()
}

/// Simulate `input` against `machine`; see [`Machine::simulate`].
pub fn simulate_dfa(machine: &Machine, input: &str) -> Result<MachineTrace, AutomatonError> {
    machine.simulate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(id: &str, from: &str, to: &str, symbol: &str) -> MachineTransition {
        MachineTransition {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// Strings over {a, b} ending in 'a'.
    fn ends_in_a() -> Machine {
        Machine {
            states: vec!["q0".into(), "q1".into()],
            transitions: vec![
                transition("t0", "q0", "q1", "a"),
                transition("t1", "q0", "q0", "b"),
                transition("t2", "q1", "q1", "a"),
                transition("t3", "q1", "q0", "b"),
            ],
            start: "q0".into(),
            accepting: vec!["q1".into()],
            symbols: vec!["a".into(), "b".into()],
        }
    }

    #[test]
    fn test_machine_wire_shape() {
        let json = r#"{
            "states": ["q0", "q1"],
            "transitions": [
                {"id": "q0_q1_a", "from": "q0", "to": "q1", "symbol": "a"},
                {"id": "q1_q1_a", "from": "q1", "to": "q1", "symbol": "a"}
            ],
            "start": "q0",
            "accepting": ["q1"],
            "symbols": ["a"]
        }"#;
        let machine: Machine = serde_json::from_str(json).unwrap();
        assert_eq!(machine.states, vec!["q0", "q1"]);
        assert_eq!(machine.transitions.len(), 2);
        assert_eq!(machine.transitions[0].symbol, "a");
        assert_eq!(machine.start, "q0");

        // `symbols` is optional on input.
        let json = r#"{
            "states": ["q0"],
            "transitions": [],
            "start": "q0",
            "accepting": []
        }"#;
        let machine: Machine = serde_json::from_str(json).unwrap();
        assert!(machine.symbols.is_empty());

        let roundtrip: Machine =
            serde_json::from_str(&serde_json::to_string(&ends_in_a()).unwrap()).unwrap();
        assert_eq!(roundtrip, ends_in_a());
    }

    #[test]
    fn test_validation_rejects_unknown_states() {
        let mut machine = ends_in_a();
        machine.start = "nope".into();
        assert_eq!(
            machine.simulate("a").unwrap_err(),
            AutomatonError::UnknownState {
                name: "nope".into(),
                role: "start",
            }
        );

        let mut machine = ends_in_a();
        machine.accepting.push("ghost".into());
        assert!(matches!(
            machine.minimize().unwrap_err(),
            AutomatonError::UnknownState { role: "accepting set", .. }
        ));

        let mut machine = ends_in_a();
        machine.transitions.push(transition("t4", "q1", "qx", "b"));
        assert!(matches!(
            machine.complete().unwrap_err(),
            AutomatonError::UnknownState { role: "transition destination", .. }
        ));
    }

    #[test]
    fn test_validation_rejects_duplicate_transition() {
        let mut machine = ends_in_a();
        machine.transitions.push(transition("t9", "q0", "q0", "a"));
        assert_eq!(
            machine.minimize().unwrap_err(),
            AutomatonError::DuplicateTransition {
                from: "q0".into(),
                symbol: 'a',
            }
        );
    }

    #[test]
    fn test_validation_rejects_multichar_symbol() {
        let mut machine = ends_in_a();
        machine.transitions[0].symbol = "ab".into();
        assert_eq!(
            machine.complete().unwrap_err(),
            AutomatonError::BadSymbol { symbol: "ab".into() }
        );
    }

    #[test]
    fn test_complete_adds_named_sink() {
        let machine = Machine {
            states: vec!["q0".into(), "q1".into()],
            transitions: vec![
                transition("t0", "q0", "q1", "a"),
                transition("t1", "q1", "q1", "b"),
            ],
            start: "q0".into(),
            accepting: vec!["q1".into()],
            symbols: vec![],
        };
        let completed = machine.complete().unwrap();
        assert_eq!(completed.states, vec!["q0", "q1", "__dead__"]);
        // total: 3 states x 2 symbols
        assert_eq!(completed.transitions.len(), 6);
        assert!(!completed.accepting.contains(&"__dead__".to_string()));
        assert_eq!(completed.symbols, vec!["a", "b"]);
        assert!(
            completed
                .transitions
                .iter()
                .any(|t| t.from == "q0" && t.symbol == "b" && t.to == "__dead__")
        );
        assert!(
            completed
                .transitions
                .iter()
                .filter(|t| t.from == "__dead__")
                .all(|t| t.to == "__dead__")
        );
    }

    #[test]
    fn test_complete_sink_name_avoids_collision() {
        let machine = Machine {
            states: vec!["q0".into(), "__dead__".into()],
            transitions: vec![
                transition("t0", "q0", "q0", "a"),
                transition("t1", "__dead__", "q0", "b"),
            ],
            start: "q0".into(),
            accepting: vec!["q0".into()],
            symbols: vec![],
        };
        let completed = machine.complete().unwrap();
        assert_eq!(completed.states.last().unwrap(), "__dead__2");
    }

    #[test]
    fn test_minimize_collapses_and_renames() {
        // q1 and q2 are indistinguishable.
        let machine = Machine {
            states: vec!["q0".into(), "q1".into(), "q2".into()],
            transitions: vec![
                transition("t0", "q0", "q1", "a"),
                transition("t1", "q0", "q0", "b"),
                transition("t2", "q1", "q2", "a"),
                transition("t3", "q1", "q0", "b"),
                transition("t4", "q2", "q2", "a"),
                transition("t5", "q2", "q0", "b"),
            ],
            start: "q0".into(),
            accepting: vec!["q1".into(), "q2".into()],
            symbols: vec!["a".into(), "b".into()],
        };
        let minimized = machine.minimize().unwrap();
        assert_eq!(minimized.states.len(), 2);
        assert!(minimized.states.iter().all(|name| name.starts_with('S')));

        // Same language on both machines.
        for input in ["", "a", "b", "aa", "ab", "ba", "abab", "aaba"] {
            assert_eq!(
                machine.simulate(input).unwrap().outcome.is_accepted(),
                minimized.simulate(input).unwrap().outcome.is_accepted(),
                "language changed on {input:?}"
            );
        }
    }

    #[test]
    fn test_simulate_trace_carries_edge_ids() {
        let trace = ends_in_a().simulate("ab").unwrap();
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].id, "t0");
        assert_eq!(trace.steps[0].from, "q0");
        assert_eq!(trace.steps[0].to, "q1");
        assert_eq!(trace.steps[1].id, "t3");
        assert_eq!(
            trace.outcome,
            MachineOutcome::NotAccepting { state: "q0".into() }
        );
        assert_eq!(trace.outcome.to_string(), "rejected (ended in q0)");
    }

    #[test]
    fn test_simulate_unknown_symbol_reports_position() {
        let trace = ends_in_a().simulate("acb").unwrap();
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(
            trace.outcome,
            MachineOutcome::Stuck {
                state: "q1".into(),
                symbol: 'c',
                position: 1,
            }
        );
        assert_eq!(
            trace.outcome.to_string(),
            "rejected: no transition from q1 on 'c' at position 1"
        );
    }

    #[test]
    fn test_simulate_accept_display() {
        let trace = ends_in_a().simulate("ba").unwrap();
        assert_eq!(trace.outcome.to_string(), "accepted (ended in q1)");
    }

    #[test]
    fn test_free_function_surface() {
        let machine = ends_in_a();
        assert_eq!(complete_dfa(&machine).unwrap(), machine.complete().unwrap());
        assert_eq!(minimize_dfa(&machine).unwrap(), machine.minimize().unwrap());
        assert_eq!(
            simulate_dfa(&machine, "a").unwrap(),
            machine.simulate("a").unwrap()
        );
    }
}
