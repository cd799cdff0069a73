//! Deterministic DFA simulation producing a step-by-step trace.

use crate::dfa::Dfa;
use crate::error::AutomatonError;
use crate::state::StateId;
use crate::symbol::SymbolId;

/// A single transition taken during a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// State before the transition.
    pub from: StateId,
    /// Symbol consumed.
    pub symbol: SymbolId,
    /// State after the transition.
    pub to: StateId,
}

/// Terminal outcome of a simulation run.
///
/// Both rejection kinds are normal outcomes, not errors: `Stuck` means the
/// walk ran out of transitions mid-input, `NotAccepting` means the input was
/// consumed but ended in a non-accepting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All input consumed and the final state is accepting.
    Accepted {
        /// The accepting final state.
        state: StateId,
    },
    /// No transition was defined for `symbol` at `state`.
    Stuck {
        /// The state the walk was stuck in.
        state: StateId,
        /// The symbol with no transition.
        symbol: SymbolId,
        /// 0-based position of the offending symbol in the input.
        position: usize,
    },
    /// All input consumed but the final state is not accepting.
    NotAccepting {
        /// The non-accepting final state.
        state: StateId,
    },
}

impl Outcome {
    /// Whether the input was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }
}

/// The full record of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Transitions taken, in input order.
    pub steps: Vec<Step>,
    /// How the run ended.
    pub outcome: Outcome,
}

/// Walk `input` over `dfa` from its start state.
///
/// The whole trace is computed eagerly and the DFA is never modified, so
/// identical `(dfa, input)` pairs always yield identical traces. The only
/// error is a DFA without a start state; rejection is reported through the
/// trace's [`Outcome`].
pub fn simulate(dfa: &Dfa, input: &[SymbolId]) -> Result<Trace, AutomatonError> {
    let mut current = dfa.start().ok_or(AutomatonError::MissingStart)?;
    let mut steps = Vec::with_capacity(input.len());

    for (position, &symbol) in input.iter().enumerate() {
        match dfa.transition(current, symbol) {
            Some(next) => {
                steps.push(Step {
                    from: current,
                    symbol,
                    to: next,
                });
                current = next;
            }
            None => {
                return Ok(Trace {
                    steps,
                    outcome: Outcome::Stuck {
                        state: current,
                        symbol,
                        position,
                    },
                });
            }
        }
    }

    let outcome = if dfa.is_accepting(current) {
        Outcome::Accepted { state: current }
    } else {
        Outcome::NotAccepting { state: current }
    };
    Ok(Trace { steps, outcome })
}
