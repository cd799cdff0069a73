//! Error types for DFA validation and minimization.

use thiserror::Error;

/// Errors surfaced by machine validation and the minimization pipeline.
///
/// A simulation that rejects its input is not an error; rejection is a
/// normal outcome reported through [`crate::simulate::Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// A state name referenced by a transition, the accepting set, or the
    /// start field is not a member of `states`.
    #[error("unknown state `{name}` referenced by {role}")]
    UnknownState {
        /// The unresolved state name.
        name: String,
        /// Which field referenced it.
        role: &'static str,
    },

    /// Two transitions leave the same state on the same symbol.
    #[error("duplicate transition from `{from}` on '{symbol}'")]
    DuplicateTransition {
        /// Source state name.
        from: String,
        /// The doubly-defined symbol.
        symbol: char,
    },

    /// A wire transition symbol is not a single character.
    #[error("transition symbol `{symbol}` is not a single character")]
    BadSymbol {
        /// The offending symbol string.
        symbol: String,
    },

    /// The DFA has no start state.
    #[error("DFA has no start state")]
    MissingStart,

    /// The start state was not assigned to any partition block. A consistent
    /// refinement covers every state, so this indicates a bug rather than bad
    /// input.
    #[error("start state lost during partition refinement")]
    StartBlockLost,
}
