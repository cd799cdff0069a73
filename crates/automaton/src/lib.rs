//! DFA minimization and deterministic simulation engine.
//!
//! This crate is the algorithmic core behind the regex-to-DFA visualizer.
//! Regex parsing and NFA/DFA construction happen in the conversion service;
//! this crate picks up from an already-built DFA and provides:
//!
//! - Transition-function completion via a synthetic sink state
//! - Coarsest-partition (Hopcroft) state minimization with reachability
//!   pruning
//! - Step-by-step deterministic simulation traces
//! - The wire-shaped machine model exchanged with the conversion service
//! - Paced trace playback for animated presentation

pub mod dfa;
pub mod error;
pub mod machine;
pub mod minimize;
pub mod partition;
pub mod player;
pub mod simulate;
pub mod state;
pub mod symbol;

pub use dfa::Dfa;
pub use error::AutomatonError;
pub use machine::{
    Machine, MachineOutcome, MachineStep, MachineTrace, MachineTransition, complete_dfa,
    minimize_dfa, simulate_dfa,
};
pub use minimize::minimize;
pub use partition::{Partition, refine};
pub use player::{Paced, pace};
pub use simulate::{Outcome, Step, Trace, simulate};
pub use state::{StateId, StateSet};
pub use symbol::SymbolId;
