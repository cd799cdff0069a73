//! Coarsest-partition refinement of DFA states (Hopcroft's algorithm).

use std::collections::VecDeque;

use crate::dfa::Dfa;
use crate::state::{StateId, StateSet};

/// A partition of DFA states into disjoint, non-empty blocks.
///
/// Blocks are addressed by index into [`Partition::blocks`]; splits replace
/// a block in place and append the split-off part, so indices stay valid
/// while the partition is refined.
#[derive(Debug, Clone)]
pub struct Partition {
    blocks: Vec<StateSet>,
    block_of: Vec<usize>,
}

impl Partition {
    /// The blocks, in a stable order: the initial accepting/non-accepting
    /// blocks first, then split-off parts in the order they were created.
    pub fn blocks(&self) -> &[StateSet] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the partition has no blocks (only true for a stateless DFA).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The index of the block containing `state`.
    pub fn block_of(&self, state: StateId) -> Option<usize> {
        self.block_of.get(state as usize).copied()
    }
}

/// Compute the coarsest partition of `dfa`'s states that separates accepting
/// from non-accepting states and is stable: for every block B and symbol c,
/// all states of B transition on c into one block.
///
/// `dfa` must have a total transition function over its alphabet (run
/// [`Dfa::complete`] first); stability is only meaningful for total
/// functions.
pub fn refine(dfa: &Dfa) -> Partition {
    let num_states = dfa.num_states() as usize;
    let alphabet = dfa.alphabet();

    // Initial partition: accepting / non-accepting, skipping empty blocks.
    let mut non_accepting = StateSet::with_capacity(num_states);
    for state in 0..dfa.num_states() {
        if !dfa.is_accepting(state) {
            non_accepting.insert(state);
        }
    }
    let mut blocks: Vec<StateSet> = Vec::new();
    if !dfa.accepting().is_empty() {
        blocks.push(dfa.accepting().clone());
    }
    if !non_accepting.is_empty() {
        blocks.push(non_accepting);
    }

    let mut block_of = vec![0usize; num_states];
    for (idx, block) in blocks.iter().enumerate() {
        for state in block.iter() {
            block_of[state as usize] = idx;
        }
    }

    // Worklist of splitter block indices; `pending` mirrors membership.
    let mut worklist: VecDeque<usize> = (0..blocks.len()).collect();
    let mut pending = vec![true; blocks.len()];

    while let Some(splitter_idx) = worklist.pop_front() {
        pending[splitter_idx] = false;
        // The splitter is frozen for this round even if its block splits
        // below; the preimage of the union is still a valid splitter.
        let splitter = blocks[splitter_idx].clone();

        for &symbol in &alphabet {
            let preimage = dfa.predecessors(&splitter, symbol);
            if preimage.is_empty() {
                continue;
            }

            let candidates = blocks.len();
            for y in 0..candidates {
                let keep = blocks[y].intersection(&preimage);
                if keep.is_empty() || keep.len() == blocks[y].len() {
                    continue;
                }
                let moved = blocks[y].difference(&preimage);

                let new_idx = blocks.len();
                for state in moved.iter() {
                    block_of[state as usize] = new_idx;
                }
                blocks[y] = keep;
                blocks.push(moved);
                pending.push(false);

                if pending[y] {
                    // Y was still queued: both halves must be reprocessed.
                    pending[new_idx] = true;
                    worklist.push_back(new_idx);
                } else {
                    let smaller = if blocks[y].len() <= blocks[new_idx].len() {
                        y
                    } else {
                        new_idx
                    };
                    pending[smaller] = true;
                    worklist.push_back(smaller);
                }
            }
        }
    }

    Partition { blocks, block_of }
}
