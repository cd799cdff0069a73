//! DFA minimization: quotient construction over the refined partition.

use crate::dfa::Dfa;
use crate::error::AutomatonError;
use crate::partition::{Partition, refine};
use crate::state::StateId;

/// Minimize `dfa`, returning a fresh DFA that accepts the same language with
/// the fewest possible reachable states.
///
/// The input is completed first, so a partial transition function is fine;
/// any sink introduced by completion that ends up unreachable is pruned from
/// the result along with every other unreachable state.
pub fn minimize(dfa: &Dfa) -> Result<Dfa, AutomatonError> {
    if dfa.start().is_none() {
        return Err(AutomatonError::MissingStart);
    }
    let completed = dfa.complete();
    let partition = refine(&completed);
    let quotient = build_quotient(&completed, &partition)?;
    Ok(prune_unreachable(&quotient))
}

/// Build the quotient DFA: one fresh state per block, in block-index order.
fn build_quotient(dfa: &Dfa, partition: &Partition) -> Result<Dfa, AutomatonError> {
    let alphabet = dfa.alphabet();
    let mut quotient = Dfa::new();
    for _ in 0..partition.len() {
        quotient.add_state();
    }

    let start = dfa.start().ok_or(AutomatonError::MissingStart)?;
    let start_block = partition
        .block_of(start)
        .ok_or(AutomatonError::StartBlockLost)?;
    quotient.set_start(start_block as StateId);

    for (idx, block) in partition.blocks().iter().enumerate() {
        // Stability makes accepting all-or-nothing per block; testing for
        // any member keeps the check tolerant.
        if block.intersects(dfa.accepting()) {
            quotient.add_accepting(idx as StateId);
        }

        // Any member works as representative; take the lowest id.
        let Some(representative) = block.iter().next() else {
            continue;
        };
        for &symbol in &alphabet {
            if let Some(destination) = dfa.transition(representative, symbol) {
                if let Some(target_block) = partition.block_of(destination) {
                    quotient.add_transition(idx as StateId, symbol, target_block as StateId);
                }
            }
        }
    }

    Ok(quotient)
}

/// Drop every state not reachable from the start, re-indexing the survivors
/// in their existing order.
fn prune_unreachable(dfa: &Dfa) -> Dfa {
    let reachable = dfa.reachable_from_start();
    if reachable.len() == dfa.num_states() as usize {
        return dfa.clone();
    }

    let mut remap: Vec<Option<StateId>> = vec![None; dfa.num_states() as usize];
    let mut pruned = Dfa::new();
    for state in reachable.iter() {
        remap[state as usize] = Some(pruned.add_state());
    }

    if let Some(start) = dfa.start() {
        if let Some(new_start) = remap[start as usize] {
            pruned.set_start(new_start);
        }
    }
    for state in reachable.iter() {
        if dfa.is_accepting(state) {
            if let Some(new_state) = remap[state as usize] {
                pruned.add_accepting(new_state);
            }
        }
    }
    for (source, symbol, destination) in dfa.transitions() {
        if let (Some(new_source), Some(new_destination)) =
            (remap[source as usize], remap[destination as usize])
        {
            pruned.add_transition(new_source, symbol, new_destination);
        }
    }

    pruned
}
