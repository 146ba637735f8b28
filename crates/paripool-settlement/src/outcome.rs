//! Plurality outcome selection.
//!
//! The winning option is the one holding the largest staked total. The scan
//! walks options in ascending index order and only a strictly greater total
//! displaces the current leader, so ties always resolve to the lowest index.
//!
//! The selection is deterministic: same tallies → same outcome.

use paripool_types::{OptionId, OptionTallies};

/// Select the winning option from the final tallies.
///
/// Walks [`OptionId::ALL`] in index order, keeping the first option whose
/// total exceeds every earlier one. An all-zero board yields option 0.
#[must_use]
pub fn select_outcome(tallies: &OptionTallies) -> OptionId {
    let mut winner = OptionId::ALL[0];
    let mut best = tallies.get(winner);

    for option in OptionId::ALL.into_iter().skip(1) {
        let total = tallies.get(option);
        if total > best {
            winner = option;
            best = total;
        }
    }

    winner
}
