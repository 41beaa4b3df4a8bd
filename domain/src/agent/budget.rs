//! Iteration budget for the conversation loop.

use crate::session::history::History;

/// Iterations granted to a fresh conversation.
pub const BASE_ITERATIONS: usize = 50;

/// Maximum loop iterations for a conversation of `history`'s length.
///
/// Longer conversations get a larger budget: 50 up to 10 exchanges, then 75,
/// 100 past 20 and 150 past 30.
pub fn calculate_max_iterations(history: &History) -> usize {
    max_iterations_for_turns(history.turn_count())
}

pub fn max_iterations_for_turns(turns: usize) -> usize {
    let bonus = if turns > 30 {
        100
    } else if turns > 20 {
        50
    } else if turns > 10 {
        25
    } else {
        0
    };
    BASE_ITERATIONS + bonus
}
