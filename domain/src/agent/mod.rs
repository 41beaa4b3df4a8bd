//! Agent loop policies that need no I/O.

pub mod budget;
pub mod fallback;

pub use budget::{BASE_ITERATIONS, calculate_max_iterations};
pub use fallback::{NO_TOOLS_FALLBACK, fallback_text};
