//! Result compaction: keeps successful tool output within a size budget
//! before it goes back to the model.

mod truncating;

pub use truncating::TruncatingCompactor;
