//! Vector index backends

mod file;
mod flat;
mod in_memory;

pub use file::FileVectorIndex;
pub use in_memory::InMemoryVectorIndex;
