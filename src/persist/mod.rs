pub mod format;
mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};
