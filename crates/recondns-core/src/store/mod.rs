// # State Store Implementations
//
// - `file`: durable JSON file, the production store
// - `memory`: non-durable store for tests and embedding

pub mod file;
pub mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
