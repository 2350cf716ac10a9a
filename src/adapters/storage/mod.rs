//! Storage Adapters
//!
//! Implementations of the SessionStateStorage port for persisting
//! conversation state between requests.
//!
//! ## Available Adapters
//!
//! - **FileSessionStorage** - Stores state as YAML files on disk
//! - **InMemorySessionStorage** - Stores state in memory (default, testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionStorage, InMemorySessionStorage};
//!
//! // Durable: file-based storage
//! let storage = FileSessionStorage::new("./data/sessions");
//!
//! // Default: in-memory storage
//! let storage = InMemorySessionStorage::new();
//! ```

mod file_state_storage;
mod in_memory_state_storage;

pub use file_state_storage::FileSessionStorage;
pub use in_memory_state_storage::InMemorySessionStorage;
