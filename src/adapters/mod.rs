//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `classifier` - JSON model package and the once-loaded model handle
//! - `report` - HTML report renderer
//! - `storage` - Conversation state storage (in-memory, YAML files)
//! - `http` - axum chat API

pub mod classifier;
pub mod http;
pub mod report;
pub mod storage;

pub use classifier::{CachedModelHandle, ModelPackage};
pub use report::HtmlReportRenderer;
pub use storage::{FileSessionStorage, InMemorySessionStorage};
