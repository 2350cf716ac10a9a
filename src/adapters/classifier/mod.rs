//! Classifier adapters.
//!
//! - `ModelPackage` - JSON linear softmax model implementing `Classifier`
//! - `CachedModelHandle` - once-initialized `ClassifierSource`

mod cached_handle;
mod model_package;

pub use cached_handle::CachedModelHandle;
pub use model_package::{ModelPackage, REQUIRED_KEYS};
