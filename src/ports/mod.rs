//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Classifier` / `ClassifierSource` - The pre-trained disorder classifier
//! - `ReportRenderer` - Renders and stores the downloadable report
//! - `SessionStateStorage` - Persists conversation state between requests

mod classifier;
mod report_renderer;
mod state_storage;

pub use classifier::{Classifier, ClassifierError, ClassifierSource, ModelLoadError};
pub use report_renderer::{
    validate_report_filename, RenderedReport, ReportError, ReportRenderer, ReportRequest,
    SERVABLE_REPORT_PREFIXES,
};
pub use state_storage::{SessionStateStorage, SessionStorageError};
