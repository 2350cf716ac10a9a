//! Once-initialized shared classifier handle.
//!
//! The artifact is read on first use and shared by every session for the
//! rest of the process. Concurrent first callers block on a single load.
//! A failed load is not cached, so the next call tries again.

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ports::{Classifier, ClassifierSource, ModelLoadError};

use super::model_package::ModelPackage;

pub struct CachedModelHandle {
    path: PathBuf,
    cell: OnceCell<Arc<dyn Classifier>>,
}

impl CachedModelHandle {
    /// Handle that loads the package at `path` on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Handle around an already loaded classifier.
    pub fn preloaded(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceCell::with_value(classifier),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl ClassifierSource for CachedModelHandle {
    fn classifier(&self) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        self.cell
            .get_or_try_init(|| {
                let package = ModelPackage::load(&self.path).map_err(|e| {
                    warn!(path = %self.path.display(), error = %e, "Classifier load failed");
                    e
                })?;
                info!(
                    path = %self.path.display(),
                    features = package.feature_names().len(),
                    "Classifier loaded"
                );
                Ok(Arc::new(package) as Arc<dyn Classifier>)
            })
            .map(Arc::clone)
    }
}
