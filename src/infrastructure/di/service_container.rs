//! Service container for dependency injection
//!
//! Wires the controller to its store and settings.

use std::sync::Arc;

use crate::application::services::TopicTreeController;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{TopicStore, XmlTopicStore};

/// Container holding the application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Backing store of the topic document
    pub store: Arc<dyn TopicStore>,
}

impl ServiceContainer {
    /// Create a container backed by the XML file named in the settings.
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(XmlTopicStore::new(settings.data_file.clone()));
        Self::with_deps(settings, store)
    }

    /// Create a container with a custom store (for testing).
    pub fn with_deps(settings: Settings, store: Arc<dyn TopicStore>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, store }
    }

    /// Load the document and hand out a controller owning it.
    pub fn open_controller(&self) -> ApplicationResult<TopicTreeController> {
        TopicTreeController::open(Arc::clone(&self.store), self.settings.title_scope)
    }
}
