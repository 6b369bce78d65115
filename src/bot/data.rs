use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::db::CooldownStore;
use crate::services::admission::{AdmissionController, AdmissionPolicy, ForumPlatform};

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    /// Discord calls made by commands and the admission controller
    pub platform: Arc<dyn ForumPlatform>,
    pub admission: Arc<AdmissionController>,
}

impl Data {
    pub fn new(settings: Settings, platform: Arc<dyn ForumPlatform>, store: Arc<CooldownStore>) -> Self {
        let admission = Arc::new(AdmissionController::new(
            platform.clone(),
            store,
            AdmissionPolicy::from_settings(&settings),
        ));

        Self {
            settings,
            platform,
            admission,
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("admission", &self.admission)
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
