use std::sync::Arc;

use nutriscan_core::application::NutriscanAppService;
use tokio::sync::Mutex;

use crate::args::Args;

/// The session is locked only around state changes, never while the model is being called.
#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: Arc<Mutex<NutriscanAppService>>,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: NutriscanAppService) -> Self {
        Self {
            args,
            service: Arc::new(Mutex::new(service)),
        }
    }
}
