use std::sync::Arc;

use dreamtales_story::StoryService;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StoryService>,
    pub config: Arc<AppConfig>,
}
