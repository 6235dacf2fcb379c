use crate::config::Config;
use crate::engine::ScoringEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoringEngine>,
    pub config: Config,
}
