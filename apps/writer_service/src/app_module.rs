use std::sync::Arc;

use xhs_llm::PostWriter;

use crate::{config::AppConfig, error::AppError};

#[derive(Clone)]
pub struct AppService {
    pub post_writer: Arc<PostWriter>,
}

impl AppService {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let post_writer = PostWriter::new(config.writer.clone())?;

        Ok(Self {
            post_writer: Arc::new(post_writer),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            service: AppService::new(&config)?,
            config: Arc::new(config),
        })
    }
}
