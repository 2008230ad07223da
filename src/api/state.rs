use std::sync::Arc;

use crate::{
    dataset::DatasetContext,
    error::{AppError, AppResult},
    render::Assets,
    services::Enrichment,
};

/// Whether the required datasets loaded at startup
#[derive(Clone)]
pub enum DatasetState {
    Ready(Arc<DatasetContext>),
    Unavailable,
}

/// Shared application state; nothing in it changes after startup
#[derive(Clone)]
pub struct AppState {
    pub dataset: DatasetState,
    pub enrichment: Enrichment,
    pub assets: Arc<Assets>,
}

impl AppState {
    /// A failed load is kept so every route can answer with a visible error
    pub fn new(dataset: AppResult<DatasetContext>, enrichment: Enrichment, assets: Assets) -> Self {
        let dataset = match dataset {
            Ok(context) => DatasetState::Ready(Arc::new(context)),
            Err(e) => {
                tracing::error!(error = %e, "Required dataset failed to load; serving error pages");
                DatasetState::Unavailable
            }
        };

        Self {
            dataset,
            enrichment,
            assets: Arc::new(assets),
        }
    }

    pub fn dataset(&self) -> AppResult<&DatasetContext> {
        match &self.dataset {
            DatasetState::Ready(context) => Ok(context.as_ref()),
            DatasetState::Unavailable => Err(AppError::DatasetUnavailable(
                "Data artifacts not found".to_string(),
            )),
        }
    }
}
