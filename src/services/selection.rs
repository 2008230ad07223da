use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{dataset::DatasetContext, error::AppError};

/// Dashboard views, addressed by the tag on their tab control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Recommendations,
    Analytics,
    Manifold,
    Evaluation,
    Pipeline,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Recommendations,
        View::Analytics,
        View::Manifold,
        View::Evaluation,
        View::Pipeline,
    ];

    /// Value of the tab control's `data-tab` attribute
    pub fn tag(self) -> &'static str {
        match self {
            View::Recommendations => "recommendations",
            View::Analytics => "analytics",
            View::Manifold => "manifold",
            View::Evaluation => "evaluation",
            View::Pipeline => "pipeline",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Recommendations => "RECOMMENDATIONS",
            View::Analytics => "ANALYTICS",
            View::Manifold => "3D MANIFOLD",
            View::Evaluation => "EVALUATION",
            View::Pipeline => "PIPELINE",
        }
    }

    /// Parses an optional tag, falling back to the default view on anything unknown
    pub fn from_tag_or_default(tag: Option<&str>) -> Self {
        match tag.map(str::parse::<View>) {
            Some(Ok(view)) => view,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Unknown view tag, using default view");
                View::default()
            }
            None => View::default(),
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for View {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        View::ALL
            .into_iter()
            .find(|view| view.tag() == tag)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown view: {}", s.trim())))
    }
}

/// The one piece of dashboard state: which title is selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    title: Option<String>,
}

impl Selection {
    /// First catalog title, or nothing for an empty catalog
    pub fn initial(context: &DatasetContext) -> Self {
        Self {
            title: context.first_title().map(str::to_string),
        }
    }

    /// Initial selection overridden by a requested title, if one was given
    pub fn from_request(context: &DatasetContext, requested: Option<&str>) -> Self {
        let mut selection = Self::initial(context);
        if let Some(title) = requested {
            selection.select(title);
        }
        selection
    }

    /// Blank titles leave the selection unchanged
    pub fn select(&mut self, title: &str) {
        let title = title.trim();
        if !title.is_empty() {
            self.title = Some(title.to_string());
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
