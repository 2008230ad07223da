pub mod analytics;
pub mod posters;
pub mod profile;
pub mod providers;
pub mod recommendations;
pub mod search;
pub mod selection;
pub mod vibe;

pub use posters::PosterResolver;
pub use profile::{TargetProfile, TargetProfiler};
pub use selection::{Selection, View};

/// Remote lookups that decorate rendered views
#[derive(Clone)]
pub struct Enrichment {
    pub posters: PosterResolver,
    pub profiler: TargetProfiler,
}

impl Enrichment {
    pub fn new(posters: PosterResolver, profiler: TargetProfiler) -> Self {
        Self { posters, profiler }
    }
}
