use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::store::CandidateStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The coordinator owns the classify → fetch → rank pipeline;
/// the store handle is shared for the admin partition endpoints.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Coordinator,
    pub store: CandidateStore,
    pub config: Config,
}
