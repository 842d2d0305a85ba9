use crate::config::Config;
use crate::engine::fitted::ModelHandle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Current fitted model generation. Read-only for requests; replaced
    /// wholesale on reload.
    pub model: ModelHandle,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(model: crate::engine::fitted::FittedModel) -> Self {
        Self {
            config: Config {
                corpus_path: "/nonexistent/corpus.csv".into(),
                port: 0,
                rust_log: "debug".to_string(),
                holdout_fraction: 0.0,
                split_seed: 4,
                nb_alpha: 1.0,
            },
            model: ModelHandle::new(model),
        }
    }
}
