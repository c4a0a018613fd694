use godon_core::StreamResolver;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    resolver: Arc<StreamResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<StreamResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &StreamResolver {
        self.resolver.as_ref()
    }
}
