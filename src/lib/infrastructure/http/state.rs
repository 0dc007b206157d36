//! Application state module

use std::fmt;
use std::sync::Arc;

use crate::domain::email::service::DispatchService;

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// The destination address for contact-form mail
    pub contact_email: Option<String>,

    /// The sender address used when a request omits `from`
    pub default_from: Option<String>,
}

/// Global application state
pub struct AppState<D: DispatchService> {
    /// The application configuration
    pub config: AppConfig,

    /// The email dispatch service
    pub dispatch: Arc<D>,
}

impl<D: DispatchService> AppState<D> {
    /// Create a new application state
    pub fn new(config: AppConfig, dispatch: D) -> Self {
        Self {
            config,
            dispatch: Arc::new(dispatch),
        }
    }
}

impl<D: DispatchService> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<D: DispatchService> fmt::Debug for AppState<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("dispatch", &"DispatchService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::email::service::MockDispatchService;

#[cfg(test)]
pub fn test_state(dispatch: Option<MockDispatchService>) -> AppState<MockDispatchService> {
    let dispatch = dispatch
        .map(Arc::new)
        .unwrap_or_else(|| Arc::new(MockDispatchService::new()));

    let config = AppConfig {
        contact_email: Some("owner@example.com".to_string()),
        default_from: Some("noreply@example.com".to_string()),
    };

    AppState { config, dispatch }
}
