//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain port, the validator, and the configured page limits,
//! and remain testable without I/O.

use std::sync::Arc;

use pagination::PageLimits;

use crate::domain::Validator;
use crate::domain::ports::UserRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Persistence port for user records.
    pub users: Arc<dyn UserRepository>,
    /// Stateless field validator applied before every write.
    pub validator: Validator,
    /// Configured default/maximum page size for list requests.
    pub page_limits: PageLimits,
}

impl HttpState {
    /// Bundle the handler dependencies.
    pub fn new(users: Arc<dyn UserRepository>, validator: Validator, page_limits: PageLimits) -> Self {
        Self {
            users,
            validator,
            page_limits,
        }
    }
}
