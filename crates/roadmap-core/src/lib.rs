//! Teaching-plan services: plan CRUD, nested task mutation, model feedback
//! and the operation audit trail.

pub mod audit;
pub mod document;
pub mod error;
pub mod feedback;
pub mod locks;
pub mod plan;
pub mod service;
pub mod task;

pub use error::ServiceError;
pub use service::Roadmap;
