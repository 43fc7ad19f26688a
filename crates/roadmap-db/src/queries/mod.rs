pub mod history;
pub mod plans;
pub mod snapshot;
