//! Plan service: whole-document operations and the cross-plan week view.

mod service;
mod week_view;

pub use service::PlanDocument;
pub use week_view::{PlanWeeks, WeekView, WeekViewDay, WeekViewTask, build_week_view};
