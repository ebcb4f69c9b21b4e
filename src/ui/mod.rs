pub mod plant_view;
pub mod queue_view;

pub use queue_view::QueueView;
