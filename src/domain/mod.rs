//! Domain layer: remote records, view state and the events they raise
pub mod aggregates;
pub mod events;
pub mod value_objects;
