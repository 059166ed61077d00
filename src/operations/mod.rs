mod direction_segments;

pub use direction_segments::{flatten, DirectionSegments};
