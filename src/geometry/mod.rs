pub mod line;
pub mod segment;

pub use line::{GenericLine, Line2, Line2f, Line3, Line3f};
pub use segment::{GenericSegment, Segment2, Segment2f, Segment3, Segment3f};
