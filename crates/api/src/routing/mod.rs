pub mod pattern;
pub mod table;

pub use pattern::{PathPattern, Segment};
pub use table::{Route, RouteMatch, RouteTable};
