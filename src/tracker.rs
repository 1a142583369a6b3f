mod detection;
pub mod matching;
mod proximity_tracker;
mod rect;

pub use detection::Detection;
pub use proximity_tracker::{
    DEFAULT_DISTANCE_THRESHOLD, MatchStrategy, ProximityTracker, TrackerConfig,
};
pub use rect::Rect;
