//! Nearest-neighbour tracker carrying ids across consecutive frames.

use serde::Deserialize;

use crate::tracker::detection::Detection;
use crate::tracker::matching;

/// Default maximum centre distance, in source pixels, for a continuation.
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 100.0;

/// How current detections are paired with the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Every detection independently takes its nearest same-label
    /// predecessor. Two detections may inherit the same track id.
    #[default]
    Greedy,
    /// One-to-one minimum total distance assignment.
    Exclusive,
}

/// Configuration for the ProximityTracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Matches require a centre distance strictly below this value.
    pub distance_threshold: f32,
    pub strategy: MatchStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            strategy: MatchStrategy::Greedy,
        }
    }
}

/// Single-frame-memory tracker.
///
/// State is the next unused track id and a snapshot of the last frame's
/// tracked detections. Nothing older than one frame is remembered.
#[derive(Debug, Clone)]
pub struct ProximityTracker {
    config: TrackerConfig,
    next_track_id: u64,
    previous: Vec<Detection>,
}

impl Default for ProximityTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl ProximityTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            next_track_id: 1,
            previous: Vec::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Assign a track id to every detection of the current frame, in place.
    ///
    /// Afterwards the detections replace the stored previous frame.
    pub fn update(&mut self, detections: &mut [Detection]) {
        let dists = matching::center_distance(detections, &self.previous);
        let assignment = match self.config.strategy {
            MatchStrategy::Greedy => {
                matching::greedy_nearest(&dists, self.config.distance_threshold)
            }
            MatchStrategy::Exclusive => {
                matching::exclusive_assignment(&dists, self.config.distance_threshold)
            }
        };

        for (det, matched) in detections.iter_mut().zip(assignment) {
            det.track_id = match matched.and_then(|j| self.previous[j].track_id) {
                Some(id) => Some(id),
                None => {
                    let id = self.allocate_id();
                    log::debug!("new track {id} for {} at {:?}", det.label, det.center);
                    Some(id)
                }
            };
        }

        self.previous = detections.to_vec();
    }

    /// Forget the previous frame and restart numbering at 1.
    pub fn reset(&mut self) {
        self.next_track_id = 1;
        self.previous.clear();
    }

    /// Detections of the last frame passed to [`update`](Self::update).
    pub fn previous(&self) -> &[Detection] {
        &self.previous
    }

    /// The id the next new track will receive.
    pub fn next_track_id(&self) -> u64 {
        self.next_track_id
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_track_id;
        self.next_track_id += 1;
        id
    }
}
