use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::tracker::Rect;

/// What a zone is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// Presence inside raises an alert.
    Restricted,
    Monitored,
    Counting,
}

impl ZoneKind {
    pub fn raises_alerts(self) -> bool {
        matches!(self, ZoneKind::Restricted)
    }
}

/// A named rectangular region of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiZone {
    pub id: u64,
    pub name: String,
    pub kind: ZoneKind,
    pub rect: Rect,
    pub active: bool,
    /// Violations recorded since the zone was created.
    pub alert_count: u64,
}

impl RoiZone {
    pub fn new(id: u64, name: impl Into<String>, kind: ZoneKind, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            rect,
            active: true,
            alert_count: 0,
        }
    }

    /// Boundary-inclusive point test.
    #[inline]
    pub fn contains(&self, point: &Point2<f32>) -> bool {
        self.rect.contains(point)
    }
}
