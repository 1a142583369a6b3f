//! Zone registry and per-frame violation checks.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::roi::alert::{Alert, AlertLog, Severity};
use crate::roi::zone::{RoiZone, ZoneKind};
use crate::tracker::{Detection, Rect};

/// Detections whose centre lies inside one active zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneOccupancy {
    pub zone_id: u64,
    pub zone_name: String,
    pub kind: ZoneKind,
    pub count: usize,
    /// Track ids of the occupants, untracked detections omitted
    pub track_ids: Vec<u64>,
}

/// Owns the configured zones and the alert history.
#[derive(Debug, Clone, Default)]
pub struct RoiMonitor {
    zones: Vec<RoiZone>,
    alerts: AlertLog,
    next_zone_id: u64,
    next_alert_id: u64,
}

impl RoiMonitor {
    /// Monitor with no zones and the default alert capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor keeping at most `capacity` alerts.
    pub fn with_alert_capacity(capacity: usize) -> Self {
        Self {
            alerts: AlertLog::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Register a new active zone and return its id.
    pub fn add_zone(&mut self, name: impl Into<String>, kind: ZoneKind, rect: Rect) -> Result<u64> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidZone("zone name must not be empty".into()));
        }
        if !rect.is_valid() {
            return Err(Error::InvalidZone(format!(
                "zone {name:?} has invalid geometry {:?}",
                rect.to_tlwh()
            )));
        }

        self.next_zone_id += 1;
        let id = self.next_zone_id;
        log::debug!("added {kind:?} zone {id} ({name})");
        self.zones.push(RoiZone::new(id, name, kind, rect));
        Ok(id)
    }

    /// Delete a zone together with its alert counter.
    pub fn remove_zone(&mut self, id: u64) -> Result<RoiZone> {
        let pos = self
            .zones
            .iter()
            .position(|z| z.id == id)
            .ok_or(Error::UnknownZone(id))?;
        Ok(self.zones.remove(pos))
    }

    /// Enable or disable alerting and occupancy for a zone.
    pub fn set_active(&mut self, id: u64, active: bool) -> Result<()> {
        self.zone_mut(id)?.active = active;
        Ok(())
    }

    /// Flip the active flag and return the new value.
    pub fn toggle_zone(&mut self, id: u64) -> Result<bool> {
        let zone = self.zone_mut(id)?;
        zone.active = !zone.active;
        Ok(zone.active)
    }

    /// Move or resize a zone. Its counter and active flag are kept.
    pub fn update_zone_rect(&mut self, id: u64, rect: Rect) -> Result<()> {
        if !rect.is_valid() {
            return Err(Error::InvalidZone(format!(
                "invalid geometry {:?}",
                rect.to_tlwh()
            )));
        }
        self.zone_mut(id)?.rect = rect;
        Ok(())
    }

    /// Get a zone by id.
    pub fn zone(&self, id: u64) -> Option<&RoiZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// All zones in creation order.
    pub fn zones(&self) -> &[RoiZone] {
        &self.zones
    }

    /// Get a reference to the alert history.
    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Empty the alert history. Zone counters are kept.
    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    /// Evaluate every detection against every active restricted zone.
    ///
    /// Each hit bumps the zone's counter and lands in the alert history.
    /// Returns the alerts raised by this frame, in detection-major order.
    pub fn check(&mut self, detections: &[Detection], timestamp_ms: u64) -> Vec<Alert> {
        let mut raised = Vec::new();

        for det in detections {
            for zone in self.zones.iter_mut() {
                if !zone.active || !zone.kind.raises_alerts() || !zone.contains(&det.center) {
                    continue;
                }

                zone.alert_count += 1;
                self.next_alert_id += 1;
                let alert = Alert {
                    id: self.next_alert_id,
                    zone_id: zone.id,
                    zone_name: zone.name.clone(),
                    label: det.label.clone(),
                    track_id: det.track_id,
                    timestamp_ms,
                    severity: Severity::High,
                };
                log::warn!(
                    "{} entered restricted zone {} (track {:?})",
                    alert.label,
                    alert.zone_name,
                    alert.track_id
                );
                self.alerts.push(alert.clone());
                raised.push(alert);
            }
        }

        raised
    }

    /// Occupancy of every active zone, whatever its kind.
    pub fn occupancy(&self, detections: &[Detection]) -> Vec<ZoneOccupancy> {
        self.zones
            .iter()
            .filter(|z| z.active)
            .map(|zone| {
                let inside: Vec<&Detection> = detections
                    .iter()
                    .filter(|d| zone.contains(&d.center))
                    .collect();
                ZoneOccupancy {
                    zone_id: zone.id,
                    zone_name: zone.name.clone(),
                    kind: zone.kind,
                    count: inside.len(),
                    track_ids: inside.iter().filter_map(|d| d.track_id).collect(),
                }
            })
            .collect()
    }

    fn zone_mut(&mut self, id: u64) -> Result<&mut RoiZone> {
        self.zones
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or(Error::UnknownZone(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::Prediction;

    /// Detection centred on (cx, cy).
    fn det_at(label: &str, cx: f32, cy: f32) -> Detection {
        let prediction = Prediction::new(label, 0.9, Rect::from_center(cx, cy, 10.0, 10.0));
        Detection::from_prediction(&prediction, 0, 0)
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let mut monitor = RoiMonitor::new();
        monitor
            .add_zone("gate", ZoneKind::Restricted, Rect::new(100.0, 100.0, 200.0, 100.0))
            .unwrap();

        let alerts = monitor.check(&[det_at("person", 300.0, 200.0)], 5);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].zone_name, "gate");
    }

    #[test]
    fn test_inactive_and_non_restricted_zones_are_silent() {
        let mut monitor = RoiMonitor::new();
        let restricted = monitor
            .add_zone("vault", ZoneKind::Restricted, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        monitor
            .add_zone("aisle", ZoneKind::Monitored, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        monitor
            .add_zone("entry", ZoneKind::Counting, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        monitor.set_active(restricted, false).unwrap();

        let dets = [det_at("person", 50.0, 50.0)];
        assert!(monitor.check(&dets, 0).is_empty());
        assert!(monitor.alerts().is_empty());

        let occupancy = monitor.occupancy(&dets);
        assert_eq!(occupancy.len(), 2);
        assert!(occupancy.iter().all(|o| o.count == 1));
    }

    #[test]
    fn test_cross_product_of_detections_and_zones() {
        let mut monitor = RoiMonitor::new();
        let a = monitor
            .add_zone("a", ZoneKind::Restricted, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let b = monitor
            .add_zone("b", ZoneKind::Restricted, Rect::new(50.0, 50.0, 100.0, 100.0))
            .unwrap();

        let dets = [det_at("person", 75.0, 75.0), det_at("dog", 20.0, 20.0)];
        let alerts = monitor.check(&dets, 0);

        assert_eq!(alerts.len(), 3);
        assert_eq!(monitor.zone(a).unwrap().alert_count, 2);
        assert_eq!(monitor.zone(b).unwrap().alert_count, 1);
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut monitor = RoiMonitor::new();
        let id = monitor
            .add_zone("dock", ZoneKind::Counting, Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();

        assert_eq!(monitor.toggle_zone(id).unwrap(), false);
        assert_eq!(monitor.toggle_zone(id).unwrap(), true);

        let removed = monitor.remove_zone(id).unwrap();
        assert_eq!(removed.name, "dock");
        assert!(matches!(monitor.remove_zone(id), Err(Error::UnknownZone(_))));
        assert!(matches!(monitor.toggle_zone(id), Err(Error::UnknownZone(_))));
    }

    #[test]
    fn test_rejects_invalid_zones() {
        let mut monitor = RoiMonitor::new();
        assert!(matches!(
            monitor.add_zone(" ", ZoneKind::Restricted, Rect::new(0.0, 0.0, 1.0, 1.0)),
            Err(Error::InvalidZone(_))
        ));
        assert!(matches!(
            monitor.add_zone("bad", ZoneKind::Restricted, Rect::new(0.0, 0.0, -5.0, 1.0)),
            Err(Error::InvalidZone(_))
        ));
        assert!(monitor.zones().is_empty());
    }

    #[test]
    fn test_clear_alerts_keeps_counters() {
        let mut monitor = RoiMonitor::new();
        let id = monitor
            .add_zone("yard", ZoneKind::Restricted, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        monitor.check(&[det_at("person", 50.0, 50.0)], 1);
        assert_eq!(monitor.alerts().len(), 1);

        monitor.clear_alerts();
        assert!(monitor.alerts().is_empty());
        assert_eq!(monitor.zone(id).unwrap().alert_count, 1);

        monitor.check(&[det_at("person", 50.0, 50.0)], 2);
        assert_eq!(monitor.alerts().len(), 1);
        assert_eq!(monitor.zone(id).unwrap().alert_count, 2);
    }

    #[test]
    fn test_update_zone_rect() {
        let mut monitor = RoiMonitor::new();
        let id = monitor
            .add_zone("lot", ZoneKind::Restricted, Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        monitor
            .update_zone_rect(id, Rect::new(100.0, 100.0, 50.0, 50.0))
            .unwrap();

        assert_eq!(monitor.check(&[det_at("car", 125.0, 125.0)], 0).len(), 1);
    }
}
