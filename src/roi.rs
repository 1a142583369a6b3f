//! Region-of-interest zones and alerting.

mod alert;
mod monitor;
mod zone;

pub use alert::{Alert, AlertLog, DEFAULT_ALERT_CAPACITY, Severity};
pub use monitor::{RoiMonitor, ZoneOccupancy};
pub use zone::{RoiZone, ZoneKind};
