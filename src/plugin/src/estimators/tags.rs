//! Lenient numeric tag parsing.
//!
//! One malformed tag must never abort an RPC: absent tags take the
//! service's documented default, while present-but-unusable values (garbage
//! or negative) count as zero and leave a warning in the log stream.

use tracing::warn;

use crate::resource::ResourceDescriptor;

pub struct TagNumber {
    pub value: f64,
    /// True when no key was present and the default applied.
    pub defaulted: bool,
}

pub fn numeric(resource: &ResourceDescriptor, keys: &[&str], default: f64) -> TagNumber {
    for key in keys {
        let Some(raw) = resource.tag(key) else { continue };
        match raw.trim().parse::<f64>() {
            Ok(value) if value >= 0.0 && value.is_finite() => {
                return TagNumber { value, defaulted: false };
            }
            _ => {
                warn!(tag = %key, value = %raw, "unusable numeric tag value, counting as 0");
                return TagNumber { value: 0.0, defaulted: false };
            }
        }
    }
    TagNumber { value: default, defaulted: true }
}
