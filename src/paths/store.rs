//! Per-path metrics cache owned by the driver.

use super::{build_geometry, GeometryInputs, PathGeometry, PathShape};
use crate::config::PathId;
use std::collections::HashMap;

/// Cached geometry of one path and the inputs it was built from.
#[derive(Debug, Clone)]
pub struct PathMetrics {
    pub inputs: GeometryInputs,
    /// `None` when the path is malformed and skipped.
    pub geometry: Option<PathGeometry>,
}

impl PathMetrics {
    /// Total arc length, or 1px for skipped paths.
    pub fn total_length(&self) -> f32 {
        self.geometry.as_ref().map_or(1.0, |g| g.total_length())
    }
}

/// Geometry cache keyed by path id.
///
/// Entries are rebuilt only when their [`GeometryInputs`] change.
#[derive(Debug, Default)]
pub struct PathMetricsStore {
    entries: HashMap<PathId, PathMetrics>,
    rebuilds: u64,
}

impl PathMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached metrics for `id`, rebuilt if `inputs` differ from the cached ones.
    pub fn get_or_build(&mut self, id: PathId, inputs: GeometryInputs) -> &PathMetrics {
        let stale = self.entries.get(&id).map_or(true, |m| m.inputs != inputs);
        if stale {
            self.rebuilds += 1;
            let geometry = match build_geometry(&inputs) {
                Ok(g) => {
                    log::debug!(
                        "Built {} geometry for path {} ({:.1}px)",
                        g.kind().name(),
                        id,
                        g.total_length()
                    );
                    Some(g)
                }
                Err(e) => {
                    log::warn!("Skipping path {}: {}", id, e);
                    None
                }
            };
            self.entries.insert(id, PathMetrics { inputs, geometry });
        }
        &self.entries[&id]
    }

    pub fn get(&self, id: PathId) -> Option<&PathMetrics> {
        self.entries.get(&id)
    }

    pub fn remove(&mut self, id: PathId) -> Option<PathMetrics> {
        self.entries.remove(&id)
    }

    /// Drop every entry whose id fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(PathId) -> bool) {
        self.entries.retain(|id, _| keep(*id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of geometry builds since creation.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_effective_path_config, GlobalConfig, PathConfig};
    use crate::geometry::{AnchorRect, Projection};

    fn inputs(rect: AnchorRect, path: &PathConfig) -> GeometryInputs {
        let eff = resolve_effective_path_config(&GlobalConfig::default(), path, Some(&rect));
        GeometryInputs::from_effective(&eff, &rect, Projection::Flat)
    }

    #[test]
    fn test_cached_until_inputs_change() {
        let mut store = PathMetricsStore::new();
        let rect = AnchorRect::new(0.0, 0.0, 200.0, 200.0);
        let path = PathConfig::spark(7, "TR", "BL");

        for _ in 0..10 {
            store.get_or_build(7, inputs(rect, &path));
        }
        assert_eq!(store.rebuild_count(), 1);

        let moved = AnchorRect::new(10.0, 0.0, 200.0, 200.0);
        store.get_or_build(7, inputs(moved, &path));
        assert_eq!(store.rebuild_count(), 2);
    }

    #[test]
    fn test_malformed_path_cached_as_skipped() {
        let mut store = PathMetricsStore::new();
        let rect = AnchorRect::new(0.0, 0.0, 200.0, 200.0);
        let path = PathConfig {
            start_vertex: None,
            ..PathConfig::spark(1, "TR", "BL")
        };
        let metrics = store.get_or_build(1, inputs(rect, &path));
        assert!(metrics.geometry.is_none());
        assert_eq!(metrics.total_length(), 1.0);
        store.get_or_build(1, inputs(rect, &path));
        assert_eq!(store.rebuild_count(), 1);
    }

    #[test]
    fn test_retain_and_clear() {
        let mut store = PathMetricsStore::new();
        let rect = AnchorRect::new(0.0, 0.0, 200.0, 200.0);
        for id in 1..=3 {
            store.get_or_build(id, inputs(rect, &PathConfig::spark(id, "TL", "BR")));
        }
        store.retain(|id| id != 2);
        assert_eq!(store.len(), 2);
        assert!(store.get(2).is_none());
        store.clear();
        assert!(store.is_empty());
    }
}
