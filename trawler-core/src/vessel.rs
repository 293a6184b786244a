//! The trawler itself: one hazard zone per category.
use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;
use crate::flags::FlagModifiers;
use crate::hazard::{ActorId, HazardCategory, HazardZone, ZoneSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub hull: HazardZone,
    pub net: HazardZone,
    pub pipe: HazardZone,
}

impl Vessel {
    #[must_use]
    pub fn new(cfg: &ZoneConfig) -> Self {
        Self {
            hull: HazardZone::new(ZoneSpec::hull(cfg)),
            net: HazardZone::new(ZoneSpec::net(cfg)),
            pipe: HazardZone::new(ZoneSpec::pipe(cfg)),
        }
    }

    #[must_use]
    pub const fn zone(&self, category: HazardCategory) -> &HazardZone {
        match category {
            HazardCategory::Hull => &self.hull,
            HazardCategory::Net => &self.net,
            HazardCategory::Pipe => &self.pipe,
        }
    }

    pub const fn zone_mut(&mut self, category: HazardCategory) -> &mut HazardZone {
        match category {
            HazardCategory::Hull => &mut self.hull,
            HazardCategory::Net => &mut self.net,
            HazardCategory::Pipe => &mut self.pipe,
        }
    }

    /// Apply a trip's flag modifiers to every zone.
    pub fn configure(&mut self, mods: &FlagModifiers) {
        for category in HazardCategory::ALL {
            self.zone_mut(category).configure(mods);
        }
    }

    /// Route a repair request to its zone.
    pub fn repair(&mut self, category: HazardCategory, slot: usize, actor: ActorId) -> bool {
        self.zone_mut(category).attempt_repair(slot, actor)
    }

    /// Nets torn and engine failing at once; fish are escaping.
    #[must_use]
    pub fn losing_fish(&self) -> bool {
        self.net.all_active() && self.pipe.all_active()
    }

    #[must_use]
    pub fn engine_failing(&self) -> bool {
        self.pipe.all_active()
    }

    #[must_use]
    pub fn everything_failing(&self) -> bool {
        HazardCategory::ALL
            .into_iter()
            .all(|category| self.zone(category).all_active())
    }

    #[must_use]
    pub fn total_active(&self) -> u32 {
        HazardCategory::ALL
            .into_iter()
            .map(|category| u32::from(self.zone(category).active_count()))
            .sum()
    }

    pub fn reset(&mut self) {
        for category in HazardCategory::ALL {
            self.zone_mut(category).reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_routes_by_category() {
        let mut vessel = Vessel::new(&ZoneConfig::default());
        vessel.pipe.attempt_create();
        assert!(!vessel.repair(HazardCategory::Net, 0, 3));
        assert!(vessel.repair(HazardCategory::Pipe, 0, 3));
        assert_eq!(vessel.total_active(), 0);
    }

    #[test]
    fn failure_queries_track_saturation() {
        let mut vessel = Vessel::new(&ZoneConfig::default());
        vessel.net.force_all_active();
        assert!(!vessel.losing_fish());
        vessel.pipe.force_all_active();
        assert!(vessel.losing_fish());
        assert!(vessel.engine_failing());
        assert!(!vessel.everything_failing());
        vessel.hull.force_all_active();
        assert!(vessel.everything_failing());
        assert_eq!(vessel.total_active(), 10);

        vessel.reset();
        assert_eq!(vessel.total_active(), 0);
    }
}
