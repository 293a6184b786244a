//! Hazard zones: fixed sets of repairable fault slots for one vessel category.
//!
//! Hull holes, net sections and pipe joints share the same mechanics and differ
//! only in their [`ZoneSpec`]: how many slots exist, whether active slots feed
//! an accumulator (the hull's water level), and whether a weak-hull modifier
//! escalates one new fault into total failure.
//!
//! Every operation here is best-effort. Out-of-range indices, repairs of
//! inactive slots and creation in a saturated zone resolve to `false` and never
//! interrupt the tick loop.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::ZoneConfig;
use crate::constants::WATER_LEVEL_MAX;
use crate::flags::FlagModifiers;

/// Identifier of a participant submitting repairs.
pub type ActorId = u64;

/// Vessel area a hazard belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCategory {
    Hull,
    Net,
    Pipe,
}

impl HazardCategory {
    pub const ALL: [Self; 3] = [Self::Hull, Self::Net, Self::Pipe];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hull => "hull hole",
            Self::Net => "net section",
            Self::Pipe => "pipe joint",
        }
    }
}

/// What active slots feed every recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accumulator {
    None,
    WaterLevel { per_active_slot: u8 },
}

/// How a successful creation may escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Escalation {
    /// One creation activates one slot.
    Single,
    /// With the weak-hull modifier set, one creation activates every slot.
    CascadeWhenWeak,
}

/// Category configuration for a [`HazardZone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub category: HazardCategory,
    pub slot_count: u8,
    pub accumulator: Accumulator,
    pub escalation: Escalation,
}

impl ZoneSpec {
    #[must_use]
    pub const fn hull(cfg: &ZoneConfig) -> Self {
        Self {
            category: HazardCategory::Hull,
            slot_count: cfg.hull_slots,
            accumulator: Accumulator::WaterLevel {
                per_active_slot: cfg.water_per_active_hole,
            },
            escalation: Escalation::CascadeWhenWeak,
        }
    }

    #[must_use]
    pub const fn net(cfg: &ZoneConfig) -> Self {
        Self {
            category: HazardCategory::Net,
            slot_count: cfg.net_slots,
            accumulator: Accumulator::None,
            escalation: Escalation::Single,
        }
    }

    #[must_use]
    pub const fn pipe(cfg: &ZoneConfig) -> Self {
        Self {
            category: HazardCategory::Pipe,
            slot_count: cfg.pipe_slots,
            accumulator: Accumulator::None,
            escalation: Escalation::Single,
        }
    }
}

/// A single repairable fault instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardSlot {
    pub index: u8,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_repaired_by: Option<ActorId>,
}

/// Slot storage; every default category fits inline.
pub type SlotSet = SmallVec<[HazardSlot; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardZone {
    spec: ZoneSpec,
    slots: SlotSet,
    active_count: u8,
    water_level: u8,
    weak_hull: bool,
    leaks_enabled: bool,
}

impl HazardZone {
    #[must_use]
    pub fn new(spec: ZoneSpec) -> Self {
        let slots = (0..spec.slot_count)
            .map(|index| HazardSlot {
                index,
                active: false,
                last_repaired_by: None,
            })
            .collect();
        Self {
            spec,
            slots,
            active_count: 0,
            water_level: 0,
            weak_hull: false,
            leaks_enabled: true,
        }
    }

    #[must_use]
    pub const fn category(&self) -> HazardCategory {
        self.spec.category
    }

    #[must_use]
    pub const fn spec(&self) -> &ZoneSpec {
        &self.spec
    }

    #[must_use]
    pub fn slots(&self) -> &[HazardSlot] {
        &self.slots
    }

    #[must_use]
    pub fn slot_count(&self) -> u8 {
        self.spec.slot_count
    }

    #[must_use]
    pub const fn active_count(&self) -> u8 {
        self.active_count
    }

    #[must_use]
    pub const fn has_active(&self) -> bool {
        self.active_count > 0
    }

    #[must_use]
    pub fn all_active(&self) -> bool {
        self.active_count == self.spec.slot_count
    }

    /// Indices of currently active slots, in slot order.
    pub fn active_indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.active)
            .map(|slot| slot.index)
    }

    #[must_use]
    pub const fn water_level(&self) -> u8 {
        self.water_level
    }

    #[must_use]
    pub const fn is_flooded(&self) -> bool {
        self.water_level >= WATER_LEVEL_MAX
    }

    #[must_use]
    pub const fn weak_hull(&self) -> bool {
        self.weak_hull
    }

    #[must_use]
    pub const fn leaks_enabled(&self) -> bool {
        self.leaks_enabled
    }

    /// Whether a successful creation should cascade into [`Self::force_all_active`].
    #[must_use]
    pub fn cascades(&self) -> bool {
        self.weak_hull && self.spec.escalation == Escalation::CascadeWhenWeak
    }

    /// Apply the per-trip modifiers this category consumes.
    pub fn configure(&mut self, mods: &FlagModifiers) {
        if self.spec.category == HazardCategory::Hull {
            self.weak_hull = mods.weak_hull;
            self.leaks_enabled = mods.leaks_enabled;
        }
    }

    /// Activate the first inactive slot. Returns true iff a slot changed.
    pub fn attempt_create(&mut self) -> bool {
        if !self.leaks_enabled || self.all_active() {
            return false;
        }
        let Some(slot) = self.slots.iter_mut().find(|slot| !slot.active) else {
            return false;
        };
        slot.active = true;
        self.active_count += 1;
        self.check_invariant();
        true
    }

    /// Deactivate the slot at `index`. Inactive or unknown slots are a harmless `false`.
    pub fn attempt_repair(&mut self, index: usize, actor: ActorId) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !slot.active {
            return false;
        }
        slot.active = false;
        slot.last_repaired_by = Some(actor);
        self.active_count -= 1;
        self.check_invariant();
        true
    }

    /// Activate every slot unconditionally.
    pub fn force_all_active(&mut self) {
        for slot in &mut self.slots {
            slot.active = true;
        }
        self.active_count = self.spec.slot_count;
        self.check_invariant();
    }

    /// Raise the accumulator by the active-slot contribution, clamped at the maximum.
    /// Returns the level after recalculation (always zero for zones without one).
    pub fn recalculate_water_level(&mut self) -> u8 {
        if let Accumulator::WaterLevel { per_active_slot } = self.spec.accumulator {
            let rise = u16::from(per_active_slot) * u16::from(self.active_count);
            let level = (u16::from(self.water_level) + rise).min(u16::from(WATER_LEVEL_MAX));
            self.water_level = u8::try_from(level).unwrap_or(WATER_LEVEL_MAX);
        }
        self.water_level
    }

    /// Return every slot, accumulator and modifier to its initial state.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
            slot.last_repaired_by = None;
        }
        self.active_count = 0;
        self.water_level = 0;
        self.weak_hull = false;
        self.leaks_enabled = true;
        self.check_invariant();
    }

    fn check_invariant(&self) {
        let counted = self.slots.iter().filter(|slot| slot.active).count();
        assert_eq!(
            usize::from(self.active_count),
            counted,
            "{:?} zone active count diverged from its slots",
            self.spec.category
        );
    }
}
