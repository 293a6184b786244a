//! Running fish-catch total hauled by the nets.
use serde::{Deserialize, Serialize};

use crate::hazard::HazardZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catch {
    quantity: u32,
    multiplier: u32,
}

impl Catch {
    #[must_use]
    pub fn new(base: u32, multiplier: u32) -> Self {
        Self {
            quantity: base,
            multiplier: multiplier.max(1),
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Periodic haul. Working nets add `multiplier` fish each; a failing engine
    /// halves the haul and every torn net sheds a fish. Returns the signed change.
    pub fn recalculate(&mut self, nets: &HazardZone, engine_failing: bool) -> i64 {
        let torn = u32::from(nets.active_count());
        let working = u32::from(nets.slot_count()).saturating_sub(torn);
        let mut gain = working.saturating_mul(self.multiplier);
        let mut loss = 0;
        if engine_failing {
            gain /= 2;
            loss = torn;
        }
        let before = self.quantity;
        self.quantity = self.quantity.saturating_add(gain).saturating_sub(loss);
        i64::from(self.quantity) - i64::from(before)
    }

    /// Flooding penalty: integer division of the haul.
    pub fn apply_flood_penalty(&mut self, divisor: u32) {
        self.quantity /= divisor.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;
    use crate::hazard::ZoneSpec;

    fn nets() -> HazardZone {
        HazardZone::new(ZoneSpec::net(&ZoneConfig::default()))
    }

    #[test]
    fn intact_nets_haul_multiplier_per_section() {
        let mut catch = Catch::new(100, 4);
        assert_eq!(catch.recalculate(&nets(), false), 12);
        assert_eq!(catch.quantity(), 112);
    }

    #[test]
    fn torn_nets_with_failing_engine_lose_fish() {
        let mut zone = nets();
        zone.force_all_active();
        let mut catch = Catch::new(2, 1);
        assert_eq!(catch.recalculate(&zone, true), -2);
        assert_eq!(catch.quantity(), 0);
    }

    #[test]
    fn failing_engine_halves_haul() {
        let mut zone = nets();
        zone.attempt_create();
        let mut catch = Catch::new(100, 3);
        // two working nets haul 6, halved to 3, one torn net sheds 1
        assert_eq!(catch.recalculate(&zone, true), 2);
    }

    #[test]
    fn flood_penalty_is_integer_division() {
        let mut catch = Catch::new(101, 1);
        catch.apply_flood_penalty(4);
        assert_eq!(catch.quantity(), 25);
        assert_eq!(Catch::new(5, 0).multiplier(), 1);
    }
}
