//! End-of-trip payout and fishing experience.
//!
//! The payout is rolled once per trip from the catch as it stood when the trip
//! began ending. Every `catch_per_roll` fish grant one roll: a fish (subject to
//! the flag's consumption chance) or a piece of junk. Flag modifiers then apply
//! in a fixed order: catch-chance offset, consumption, gambling, and finally
//! deckhand scaling so each participant takes home a full solo haul.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::RewardConfig;
use crate::constants::{
    FISHING_LEVEL_MAX, QUALITY_GOLD_PER_LEVEL, QUALITY_IRIDIUM_PER_LEVEL, QUALITY_SILVER_BASE,
    QUALITY_SILVER_PER_LEVEL,
};
use crate::flags::FlagModifiers;
use crate::hazard::ActorId;
use crate::numbers::{clamp_probability, round_f64_to_u32};

/// A crew member aboard the trawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deckhand {
    pub id: ActorId,
    pub fishing_level: u8,
}

impl Deckhand {
    #[must_use]
    pub fn new(id: ActorId, fishing_level: u8) -> Self {
        Self {
            id,
            fishing_level: fishing_level.min(FISHING_LEVEL_MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Normal,
    Silver,
    Gold,
    Iridium,
}

/// Which waters the payout fish come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishPool {
    Ocean,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutKind {
    Fish(FishPool),
    Trash,
    FishingChest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutItem {
    pub kind: PayoutKind,
    pub quality: Quality,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GambleOutcome {
    #[default]
    NotPlayed,
    Lost,
    Kept,
    Doubled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardResult {
    pub fishing_experience: u32,
    pub payout_items: Vec<PayoutItem>,
    pub gamble: GambleOutcome,
    pub consumed: u32,
    pub catch_quantity: u32,
    pub deckhand_count: u32,
}

impl RewardResult {
    /// Total items across the payout.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.payout_items.iter().map(|item| item.quantity).sum()
    }

    /// Total fish across the payout, ignoring junk and chests.
    #[must_use]
    pub fn total_fish(&self) -> u32 {
        self.payout_items
            .iter()
            .filter(|item| matches!(item.kind, PayoutKind::Fish(_)))
            .map(|item| item.quantity)
            .sum()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RewardError {
    #[error("rewards were already computed for this trip")]
    AlreadyComputed,
    #[error("reward calculator was not reset for this trip")]
    NotReset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardCalculator {
    cfg: RewardConfig,
    modifiers: FlagModifiers,
    lead_level: u8,
    catch_noted: u32,
    armed: bool,
    result: Option<RewardResult>,
}

impl RewardCalculator {
    #[must_use]
    pub fn new(cfg: RewardConfig) -> Self {
        Self {
            cfg,
            modifiers: FlagModifiers::NEUTRAL,
            lead_level: 0,
            catch_noted: 0,
            armed: false,
            result: None,
        }
    }

    /// Prepare for a new trip led by `lead`, dropping any previous result.
    pub fn reset(&mut self, lead: &Deckhand, modifiers: &FlagModifiers) {
        self.lead_level = lead.fishing_level.min(FISHING_LEVEL_MAX);
        self.modifiers = *modifiers;
        self.catch_noted = 0;
        self.armed = true;
        self.result = None;
    }

    /// Record the catch experience is scaled by.
    pub const fn note_catch(&mut self, quantity: u32) {
        self.catch_noted = quantity;
    }

    #[must_use]
    pub const fn catch_noted(&self) -> u32 {
        self.catch_noted
    }

    #[must_use]
    pub const fn result(&self) -> Option<&RewardResult> {
        self.result.as_ref()
    }

    /// Roll the payout for a completed trip.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::AlreadyComputed` on a second call for the same
    /// trip and `RewardError::NotReset` if [`Self::reset`] was never called.
    pub fn compute_and_populate<R: Rng + ?Sized>(
        &mut self,
        deckhand_count: u32,
        catch_quantity: u32,
        rng: &mut R,
    ) -> Result<&RewardResult, RewardError> {
        if self.result.is_some() {
            return Err(RewardError::AlreadyComputed);
        }
        if !self.armed {
            return Err(RewardError::NotReset);
        }
        self.note_catch(catch_quantity);

        let pool = if self.modifiers.worldly {
            FishPool::Any
        } else {
            FishPool::Ocean
        };
        let fish_chance = clamp_probability(
            self.cfg.base_fish_chance
                + f64::from(self.lead_level) * self.cfg.fish_chance_per_level
                - self.modifiers.fish_catch_chance_offset,
        );
        let consumption = clamp_probability(self.modifiers.consumption_chance);

        let mut tally: BTreeMap<(PayoutKind, Quality), u32> = BTreeMap::new();
        let mut consumed = 0;
        for _ in 0..catch_quantity / self.cfg.catch_per_roll {
            if rng.r#gen::<f64>() >= fish_chance {
                *tally.entry((PayoutKind::Trash, Quality::Normal)).or_default() += 1;
                continue;
            }
            if consumption > 0.0 && rng.r#gen::<f64>() < consumption {
                consumed += 1;
                continue;
            }
            let quality = self.roll_quality(rng);
            *tally.entry((PayoutKind::Fish(pool), quality)).or_default() += 1;
        }
        if self.modifiers.mermaids_blessing {
            *tally
                .entry((PayoutKind::FishingChest, Quality::Normal))
                .or_default() += 1;
        }

        let gamble = if self.modifiers.gambling {
            let roll = rng.r#gen::<f64>();
            if roll < self.cfg.gamble_lose_chance {
                GambleOutcome::Lost
            } else if roll < self.cfg.gamble_lose_chance + self.cfg.gamble_double_chance {
                GambleOutcome::Doubled
            } else {
                GambleOutcome::Kept
            }
        } else {
            GambleOutcome::NotPlayed
        };
        let gamble_factor = match gamble {
            GambleOutcome::Lost => 0,
            GambleOutcome::Doubled => 2,
            GambleOutcome::Kept | GambleOutcome::NotPlayed => 1,
        };

        let deckhand_count = deckhand_count.max(1);
        let payout_items = tally
            .into_iter()
            .map(|((kind, quality), count)| PayoutItem {
                kind,
                quality,
                quantity: count
                    .saturating_mul(gamble_factor)
                    .saturating_mul(deckhand_count),
            })
            .filter(|item| item.quantity > 0)
            .collect();

        let result = RewardResult {
            fishing_experience: self.xp_for_level(self.lead_level),
            payout_items,
            gamble,
            consumed,
            catch_quantity,
            deckhand_count,
        };
        debug!(
            "rewards rolled: {} item(s), {} consumed, gamble {:?}",
            result.total_items(),
            result.consumed,
            result.gamble
        );
        Ok(&*self.result.insert(result))
    }

    /// Fishing experience for leaving the vessel. Granted whether or not the
    /// trip succeeded and whether or not a payout was rolled.
    #[must_use]
    pub fn fishing_xp(&self, deckhand: &Deckhand) -> u32 {
        self.xp_for_level(deckhand.fishing_level.min(FISHING_LEVEL_MAX))
    }

    fn xp_for_level(&self, level: u8) -> u32 {
        let mut xp = f64::from(self.catch_noted)
            * self.cfg.xp_per_fish
            * f64::from(level).mul_add(self.cfg.xp_level_bonus, 1.0);
        if !self.modifiers.full_xp {
            xp *= 1.0 - clamp_probability(self.modifiers.consumption_chance);
        }
        round_f64_to_u32(xp)
    }

    fn roll_quality<R: Rng + ?Sized>(&self, rng: &mut R) -> Quality {
        let level = f64::from(self.lead_level);
        let iridium = level * QUALITY_IRIDIUM_PER_LEVEL;
        let gold = iridium + level * QUALITY_GOLD_PER_LEVEL;
        let silver = gold + level.mul_add(QUALITY_SILVER_PER_LEVEL, QUALITY_SILVER_BASE);
        let roll = rng.r#gen::<f64>();
        if roll < iridium {
            Quality::Iridium
        } else if roll < gold {
            Quality::Gold
        } else if roll < silver {
            Quality::Silver
        } else {
            Quality::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagVariant;
    use crate::rng::RngBundle;
    use crate::test_support::ScriptedRng;

    fn calculator(flag: FlagVariant, level: u8) -> RewardCalculator {
        let mut calc = RewardCalculator::new(RewardConfig::default());
        calc.reset(&Deckhand::new(1, level), &flag.modifiers());
        calc
    }

    fn quantity(result: &RewardResult, kind: PayoutKind) -> u32 {
        result
            .payout_items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.quantity)
            .sum()
    }

    #[test]
    fn second_computation_is_refused() {
        let mut calc = calculator(FlagVariant::None, 0);
        let mut rng = RngBundle::from_user_seed(1);
        assert!(calc.compute_and_populate(1, 100, rng.rewards()).is_ok());
        assert_eq!(
            calc.compute_and_populate(1, 100, rng.rewards()),
            Err(RewardError::AlreadyComputed)
        );
    }

    #[test]
    fn computation_requires_reset() {
        let mut calc = RewardCalculator::new(RewardConfig::default());
        let mut rng = RngBundle::from_user_seed(1);
        assert_eq!(
            calc.compute_and_populate(1, 100, rng.rewards()),
            Err(RewardError::NotReset)
        );
    }

    #[test]
    fn parley_offset_turns_a_fish_into_junk() {
        let mut calc = calculator(FlagVariant::None, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.5, 0.99]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(quantity(result, PayoutKind::Fish(FishPool::Ocean)), 1);

        let mut calc = calculator(FlagVariant::Parley, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.5]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(quantity(result, PayoutKind::Trash), 1);
        assert_eq!(result.total_fish(), 0);
    }

    #[test]
    fn mermaid_consumption_and_chest() {
        let mut calc = calculator(FlagVariant::MermaidsBlessing, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.1, 0.05]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(result.consumed, 1);
        assert_eq!(result.total_fish(), 0);
        assert_eq!(quantity(result, PayoutKind::FishingChest), 1);
    }

    #[test]
    fn gamble_can_lose_everything_or_double() {
        let mut calc = calculator(FlagVariant::GamblersCrest, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.99, 0.1]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(result.gamble, GambleOutcome::Lost);
        assert!(result.payout_items.is_empty());

        let mut calc = calculator(FlagVariant::GamblersCrest, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.99, 0.5]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(result.gamble, GambleOutcome::Doubled);
        assert_eq!(quantity(result, PayoutKind::Trash), 2);

        let mut calc = calculator(FlagVariant::GamblersCrest, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.99, 0.9]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(result.gamble, GambleOutcome::Kept);
        assert_eq!(result.total_items(), 1);
    }

    #[test]
    fn each_deckhand_takes_a_solo_haul() {
        let mut calc = calculator(FlagVariant::None, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.99, 0.99]);
        let result = calc
            .compute_and_populate(3, 20, &mut rng)
            .expect("first computation");
        assert_eq!(quantity(result, PayoutKind::Trash), 6);
        assert_eq!(result.deckhand_count, 3);
    }

    #[test]
    fn worldly_draws_from_any_waters() {
        let mut calc = calculator(FlagVariant::Worldly, 0);
        let mut rng = ScriptedRng::from_unit_draws(&[0.1, 0.99]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(quantity(result, PayoutKind::Fish(FishPool::Any)), 1);
    }

    #[test]
    fn master_angler_lands_iridium() {
        let mut calc = calculator(FlagVariant::None, 10);
        let mut rng = ScriptedRng::from_unit_draws(&[0.1, 0.01]);
        let result = calc
            .compute_and_populate(1, 10, &mut rng)
            .expect("first computation");
        assert_eq!(result.payout_items[0].quality, Quality::Iridium);
    }

    #[test]
    fn every_roll_is_accounted_for() {
        let mut calc = calculator(FlagVariant::PatronSaint, 4);
        let mut rng = RngBundle::from_user_seed(77);
        let result = calc
            .compute_and_populate(1, 250, rng.rewards())
            .expect("first computation");
        assert_eq!(result.total_items() + result.consumed, 25);
    }

    #[test]
    fn xp_ignores_payout_and_scales_with_skill_and_flag() {
        let mut calc = calculator(FlagVariant::None, 0);
        calc.note_catch(100);
        assert_eq!(calc.fishing_xp(&Deckhand::new(1, 0)), 50);
        assert_eq!(calc.fishing_xp(&Deckhand::new(2, 10)), 100);
        assert!(calc.result().is_none());

        let mut calc = calculator(FlagVariant::MermaidsBlessing, 0);
        calc.note_catch(100);
        assert_eq!(calc.fishing_xp(&Deckhand::new(1, 0)), 45);

        let mut calc = calculator(FlagVariant::PatronSaint, 0);
        calc.note_catch(100);
        assert_eq!(calc.fishing_xp(&Deckhand::new(1, 0)), 50);
    }
}
