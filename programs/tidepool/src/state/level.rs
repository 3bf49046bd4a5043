use std::collections::{BTreeMap, HashMap};

use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::errors::TidepoolError;
use crate::math::safe_math::to_signed;
use crate::state::tick_index::TickIndex;

/// Liquidity record attached to an initialized tick
/// Zero-copy compatible layout, same shape as it is persisted
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default, Debug, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Level {
    /// Net liquidity change when crossing this tick upward (positive = liquidity added)
    /// When price moves up through the tick: add liquidity_net
    /// When price moves down through the tick: subtract liquidity_net
    pub liquidity_net: i128,         // 16 bytes, offset 0

    /// Total liquidity referencing this tick
    /// Used to track when the tick can be uninitialized
    pub liquidity_gross: u128,       // 16 bytes, offset 16

    /// Concentrated reward growth on the other side of this tick (Q64.64)
    /// Stored relative to the current tick, flipped on every crossing
    pub fee_odometer_x64: u128,      // 16 bytes, offset 32
}
// Total: 48 bytes

const _: () = assert!(std::mem::size_of::<Level>() == 48);

impl Level {
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Update the level when a range boundary gains or loses liquidity
    ///
    /// Returns whether the level flipped between initialized and empty.
    pub fn update(
        &mut self,
        tick_current: i32,
        tick_index: i32,
        liquidity_delta: i128,
        conc_growth_x64: u128,
        upper: bool,
    ) -> Result<bool> {
        let liquidity_gross_before = self.liquidity_gross;

        let liquidity_gross_after = if liquidity_delta >= 0 {
            self.liquidity_gross
                .checked_add(liquidity_delta as u128)
                .ok_or(TidepoolError::LiquidityOverflow)?
        } else {
            self.liquidity_gross
                .checked_sub(liquidity_delta.unsigned_abs())
                .ok_or(TidepoolError::LiquidityUnderflow)?
        };

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        if liquidity_gross_before == 0 {
            // By convention, all growth so far happened below the current tick
            self.fee_odometer_x64 = if tick_index <= tick_current {
                conc_growth_x64
            } else {
                0
            };
        }

        self.liquidity_gross = liquidity_gross_after;

        // When price moves up: lower adds liquidity, upper removes
        self.liquidity_net = if upper {
            self.liquidity_net
                .checked_sub(liquidity_delta)
                .ok_or(TidepoolError::LiquidityOverflow)?
        } else {
            self.liquidity_net
                .checked_add(liquidity_delta)
                .ok_or(TidepoolError::LiquidityOverflow)?
        };

        Ok(flipped)
    }

    /// Cross the level when price moves through it
    pub fn cross(&mut self, conc_growth_x64: u128) {
        self.fee_odometer_x64 = conc_growth_x64.wrapping_sub(self.fee_odometer_x64);
    }

    /// Concentrated growth accumulated inside [lower, upper)
    pub fn mileage_inside(
        level_lower: &Level,
        level_upper: &Level,
        tick_lower_index: i32,
        tick_upper_index: i32,
        tick_current: i32,
        conc_growth_x64: u128,
    ) -> u128 {
        let below = if tick_current >= tick_lower_index {
            level_lower.fee_odometer_x64
        } else {
            conc_growth_x64.wrapping_sub(level_lower.fee_odometer_x64)
        };

        let above = if tick_current < tick_upper_index {
            level_upper.fee_odometer_x64
        } else {
            conc_growth_x64.wrapping_sub(level_upper.fee_odometer_x64)
        };

        conc_growth_x64.wrapping_sub(below).wrapping_sub(above)
    }
}

/// A staged change to one level, written back by `LevelBook::commit_edit`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelEdit {
    pub tick: i32,
    pub level: Level,
    pub flipped: bool,
}

/// Per-tick liquidity records for the whole pool
#[derive(Clone, Debug, Default)]
pub struct LevelBook {
    levels: HashMap<i32, Level>,
}

impl LevelBook {
    /// Level at a tick, empty if it was never initialized
    pub fn level(&self, tick: i32) -> Level {
        self.levels.get(&tick).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Stage `liquidity` joining a range boundary at `tick`
    ///
    /// A freshly initialized level seeds its odometer from the current global
    /// growth so later crossings only count growth from here on.
    pub fn add_level_liquidity(
        &self,
        tick: i32,
        tick_current: i32,
        liquidity: u128,
        upper: bool,
        conc_growth_x64: u128,
    ) -> Result<LevelEdit> {
        let mut level = self.level(tick);
        let flipped = level.update(tick_current, tick, to_signed(liquidity)?, conc_growth_x64, upper)?;
        Ok(LevelEdit { tick, level, flipped })
    }

    /// Stage `liquidity` leaving a range boundary at `tick`
    ///
    /// When gross liquidity returns to zero the edit is flipped and
    /// committing it clears the tick from the index.
    pub fn remove_level_liquidity(
        &self,
        tick: i32,
        tick_current: i32,
        liquidity: u128,
        upper: bool,
        conc_growth_x64: u128,
    ) -> Result<LevelEdit> {
        let mut level = self.level(tick);
        let flipped = level.update(tick_current, tick, -to_signed(liquidity)?, conc_growth_x64, upper)?;
        Ok(LevelEdit { tick, level, flipped })
    }

    /// Write a staged edit back and keep the tick index in step
    pub fn commit_edit(&mut self, index: &mut TickIndex, edit: LevelEdit) {
        if edit.level.is_initialized() {
            self.levels.insert(edit.tick, edit.level);
            if edit.flipped {
                index.set_tick(edit.tick);
            }
        } else {
            self.levels.remove(&edit.tick);
            index.clear_tick(edit.tick);
        }
    }

    /// Concentrated growth inside a range given its (possibly staged) boundary levels
    pub fn range_mileage(
        lower: &Level,
        upper: &Level,
        tick_lower: i32,
        tick_upper: i32,
        tick_current: i32,
        conc_growth_x64: u128,
    ) -> u128 {
        Level::mileage_inside(lower, upper, tick_lower, tick_upper, tick_current, conc_growth_x64)
    }

    /// Working copy for a swap: crossings land in the overlay until committed
    pub fn overlay(&self) -> LevelOverlay<'_> {
        LevelOverlay {
            book: self,
            dirty: BTreeMap::new(),
        }
    }

    /// Merge the crossed levels of a finished swap
    pub fn commit_overlay(&mut self, dirty: BTreeMap<i32, Level>) {
        self.levels.extend(dirty);
    }
}

/// Copy-on-write view of the level book used during a swap sweep
pub struct LevelOverlay<'a> {
    book: &'a LevelBook,
    dirty: BTreeMap<i32, Level>,
}

impl<'a> LevelOverlay<'a> {
    pub fn level(&self, tick: i32) -> Level {
        self.dirty
            .get(&tick)
            .copied()
            .unwrap_or_else(|| self.book.level(tick))
    }

    /// Cross the level at `tick` and return the delta for concentrated liquidity
    ///
    /// Crossing upward returns `liquidity_net`, downward its negation. The
    /// odometer flips so the next crossing measures growth from this point.
    pub fn cross_level(&mut self, tick: i32, is_buy: bool, conc_growth_x64: u128) -> Result<i128> {
        let book = self.book;
        let level = self.dirty.entry(tick).or_insert_with(|| book.level(tick));
        level.cross(conc_growth_x64);

        if is_buy {
            Ok(level.liquidity_net)
        } else {
            level
                .liquidity_net
                .checked_neg()
                .ok_or(TidepoolError::LiquidityOverflow.into())
        }
    }

    pub fn crossed(&self) -> usize {
        self.dirty.len()
    }

    pub fn into_dirty(self) -> BTreeMap<i32, Level> {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;

    #[test]
    fn test_level_size() {
        assert_eq!(std::mem::size_of::<Level>(), 48);
        let level = Level::zeroed();
        assert!(!level.is_initialized());
    }

    #[test]
    fn test_add_seeds_odometer_below_current_tick() {
        let book = LevelBook::default();
        let growth = 5 * Q64;

        let below = book.add_level_liquidity(-100, 0, 1000, false, growth).unwrap();
        assert!(below.flipped);
        assert_eq!(below.level.fee_odometer_x64, growth);
        assert_eq!(below.level.liquidity_net, 1000);

        let above = book.add_level_liquidity(100, 0, 1000, true, growth).unwrap();
        assert_eq!(above.level.fee_odometer_x64, 0);
        assert_eq!(above.level.liquidity_net, -1000);
        assert_eq!(above.level.liquidity_gross, 1000);
    }

    #[test]
    fn test_commit_tracks_index() {
        let mut book = LevelBook::default();
        let mut index = TickIndex::default();

        let edit = book.add_level_liquidity(60, 0, 500, true, 0).unwrap();
        book.commit_edit(&mut index, edit);
        assert!(index.is_initialized(60));

        // second range on the same tick does not flip
        let edit = book.add_level_liquidity(60, 0, 300, false, 0).unwrap();
        assert!(!edit.flipped);
        book.commit_edit(&mut index, edit);
        assert_eq!(book.level(60).liquidity_net, -200);
        assert_eq!(book.level(60).liquidity_gross, 800);

        let edit = book.remove_level_liquidity(60, 0, 500, true, 0).unwrap();
        book.commit_edit(&mut index, edit);
        assert!(index.is_initialized(60));

        let edit = book.remove_level_liquidity(60, 0, 300, false, 0).unwrap();
        assert!(edit.flipped);
        book.commit_edit(&mut index, edit);
        assert!(!index.is_initialized(60));
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove_more_than_gross_fails() {
        let book = LevelBook::default();
        assert!(book.remove_level_liquidity(60, 0, 1, false, 0).is_err());
    }

    #[test]
    fn test_cross_both_directions() {
        let mut book = LevelBook::default();
        let mut index = TickIndex::default();
        let edit = book.add_level_liquidity(100, 0, 1000, false, 0).unwrap();
        book.commit_edit(&mut index, edit);

        let mut overlay = book.overlay();
        // upward crossing adds the lower boundary's liquidity
        assert_eq!(overlay.cross_level(100, true, 7 * Q64).unwrap(), 1000);
        assert_eq!(overlay.level(100).fee_odometer_x64, 7 * Q64);
        // crossing back down removes it and flips the odometer again
        assert_eq!(overlay.cross_level(100, false, 9 * Q64).unwrap(), -1000);
        assert_eq!(overlay.level(100).fee_odometer_x64, 2 * Q64);
        assert_eq!(overlay.crossed(), 1);

        // nothing lands in the book until commit
        assert_eq!(book.level(100).fee_odometer_x64, 0);
        let dirty = overlay.into_dirty();
        book.commit_overlay(dirty);
        assert_eq!(book.level(100).fee_odometer_x64, 2 * Q64);
    }

    #[test]
    fn test_mileage_inside() {
        let lower = Level { fee_odometer_x64: 2 * Q64, ..Default::default() };
        let upper = Level { fee_odometer_x64: 3 * Q64, ..Default::default() };

        // in range: global - below - above
        assert_eq!(Level::mileage_inside(&lower, &upper, -10, 10, 0, 10 * Q64), 5 * Q64);
        // above range: both odometers count growth below them
        assert_eq!(Level::mileage_inside(&lower, &upper, -10, 10, 20, 10 * Q64), Q64);
        // below range: both odometers count growth above them
        assert_eq!(Level::mileage_inside(&upper, &lower, -10, 10, -20, 10 * Q64), Q64);
    }
}
