//! Two-tier tick bitmap
//!
//! Terminal words hold one bit per tick (2^8 ticks per word). The mezzanine
//! tier holds one bit per terminal word (2^8 words per mezzanine entry) and is
//! set whenever that word has any initialized tick. Empty words and empty
//! mezzanine entries are not stored.

use std::collections::{BTreeMap, HashMap};

use crate::constants::{MAX_TICK, MEZZ_WORD_BITS, MIN_TICK, TERM_WORD_BITS};
use crate::math::bit_math::{
    clear_bit, is_bit_set, next_bit_position, prev_bit_position, set_bit,
};
use crate::math::full_math::U256;

/// Result of searching the terminal word that holds the current tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinResult {
    /// Initialized tick found in the word, or the word border on spill
    pub tick: i32,
    /// The word had no initialized tick in the search direction
    pub spills: bool,
}

#[derive(Clone, Debug, Default)]
pub struct TickIndex {
    terminal: HashMap<i32, U256>,
    mezzanine: BTreeMap<i32, U256>,
}

#[inline]
pub fn word_index(tick: i32) -> i32 {
    tick >> TERM_WORD_BITS
}

#[inline]
fn word_bit(tick: i32) -> u8 {
    (tick & 0xff) as u8
}

#[inline]
fn mezz_index(word: i32) -> i32 {
    word >> MEZZ_WORD_BITS
}

#[inline]
fn mezz_bit(word: i32) -> u8 {
    (word & 0xff) as u8
}

#[inline]
fn tick_at(word: i32, bit: u8) -> i32 {
    (word << TERM_WORD_BITS) + bit as i32
}

#[inline]
fn word_at(mezz: i32, bit: u8) -> i32 {
    (mezz << MEZZ_WORD_BITS) + bit as i32
}

impl TickIndex {
    pub fn is_initialized(&self, tick: i32) -> bool {
        self.terminal
            .get(&word_index(tick))
            .map_or(false, |word| is_bit_set(*word, word_bit(tick)))
    }

    /// Raw terminal word, zero when no tick in it is initialized
    pub fn terminal_word(&self, word: i32) -> U256 {
        self.terminal.get(&word).copied().unwrap_or_default()
    }

    /// Raw mezzanine entry, zero when no word under it is populated
    pub fn mezzanine_word(&self, mezz: i32) -> U256 {
        self.mezzanine.get(&mezz).copied().unwrap_or_default()
    }

    pub fn set_tick(&mut self, tick: i32) {
        let word = word_index(tick);
        let entry = self.terminal.entry(word).or_default();
        *entry = set_bit(*entry, word_bit(tick));

        let mezz = self.mezzanine.entry(mezz_index(word)).or_default();
        *mezz = set_bit(*mezz, mezz_bit(word));
    }

    pub fn clear_tick(&mut self, tick: i32) {
        let word = word_index(tick);
        let Some(entry) = self.terminal.get_mut(&word) else {
            return;
        };
        *entry = clear_bit(*entry, word_bit(tick));
        if !entry.is_zero() {
            return;
        }
        self.terminal.remove(&word);

        let mezz_key = mezz_index(word);
        if let Some(mezz) = self.mezzanine.get_mut(&mezz_key) {
            *mezz = clear_bit(*mezz, mezz_bit(word));
            if mezz.is_zero() {
                self.mezzanine.remove(&mezz_key);
            }
        }
    }

    /// Search the terminal word holding `tick` for the next initialized tick
    ///
    /// Buys look strictly above `tick`, sells look at or below it. When the
    /// word has nothing in that direction the result spills and carries the
    /// word border instead: the first tick of the next word for buys, the
    /// first tick of this word for sells, clamped to the global tick range.
    pub fn pin_bitmap(&self, is_buy: bool, tick: i32) -> PinResult {
        let word = word_index(tick);
        let bitmap = self.terminal_word(word);
        let bit = word_bit(tick);

        if is_buy {
            let found = if bit == u8::MAX {
                None
            } else {
                next_bit_position(bitmap, bit + 1)
            };
            match found {
                Some(next) => PinResult { tick: tick_at(word, next), spills: false },
                None => PinResult {
                    tick: tick_at(word + 1, 0).min(MAX_TICK),
                    spills: true,
                },
            }
        } else {
            match prev_bit_position(bitmap, bit) {
                Some(prev) => PinResult { tick: tick_at(word, prev), spills: false },
                None => PinResult {
                    tick: tick_at(word, 0).max(MIN_TICK),
                    spills: true,
                },
            }
        }
    }

    /// Find the next initialized tick past a spilled word border
    ///
    /// Buys search from the border's word upward, including the border tick
    /// itself. Sells search strictly below the border's word. Returns the
    /// global sentinel (MAX_TICK or MIN_TICK) when no tick remains.
    pub fn seek_mezz_spill(&self, border: i32, is_buy: bool) -> i32 {
        if is_buy {
            self.seek_up(border)
        } else {
            self.seek_down(border)
        }
    }

    fn seek_up(&self, border: i32) -> i32 {
        let start_word = word_index(border);

        // the border's own word may hold ticks at or above the border
        if let Some(next) = next_bit_position(self.terminal_word(start_word), word_bit(border)) {
            return tick_at(start_word, next).min(MAX_TICK);
        }
        if start_word >= word_index(MAX_TICK) {
            return MAX_TICK;
        }

        let first = start_word + 1;
        let first_mezz = mezz_index(first);
        let mut candidate = next_bit_position(self.mezzanine_word(first_mezz), mezz_bit(first))
            .map(|bit| word_at(first_mezz, bit));
        if candidate.is_none() {
            candidate = self
                .mezzanine
                .range(first_mezz + 1..)
                .find_map(|(mezz, bits)| next_bit_position(*bits, 0).map(|bit| word_at(*mezz, bit)));
        }

        candidate
            .and_then(|word| {
                next_bit_position(self.terminal_word(word), 0).map(|bit| tick_at(word, bit))
            })
            .map_or(MAX_TICK, |tick| tick.min(MAX_TICK))
    }

    fn seek_down(&self, border: i32) -> i32 {
        let start_word = word_index(border);
        if start_word <= word_index(MIN_TICK) {
            return MIN_TICK;
        }

        let last = start_word - 1;
        let last_mezz = mezz_index(last);
        let mut candidate = prev_bit_position(self.mezzanine_word(last_mezz), mezz_bit(last))
            .map(|bit| word_at(last_mezz, bit));
        if candidate.is_none() {
            candidate = self
                .mezzanine
                .range(..last_mezz)
                .rev()
                .find_map(|(mezz, bits)| prev_bit_position(*bits, u8::MAX).map(|bit| word_at(*mezz, bit)));
        }

        candidate
            .and_then(|word| {
                prev_bit_position(self.terminal_word(word), u8::MAX).map(|bit| tick_at(word, bit))
            })
            .map_or(MIN_TICK, |tick| tick.max(MIN_TICK))
    }

    /// Number of populated terminal words
    pub fn populated_words(&self) -> usize {
        self.terminal.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut index = TickIndex::default();
        index.set_tick(-60);
        index.set_tick(120);
        assert!(index.is_initialized(-60));
        assert!(index.is_initialized(120));
        assert!(!index.is_initialized(60));

        // -60 lives in word -1, bit 196
        assert!(is_bit_set(index.terminal_word(-1), 196));
        assert!(is_bit_set(index.mezzanine_word(-1), 255));

        index.clear_tick(-60);
        assert!(!index.is_initialized(-60));
        assert!(index.terminal_word(-1).is_zero());
        assert!(index.mezzanine_word(-1).is_zero());
        assert_eq!(index.populated_words(), 1);

        // clearing an unset tick is harmless
        index.clear_tick(5000);
        assert!(index.is_initialized(120));
    }

    #[test]
    fn test_pin_within_word() {
        let mut index = TickIndex::default();
        index.set_tick(10);
        index.set_tick(100);

        // buys look strictly above
        assert_eq!(index.pin_bitmap(true, 10), PinResult { tick: 100, spills: false });
        assert_eq!(index.pin_bitmap(true, 9), PinResult { tick: 10, spills: false });
        // sells include the current tick
        assert_eq!(index.pin_bitmap(false, 100), PinResult { tick: 100, spills: false });
        assert_eq!(index.pin_bitmap(false, 99), PinResult { tick: 10, spills: false });
    }

    #[test]
    fn test_pin_spills_to_word_border() {
        let mut index = TickIndex::default();
        index.set_tick(10);

        assert_eq!(index.pin_bitmap(true, 10), PinResult { tick: 256, spills: true });
        assert_eq!(index.pin_bitmap(false, 9), PinResult { tick: 0, spills: true });
        // negative words
        assert_eq!(index.pin_bitmap(false, -1), PinResult { tick: -256, spills: true });
        assert_eq!(index.pin_bitmap(true, -1), PinResult { tick: 0, spills: true });
        // last bit of a word
        assert_eq!(index.pin_bitmap(true, 255), PinResult { tick: 256, spills: true });
    }

    #[test]
    fn test_pin_clamps_to_global_range() {
        let index = TickIndex::default();
        assert_eq!(index.pin_bitmap(true, MAX_TICK - 3).tick, MAX_TICK);
        assert_eq!(index.pin_bitmap(false, MIN_TICK + 3).tick, MIN_TICK);
    }

    #[test]
    fn test_seek_across_mezzanine() {
        let mut index = TickIndex::default();
        index.set_tick(-70_000);
        index.set_tick(300);
        index.set_tick(90_000);

        // buy from the border of word 0 finds 300 in word 1
        assert_eq!(index.seek_mezz_spill(256, true), 300);
        // past 300 the next populated word is two mezzanine entries away
        assert_eq!(index.seek_mezz_spill(512, true), 90_000);
        assert_eq!(index.seek_mezz_spill(90_112, true), MAX_TICK);

        // sells search strictly below the border's word
        assert_eq!(index.seek_mezz_spill(256, false), -70_000);
        assert_eq!(index.seek_mezz_spill(90_112, false), 90_000);
        assert_eq!(index.seek_mezz_spill(-69_888, false), -70_000);
        assert_eq!(index.seek_mezz_spill(-70_144, false), MIN_TICK);
    }

    #[test]
    fn test_seek_includes_border_tick_for_buys() {
        let mut index = TickIndex::default();
        index.set_tick(512);
        assert_eq!(index.pin_bitmap(true, 300), PinResult { tick: 512, spills: true });
        assert_eq!(index.seek_mezz_spill(512, true), 512);
    }

    #[test]
    fn test_seek_empty_index_returns_sentinels() {
        let index = TickIndex::default();
        assert_eq!(index.seek_mezz_spill(0, true), MAX_TICK);
        assert_eq!(index.seek_mezz_spill(0, false), MIN_TICK);
        assert_eq!(index.seek_mezz_spill(MAX_TICK, true), MAX_TICK);
        assert_eq!(index.seek_mezz_spill(MIN_TICK, false), MIN_TICK);
    }
}
