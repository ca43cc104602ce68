//! Kill feed and tactical alert slot.

use std::collections::VecDeque;

use siege_core::constants::{ALERT_DISPLAY, KILL_FEED_CAPACITY, KILL_FEED_DISPLAY};
use siege_core::enums::Faction;
use siege_core::events::{KillFeedEntry, TacticalAlert};

/// Bounded, expiring kill feed in insertion order.
#[derive(Debug, Default)]
pub struct KillFeed {
    entries: VecDeque<KillFeedEntry>,
    next_id: u64,
}

impl KillFeed {
    pub fn push(
        &mut self,
        killer: &str,
        killer_faction: Faction,
        victim: &str,
        victim_faction: Faction,
        now: f64,
    ) {
        self.entries.push_back(KillFeedEntry {
            id: self.next_id,
            killer: killer.to_string(),
            victim: victim.to_string(),
            killer_faction,
            victim_faction,
            time: now,
        });
        self.next_id += 1;
        while self.entries.len() > KILL_FEED_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Drop entries older than the display window.
    pub fn expire(&mut self, now: f64) {
        while self
            .entries
            .front()
            .is_some_and(|e| now - e.time >= KILL_FEED_DISPLAY)
        {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> Vec<KillFeedEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Single alert slot; a newer alert replaces the current one.
#[derive(Debug, Default)]
pub struct AlertSlot {
    current: Option<TacticalAlert>,
}

impl AlertSlot {
    pub fn raise(&mut self, text: &str, subtext: &str, color: &str, now: f64) {
        self.current = Some(TacticalAlert {
            text: text.to_string(),
            subtext: subtext.to_string(),
            color: color.to_string(),
            expires_at: now + ALERT_DISPLAY,
        });
    }

    pub fn expire(&mut self, now: f64) {
        if self.current.as_ref().is_some_and(|a| now >= a.expires_at) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&TacticalAlert> {
        self.current.as_ref()
    }
}
