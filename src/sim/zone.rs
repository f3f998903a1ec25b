//! Shop zones painted into the terrain and the majority-vote classifier
//!
//! Shops are plain colors in the terrain mask. Whatever color dominates the
//! window under the taxi decides which shop (if any) it is parked in.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::economy::Economy;
use super::terrain::EMPTY;

/// The four shops a building can turn into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopZone {
    UpgradeEngine,
    PayDebt,
    BuyShields,
    BuyBomb,
}

impl ShopZone {
    pub const ALL: [ShopZone; 4] = [
        ShopZone::UpgradeEngine,
        ShopZone::PayDebt,
        ShopZone::BuyShields,
        ShopZone::BuyBomb,
    ];

    /// Terrain value this shop is painted with
    pub fn color(self) -> u8 {
        match self {
            ShopZone::UpgradeEngine => 50,
            ShopZone::PayDebt => 51,
            ShopZone::BuyShields => 52,
            ShopZone::BuyBomb => 53,
        }
    }

    pub fn from_color(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|z| z.color() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            ShopZone::UpgradeEngine => "Upgrade Engine",
            ShopZone::PayDebt => "Pay Debt",
            ShopZone::BuyShields => "Buy Shields",
            ShopZone::BuyBomb => "Buy Bomb",
        }
    }

    pub fn price(self) -> u64 {
        match self {
            ShopZone::UpgradeEngine => 100,
            ShopZone::PayDebt => 100,
            ShopZone::BuyShields => 75,
            ShopZone::BuyBomb => 25,
        }
    }

    /// Sign text, e.g. "Buy Bomb $25"
    pub fn sign(self) -> String {
        format!("{} ${}", self.label(), self.price())
    }

    /// Display color; the red channel carries the terrain value
    pub fn rgb(self) -> [f32; 3] {
        [self.color() as f32 / 255.0, 179.0 / 255.0, 1.0]
    }
}

/// Most frequent non-empty value in a window.
///
/// Ties go to the smallest value (the first run in sorted order).
pub fn most_frequent(samples: &[u8]) -> Option<u8> {
    let mut counts = [0u32; 256];
    for &s in samples {
        if s != EMPTY {
            counts[s as usize] += 1;
        }
    }

    let mut best: Option<(u8, u32)> = None;
    for (value, &count) in counts.iter().enumerate() {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((value as u8, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Which shop, if any, a window of samples sits in
pub fn classify(samples: &[u8]) -> Option<ShopZone> {
    most_frequent(samples).and_then(ShopZone::from_color)
}

/// Outcome of checking a window against the shops and the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneVerdict {
    /// Not in any shop
    Outside,
    /// In a shop but cannot afford it
    PricedOut(ShopZone),
    /// In "Pay Debt" with nothing owed
    NothingOwed,
    /// In a shop that can sell right now
    Shopping(ShopZone),
}

/// Classify a window and decide whether the purchase is currently possible
pub fn evaluate(samples: &[u8], economy: &Economy) -> ZoneVerdict {
    match classify(samples) {
        None => ZoneVerdict::Outside,
        Some(ShopZone::PayDebt) if economy.debt() == 0 => ZoneVerdict::NothingOwed,
        Some(zone) if economy.money() < zone.price() => ZoneVerdict::PricedOut(zone),
        Some(zone) => ZoneVerdict::Shopping(zone),
    }
}

/// Hold-to-purchase counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dwell {
    ticks: u32,
}

impl Dwell {
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Count one more tick in the zone. Returns true exactly when the
    /// threshold is reached; the counter then starts over.
    pub fn advance(&mut self, threshold: u32) -> bool {
        self.ticks += 1;
        if self.ticks >= threshold {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    /// Fraction of the way to a purchase (0..1)
    pub fn progress(&self, threshold: u32) -> f32 {
        if threshold == 0 {
            0.0
        } else {
            (self.ticks as f32 / threshold as f32).min(1.0)
        }
    }
}

/// Decides which new buildings become shops, cycling through a shuffled order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopRotation {
    order: VecDeque<ShopZone>,
    since_last: u32,
}

impl ShopRotation {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut order = ShopZone::ALL.to_vec();
        order.shuffle(rng);
        Self {
            order: order.into(),
            since_last: 0,
        }
    }

    /// Called once per new building. A shop can appear from the second
    /// building on (20% chance) and is guaranteed after three plain ones.
    pub fn next_building(&mut self, rng: &mut impl Rng) -> Option<ShopZone> {
        self.since_last += 1;
        let roll: f32 = rng.random();
        if (self.since_last > 1 && roll < 0.2) || self.since_last > 3 {
            self.since_last = 0;
            let zone = self.order.pop_front()?;
            self.order.push_back(zone);
            Some(zone)
        } else {
            None
        }
    }
}
