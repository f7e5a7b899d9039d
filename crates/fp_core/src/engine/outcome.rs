//! Outcome Selector
//!
//! 당첨자 1명과 잡은 물고기(상품) 1종을 각각 독립적으로 균등 추첨합니다.
//! 등급(rarity)은 표시용일 뿐 확률 가중치가 없습니다.

use serde::{Deserialize, Serialize};

use super::random::{draw_index, RandomSource};
use crate::error::ContractViolation;
use crate::roster::Roster;

/// Minimum roster size a draw is defined for
pub const MIN_PARTICIPANTS: usize = 2;

/// Decorative rarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrizeRarity {
    Common,
    Rare,
    VeryRare,
    Legendary,
    Mythic,
}

impl PrizeRarity {
    pub fn label(&self) -> &'static str {
        match self {
            PrizeRarity::Common => "Common",
            PrizeRarity::Rare => "Rare",
            PrizeRarity::VeryRare => "Very Rare",
            PrizeRarity::Legendary => "Legendary",
            PrizeRarity::Mythic => "Mythic",
        }
    }
}

/// The eight catchable prizes, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrizeKind {
    Goldfish,
    TropicalFish,
    Pufferfish,
    SmallShark,
    Octopus,
    Lobster,
    MiniWhale,
    GoldenFish,
}

pub const PRIZE_CATALOG: [PrizeKind; 8] = [
    PrizeKind::Goldfish,
    PrizeKind::TropicalFish,
    PrizeKind::Pufferfish,
    PrizeKind::SmallShark,
    PrizeKind::Octopus,
    PrizeKind::Lobster,
    PrizeKind::MiniWhale,
    PrizeKind::GoldenFish,
];

impl PrizeKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            PrizeKind::Goldfish => "🐟",
            PrizeKind::TropicalFish => "🐠",
            PrizeKind::Pufferfish => "🐡",
            PrizeKind::SmallShark => "🦈",
            PrizeKind::Octopus => "🐙",
            PrizeKind::Lobster => "🦞",
            PrizeKind::MiniWhale => "🐋",
            PrizeKind::GoldenFish => "🏆",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrizeKind::Goldfish => "Goldfish",
            PrizeKind::TropicalFish => "Tropical Fish",
            PrizeKind::Pufferfish => "Pufferfish",
            PrizeKind::SmallShark => "Small Shark",
            PrizeKind::Octopus => "Octopus",
            PrizeKind::Lobster => "Lobster",
            PrizeKind::MiniWhale => "Mini Whale",
            PrizeKind::GoldenFish => "Golden Fish",
        }
    }

    pub fn rarity(&self) -> PrizeRarity {
        match self {
            PrizeKind::Goldfish => PrizeRarity::Common,
            PrizeKind::TropicalFish | PrizeKind::Pufferfish => PrizeRarity::Rare,
            PrizeKind::SmallShark | PrizeKind::Octopus => PrizeRarity::VeryRare,
            PrizeKind::Lobster | PrizeKind::MiniWhale => PrizeRarity::Legendary,
            PrizeKind::GoldenFish => PrizeRarity::Mythic,
        }
    }

    pub fn entry(&self) -> PrizeEntry {
        PrizeEntry {
            kind: *self,
            symbol: self.symbol().to_string(),
            display_name: self.display_name().to_string(),
            rarity: self.rarity(),
        }
    }
}

/// Flattened catalog row for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub kind: PrizeKind,
    pub symbol: String,
    pub display_name: String,
    pub rarity: PrizeRarity,
}

pub fn prize_catalog() -> Vec<PrizeEntry> {
    PRIZE_CATALOG.iter().map(PrizeKind::entry).collect()
}

/// Result of one completed draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunOutcome {
    pub winner_name: String,
    pub prize: PrizeKind,
}

impl RunOutcome {
    pub fn summary(&self) -> String {
        format!(
            "{} caught a {} {} ({})",
            self.winner_name,
            self.prize.symbol(),
            self.prize.display_name(),
            self.prize.rarity().label()
        )
    }
}

/// Draw a winner, then a prize, from two independent uniform values.
///
/// # Errors
/// - [`ContractViolation::InsufficientRoster`] for fewer than 2 participants
/// - random source failures from [`draw_index`]
pub fn select_outcome<R: RandomSource + ?Sized>(
    roster: &Roster,
    source: &mut R,
) -> Result<RunOutcome, ContractViolation> {
    if roster.len() < MIN_PARTICIPANTS {
        return Err(ContractViolation::InsufficientRoster { found: roster.len() });
    }

    let winner_index = draw_index(source, roster.len())?;
    let prize_index = draw_index(source, PRIZE_CATALOG.len())?;

    let winner_name = roster
        .get(winner_index)
        .ok_or(ContractViolation::InsufficientRoster { found: roster.len() })?
        .to_string();

    Ok(RunOutcome { winner_name, prize: PRIZE_CATALOG[prize_index] })
}
