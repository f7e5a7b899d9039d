//! Circular Layout
//!
//! 참가자를 연못 중심 기준 원 위에 배치합니다.
//! - index 0 은 12시 방향, 시계 방향으로 진행
//! - 인원 수에 따라 반지름 3단계 (180 / 200 / 220)
//! - 회전 각도는 라벨을 다시 세우기 위한 값 (`angle + π/2`)
//!
//! Layout is recomputed for every participant whenever the total changes;
//! there is no incremental update.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::roster::Roster;

/// Radius for rosters up to `MEDIUM_ABOVE`
pub const BASE_RADIUS: f64 = 180.0;
/// Radius for rosters above `MEDIUM_ABOVE`
pub const MEDIUM_RADIUS: f64 = 200.0;
/// Radius for rosters above `DENSE_ABOVE`
pub const DENSE_RADIUS: f64 = 220.0;

pub const MEDIUM_ABOVE: usize = 15;
pub const DENSE_ABOVE: usize = 30;

/// Names get shortened once the roster grows past this
pub const LABEL_TRUNCATE_ABOVE: usize = 50;
pub const LABEL_MAX_CHARS: usize = 8;

/// Position and orientation of one participant around the pond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Rotation (radians) that turns the label back upright
    pub angle: f64,
}

impl Placement {
    pub fn distance_from_center(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Roster density class. Selects radius and marker size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DensityTier {
    /// ≤ 15명
    #[default]
    Sparse,
    /// 16 ~ 30명
    Medium,
    /// 31명 이상 - 마커 축소
    Dense,
}

/// Radius tiers and label rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTiers {
    pub base_radius: f64,
    pub medium_radius: f64,
    pub dense_radius: f64,
    pub medium_above: usize,
    pub dense_above: usize,
    pub label_truncate_above: usize,
    pub label_max_chars: usize,
}

impl Default for LayoutTiers {
    fn default() -> Self {
        Self {
            base_radius: BASE_RADIUS,
            medium_radius: MEDIUM_RADIUS,
            dense_radius: DENSE_RADIUS,
            medium_above: MEDIUM_ABOVE,
            dense_above: DENSE_ABOVE,
            label_truncate_above: LABEL_TRUNCATE_ABOVE,
            label_max_chars: LABEL_MAX_CHARS,
        }
    }
}

impl LayoutTiers {
    pub fn density(&self, total: usize) -> DensityTier {
        if total > self.dense_above {
            DensityTier::Dense
        } else if total > self.medium_above {
            DensityTier::Medium
        } else {
            DensityTier::Sparse
        }
    }

    pub fn radius(&self, total: usize) -> f64 {
        match self.density(total) {
            DensityTier::Dense => self.dense_radius,
            DensityTier::Medium => self.medium_radius,
            DensityTier::Sparse => self.base_radius,
        }
    }

    /// Placement of `index` out of `total` participants.
    ///
    /// `total` must be at least 1; a zero total is treated as 1.
    pub fn position_of(&self, index: usize, total: usize) -> Placement {
        debug_assert!(total >= 1, "position_of called with empty roster");
        let total = total.max(1);
        let angle = (index as f64 / total as f64) * TAU - FRAC_PI_2;
        let radius = self.radius(total);
        Placement { x: radius * angle.cos(), y: radius * angle.sin(), angle: angle + FRAC_PI_2 }
    }

    /// Display label, shortened for very large rosters.
    pub fn display_label(&self, name: &str, total: usize) -> String {
        if total <= self.label_truncate_above || name.chars().count() <= self.label_max_chars {
            return name.to_string();
        }
        let mut label: String = name.chars().take(self.label_max_chars).collect();
        label.push_str("...");
        label
    }

    /// Placements for every index of a roster of `total`.
    pub fn positions(&self, total: usize) -> Vec<Placement> {
        (0..total).map(|index| self.position_of(index, total)).collect()
    }
}

/// [`LayoutTiers::position_of`] with the default tiers.
pub fn position_of(index: usize, total: usize) -> Placement {
    LayoutTiers::default().position_of(index, total)
}

pub fn display_label(name: &str, total: usize) -> String {
    LayoutTiers::default().display_label(name, total)
}

/// Placements for one roster generation.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    tiers: LayoutTiers,
    generation: Option<u64>,
    placements: Vec<Placement>,
}

impl LayoutCache {
    pub fn new(tiers: LayoutTiers) -> Self {
        Self { tiers, generation: None, placements: Vec::new() }
    }

    pub fn tiers(&self) -> &LayoutTiers {
        &self.tiers
    }

    /// Cached placements for `roster`, recomputed in full when the roster
    /// generation differs from the cached one.
    pub fn placements(&mut self, roster: &Roster) -> &[Placement] {
        if self.generation != Some(roster.generation()) || self.placements.len() != roster.len() {
            self.placements = self.tiers.positions(roster.len());
            self.generation = Some(roster.generation());
        }
        &self.placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_density_radius_tiers() {
        assert!((position_of(0, 10).distance_from_center() - 180.0).abs() < EPS);
        assert!((position_of(0, 20).distance_from_center() - 200.0).abs() < EPS);
        assert!((position_of(0, 40).distance_from_center() - 220.0).abs() < EPS);
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        let tiers = LayoutTiers::default();
        assert_eq!(tiers.radius(15), 180.0);
        assert_eq!(tiers.radius(16), 200.0);
        assert_eq!(tiers.radius(30), 200.0);
        assert_eq!(tiers.radius(31), 220.0);
        assert_eq!(tiers.density(15), DensityTier::Sparse);
        assert_eq!(tiers.density(31), DensityTier::Dense);
    }

    #[test]
    fn test_index_zero_is_top_and_upright() {
        let p = position_of(0, 4);
        assert!(p.x.abs() < EPS);
        assert!((p.y + 180.0).abs() < EPS);
        assert!(p.angle.abs() < EPS);
    }

    #[test]
    fn test_clockwise_quarter_steps() {
        // 4명: 12시 → 3시 → 6시 → 9시 (y 축 아래 방향이 +)
        let right = position_of(1, 4);
        assert!((right.x - 180.0).abs() < EPS);
        assert!(right.y.abs() < EPS);
        assert!((right.angle - FRAC_PI_2).abs() < EPS);

        let bottom = position_of(2, 4);
        assert!(bottom.x.abs() < EPS);
        assert!((bottom.y - 180.0).abs() < EPS);

        let left = position_of(3, 4);
        assert!((left.x + 180.0).abs() < EPS);
    }

    #[test]
    fn test_display_label_truncates_only_large_rosters() {
        assert_eq!(display_label("Bartholomew", 50), "Bartholomew");
        assert_eq!(display_label("Bartholomew", 51), "Bartholo...");
        assert_eq!(display_label("Andi", 80), "Andi");
        assert_eq!(display_label("Ñandú Pérez", 51), "Ñandú Pé...");
    }

    #[test]
    fn test_cache_recomputes_on_generation_change() {
        let mut roster = Roster::from_names(["A", "B"]);
        let mut cache = LayoutCache::new(LayoutTiers::default());

        let first = cache.placements(&roster).to_vec();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1], position_of(1, 2));

        roster.add("C");
        let second = cache.placements(&roster).to_vec();
        assert_eq!(second.len(), 3);
        assert_eq!(second[1], position_of(1, 3));
        assert_ne!(first[1], second[1]);
    }

    proptest! {
        #[test]
        fn prop_every_placement_on_tier_circle(total in 1usize..120, seed in 0usize..1000) {
            let index = seed % total;
            let tiers = LayoutTiers::default();
            let p = tiers.position_of(index, total);
            prop_assert!((p.distance_from_center() - tiers.radius(total)).abs() < 1e-6);
        }
    }
}
