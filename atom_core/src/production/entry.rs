//! ProductionEntry - One rate's additions, multipliers and resolved total

use crate::config::NormalizationConstants;
use crate::tower::TowerNumber;
use crate::types::{RateKind, SourceCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a single addition or multiplier came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTag {
    /// Source id (upgrade id, rarity group id, ...)
    pub id: String,
    /// Display label
    pub label: String,
    pub category: SourceCategory,
    pub value: TowerNumber,
}

impl SourceTag {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: SourceCategory,
        value: TowerNumber,
    ) -> Self {
        SourceTag {
            id: id.into(),
            label: label.into(),
            category,
            value,
        }
    }
}

/// Represents one production rate under the Base + Additions → Multipliers model
///
/// Final value is calculated as:
/// `max(0, base + Σ additions) × Π multipliers`, then normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEntry {
    pub kind: RateKind,
    pub base: TowerNumber,
    /// Signed flat additions, in composition order
    pub additions: Vec<SourceTag>,
    /// Multipliers, in composition order
    pub multipliers: Vec<SourceTag>,
    pub total_addition: TowerNumber,
    pub total_multiplier: TowerNumber,
    pub total: TowerNumber,
    /// Product of the multipliers of each multiplier category
    pub category_multipliers: BTreeMap<SourceCategory, TowerNumber>,
}

impl ProductionEntry {
    /// Create an entry with just a base value
    pub fn with_base(kind: RateKind, base: TowerNumber) -> Self {
        ProductionEntry {
            kind,
            base,
            additions: Vec::new(),
            multipliers: Vec::new(),
            total_addition: TowerNumber::ZERO,
            total_multiplier: TowerNumber::ONE,
            total: TowerNumber::ZERO,
            category_multipliers: BTreeMap::new(),
        }
    }

    pub fn add_addition(&mut self, tag: SourceTag) {
        self.additions.push(tag);
    }

    pub fn add_multiplier(&mut self, tag: SourceTag) {
        self.multipliers.push(tag);
    }

    /// Resolve the totals from the recorded additions and multipliers
    pub fn resolve(&mut self, normalization: &NormalizationConstants) {
        let summed = self
            .additions
            .iter()
            .fold(self.base, |acc, tag| acc + tag.value);
        self.total_addition = summed.max(TowerNumber::ZERO);

        let mut categories: BTreeMap<SourceCategory, TowerNumber> = SourceCategory::multiplier_categories()
            .iter()
            .filter(|c| self.kind == RateKind::PerTime || **c != SourceCategory::Critical)
            .map(|c| (*c, TowerNumber::ONE))
            .collect();
        let mut product = TowerNumber::ONE;
        for tag in &self.multipliers {
            product = product * tag.value;
            let slot = categories.entry(tag.category).or_insert(TowerNumber::ONE);
            *slot = *slot * tag.value;
        }
        self.total_multiplier = product;
        self.category_multipliers = categories;

        self.total = normalize_total(self.total_addition * self.total_multiplier, normalization);
    }

    /// Product of one category's multipliers (1 when absent)
    pub fn category_multiplier(&self, category: SourceCategory) -> TowerNumber {
        self.category_multipliers
            .get(&category)
            .copied()
            .unwrap_or(TowerNumber::ONE)
    }

    /// Unnormalized total with one category's multipliers left out
    pub fn total_excluding(&self, category: SourceCategory) -> TowerNumber {
        self.category_multipliers
            .iter()
            .filter(|(c, _)| **c != category)
            .fold(self.total_addition, |acc, (_, m)| acc * *m)
    }

    /// Non-zero additions followed by non-neutral multipliers
    pub fn breakdown(&self) -> Vec<BreakdownLine> {
        let additions = self
            .additions
            .iter()
            .filter(|tag| !tag.value.is_zero())
            .map(|tag| BreakdownLine {
                rate: self.kind,
                kind: BreakdownKind::Addition,
                tag: tag.clone(),
            });
        let multipliers = self
            .multipliers
            .iter()
            .filter(|tag| !tag.value.is_effectively_one())
            .map(|tag| BreakdownLine {
                rate: self.kind,
                kind: BreakdownKind::Multiplier,
                tag: tag.clone(),
            });
        additions.chain(multipliers).collect()
    }
}

/// Whole atoms below `10^round_below_exponent`; positive totals never drop
/// below one
pub fn normalize_total(total: TowerNumber, normalization: &NormalizationConstants) -> TowerNumber {
    if !total.is_positive() {
        return TowerNumber::ZERO;
    }
    if total.layer() > 0 || total.exponent() >= normalization.round_below_exponent {
        return total;
    }
    total.round().max(TowerNumber::ONE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    Addition,
    Multiplier,
}

/// One visible line of the production breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub rate: RateKind,
    pub kind: BreakdownKind,
    pub tag: SourceTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(category: SourceCategory, value: f64) -> SourceTag {
        SourceTag::new("test", "Test", category, TowerNumber::from_f64(value))
    }

    #[test]
    fn test_resolve_additions_then_multipliers() {
        let mut entry = ProductionEntry::with_base(RateKind::PerTime, TowerNumber::ZERO);
        entry.add_addition(tag(SourceCategory::Shop, 10.0));
        entry.add_addition(tag(SourceCategory::Collection, 5.0));
        entry.add_multiplier(tag(SourceCategory::Shop, 2.0));
        entry.resolve(&NormalizationConstants::default());

        assert_eq!(entry.total_addition.to_f64(), 15.0);
        assert_eq!(entry.total_multiplier.to_f64(), 2.0);
        assert_eq!(entry.total.to_f64(), 30.0);
        assert_eq!(entry.category_multiplier(SourceCategory::Shop).to_f64(), 2.0);
        assert_eq!(entry.category_multiplier(SourceCategory::Trophy).to_f64(), 1.0);
    }

    #[test]
    fn test_total_excluding_skips_rounding() {
        let mut entry = ProductionEntry::with_base(RateKind::PerTime, TowerNumber::from_f64(3.0));
        entry.add_multiplier(tag(SourceCategory::Critical, 1.5));
        entry.add_multiplier(tag(SourceCategory::Shop, 1.1));
        entry.resolve(&NormalizationConstants::default());

        // 3 x 1.5 x 1.1 = 4.95 rounds to 5
        assert_eq!(entry.total.to_f64(), 5.0);
        let unboosted = entry.total_excluding(SourceCategory::Critical).to_f64();
        assert!((unboosted - 3.3).abs() < 1e-9);
    }

    #[test]
    fn test_negative_additions_floor_at_zero() {
        let mut entry = ProductionEntry::with_base(RateKind::PerAction, TowerNumber::from_f64(1.0));
        entry.add_addition(tag(SourceCategory::Debug, -5.0));
        entry.add_multiplier(tag(SourceCategory::Shop, 3.0));
        entry.resolve(&NormalizationConstants::default());
        assert!(entry.total_addition.is_zero());
        assert!(entry.total.is_zero());
    }

    #[test]
    fn test_normalization() {
        let normalization = NormalizationConstants::default();
        assert_eq!(normalize_total(TowerNumber::from_f64(0.3), &normalization).to_f64(), 1.0);
        assert_eq!(normalize_total(TowerNumber::from_f64(12.6), &normalization).to_f64(), 13.0);
        assert!(normalize_total(TowerNumber::ZERO, &normalization).is_zero());

        let big = TowerNumber::from_scientific(1.5, 20.0);
        assert_eq!(normalize_total(big, &normalization), big);
    }

    #[test]
    fn test_breakdown_hides_neutral_lines() {
        let mut entry = ProductionEntry::with_base(RateKind::PerTime, TowerNumber::ZERO);
        entry.add_addition(tag(SourceCategory::Shop, 0.0));
        entry.add_addition(tag(SourceCategory::Fusion, 4.0));
        entry.add_multiplier(tag(SourceCategory::Family, 1.0));
        entry.add_multiplier(tag(SourceCategory::Critical, 1.5));
        entry.resolve(&NormalizationConstants::default());

        let lines = entry.breakdown();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kind, BreakdownKind::Addition);
        assert_eq!(lines[0].tag.category, SourceCategory::Fusion);
        assert_eq!(lines[1].kind, BreakdownKind::Multiplier);
        assert_eq!(lines[1].tag.category, SourceCategory::Critical);
        // Hidden lines still count toward the totals
        assert_eq!(entry.total.to_f64(), 6.0);
    }

    #[test]
    fn test_per_action_has_no_critical_category() {
        let mut entry = ProductionEntry::with_base(RateKind::PerAction, TowerNumber::ONE);
        entry.resolve(&NormalizationConstants::default());
        assert!(!entry
            .category_multipliers
            .contains_key(&SourceCategory::Critical));
        assert!(entry.category_multipliers.contains_key(&SourceCategory::Frenzy));
    }
}
