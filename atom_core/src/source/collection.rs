//! CollectionSource - Bonuses from owned collectibles, by rarity group and
//! by family

use crate::config::{Catalog, ProductionConfig};
use crate::production::ProductionAccumulator;
use crate::source::ProductionSource;
use crate::tower::TowerNumber;
use crate::types::{RateKind, RateValues, SourceCategory};
use std::collections::BTreeMap;

/// Ownership counts over one group of collectibles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupTally {
    /// Items defined in the group
    pub total: u32,
    /// Distinct items owned
    pub unique: u32,
    /// Owned copies, duplicates included
    pub copies: u32,
    /// Copies beyond the first of each item
    pub duplicates: u32,
}

impl GroupTally {
    /// An empty group is never complete
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.unique == self.total
    }

    fn count(&mut self, owned: u32) {
        self.total += 1;
        if owned > 0 {
            self.unique += 1;
            self.copies = self.copies.saturating_add(owned);
            self.duplicates = self.duplicates.saturating_add(owned - 1);
        }
    }
}

/// Every rarity-group and family bonus, plus the special-group side outputs
pub struct CollectionSource<'a> {
    catalog: &'a Catalog,
    config: &'a ProductionConfig,
    counts: &'a BTreeMap<String, u32>,
}

impl<'a> CollectionSource<'a> {
    pub fn new(
        catalog: &'a Catalog,
        config: &'a ProductionConfig,
        counts: &'a BTreeMap<String, u32>,
    ) -> Self {
        CollectionSource {
            catalog,
            config,
            counts,
        }
    }

    fn owned(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Tally a rarity group
    pub fn group_tally(&self, group_id: &str) -> GroupTally {
        let mut tally = GroupTally::default();
        for item in self.catalog.collectibles_in_group(group_id) {
            tally.count(self.owned(&item.id));
        }
        tally
    }

    /// Tally a family
    pub fn family_tally(&self, family_id: &str) -> GroupTally {
        let mut tally = GroupTally::default();
        for item in self.catalog.collectibles_in_family(family_id) {
            tally.count(self.owned(&item.id));
        }
        tally
    }

    /// Log owned ids the catalog does not know and items pointing at
    /// undefined groups
    fn report_inconsistencies(&self) {
        for id in self.counts.keys() {
            if self.catalog.collectible(id).is_none() {
                tracing::debug!(collectible = %id, "skipping unknown collectible");
            }
        }
        for item in &self.catalog.collectibles {
            if self.catalog.rarity_group(&item.rarity).is_none() {
                tracing::warn!(collectible = %item.id, rarity = %item.rarity, "collectible references unknown rarity group");
            }
            if let Some(family) = &item.family {
                if self.catalog.family(family).is_none() {
                    tracing::warn!(collectible = %item.id, family = %family, "collectible references unknown family");
                }
            }
        }
    }

    fn apply_special_group(&self, production: &mut ProductionAccumulator) {
        let special = &self.config.special;
        if self.catalog.rarity_group(&special.group).is_none() {
            tracing::warn!(group = %special.group, "special rarity group is not in the catalog");
            return;
        }
        let tally = self.group_tally(&special.group);

        let ticket = &self.config.ticket;
        production.ticket_interval_secs = (ticket.base_interval_secs
            - tally.unique as f64 * ticket.reduction_per_unique_secs)
            .max(ticket.min_interval_secs);

        let offline = &self.config.offline;
        let counted = tally.duplicates.min(offline.saturation_duplicates);
        production.offline_multiplier = (offline.base_multiplier
            + counted as f64 * offline.per_duplicate)
            .min(offline.max_multiplier);

        let overflow = tally.duplicates.saturating_sub(offline.saturation_duplicates);
        add_flats(
            production,
            &special.group,
            "Duplicate overflow",
            SourceCategory::Collection,
            &offline.overflow_flat.scaled(overflow as f64),
        );

        if tally.is_complete() {
            production.frenzy_special_multiplier = special.frenzy_spawn_multiplier;
        }
    }
}

impl ProductionSource for CollectionSource<'_> {
    fn id(&self) -> &str {
        "collection"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        self.report_inconsistencies();

        let tallies: Vec<GroupTally> = self
            .catalog
            .rarity_groups
            .iter()
            .map(|group| self.group_tally(&group.id))
            .collect();

        // Rarity group flats
        for (group, tally) in self.catalog.rarity_groups.iter().zip(&tallies) {
            let id = group.id.as_str();
            let name = group.name.as_str();
            add_flats(production, id, name, SourceCategory::Collection, &group.per_copy.scaled(tally.copies as f64));
            add_flats(production, id, name, SourceCategory::Collection, &group.per_unique.scaled(tally.unique as f64));
            add_flats(production, id, name, SourceCategory::Collection, &group.per_duplicate.scaled(tally.duplicates as f64));
            let completion = if tally.is_complete() {
                group.completion_flat
            } else {
                RateValues::default()
            };
            add_flats(production, id, name, SourceCategory::Collection, &completion);
        }

        self.apply_special_group(production);

        // Family flats
        let family_tallies: Vec<GroupTally> = self
            .catalog
            .families
            .iter()
            .map(|family| self.family_tally(&family.id))
            .collect();
        for (family, tally) in self.catalog.families.iter().zip(&family_tallies) {
            let id = family.id.as_str();
            let name = family.name.as_str();
            add_flats(production, id, name, SourceCategory::Family, &family.per_unique.scaled(tally.unique as f64));
            let completion = if tally.is_complete() {
                family.completion_flat
            } else {
                RateValues::default()
            };
            add_flats(production, id, name, SourceCategory::Family, &completion);
        }

        // Rarity group multipliers, amplified once the amplifier group is complete
        let amplifier = &self.config.collection;
        let amplified = self.catalog.rarity_group(&amplifier.amplifier_group).is_some()
            && self.group_tally(&amplifier.amplifier_group).is_complete();
        for (group, tally) in self.catalog.rarity_groups.iter().zip(&tallies) {
            for &kind in RateKind::all() {
                let mut multiplier = 1.0 + group.multiplier_per_unique.get(kind) * tally.unique as f64;
                if tally.is_complete() {
                    multiplier *= group.completion_multiplier.get(kind);
                }
                if amplified {
                    multiplier = 1.0 + (multiplier - 1.0) * amplifier.amplifier_factor;
                }
                production.add_multiplier(
                    kind,
                    &group.id,
                    &group.name,
                    SourceCategory::Collection,
                    TowerNumber::from_f64(multiplier),
                );
            }
        }

        // Family completion multipliers
        for (family, tally) in self.catalog.families.iter().zip(&family_tallies) {
            for &kind in RateKind::all() {
                let multiplier = if tally.is_complete() {
                    family.completion_multiplier.get(kind)
                } else {
                    1.0
                };
                production.add_multiplier(
                    kind,
                    &family.id,
                    &family.name,
                    SourceCategory::Family,
                    TowerNumber::from_f64(multiplier),
                );
            }
        }
    }
}

fn add_flats(
    production: &mut ProductionAccumulator,
    id: &str,
    label: &str,
    category: SourceCategory,
    values: &RateValues,
) {
    for &kind in RateKind::all() {
        production.add_flat(kind, id, label, category, TowerNumber::from_f64(values.get(kind)));
    }
}
