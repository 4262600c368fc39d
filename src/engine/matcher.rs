//! Fuzzy load matching: score active loads against what a carrier asked for.

use super::text::{canonical_equipment, normalize_text, tokens, EQUIPMENT_ALIASES};
use crate::domain::time::to_naive_utc;
use crate::domain::Load;
use chrono::{DateTime, NaiveDateTime, TimeZone};
use std::cmp::Reverse;

pub const DEFAULT_SEARCH_LIMIT: usize = 15;

const EXACT: u32 = 3;
const CONTAINED: u32 = 2;
const SINGLE_TOKEN: u32 = 1;
const MULTI_TOKEN: u32 = 2;

/// Multipliers applied to the equipment and origin scores.
///
/// Origin is weighted higher: a carrier deadheading across the state is a
/// worse fit than a close trailer-type match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWeights {
    pub equipment: u32,
    pub origin: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            equipment: 2,
            origin: 3,
        }
    }
}

/// Per-candidate scoring breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredLoad<'a> {
    pub load: &'a Load,
    pub equipment_score: u32,
    pub origin_score: u32,
    pub total: u32,
    /// Seconds between pickup and requested availability.
    pub time_distance: i64,
}

impl ScoredLoad<'_> {
    fn sort_key(&self) -> (Reverse<u32>, i64, NaiveDateTime, &str) {
        (
            Reverse(self.total),
            self.time_distance,
            self.load.pickup_datetime.naive_utc(),
            self.load.load_id.as_str(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LoadMatcher {
    aliases: &'static [(&'static str, &'static str)],
    weights: MatchWeights,
}

impl Default for LoadMatcher {
    fn default() -> Self {
        Self {
            aliases: EQUIPMENT_ALIASES,
            weights: MatchWeights::default(),
        }
    }
}

impl LoadMatcher {
    /// Best matches first, at most `limit` of them. Never fails; no signal
    /// yields an empty result.
    pub fn search<Tz: TimeZone>(
        &self,
        equipment_type: &str,
        origin_location: &str,
        availability_time: &DateTime<Tz>,
        candidates: &[Load],
        limit: usize,
    ) -> Vec<Load> {
        self.rank(equipment_type, origin_location, availability_time, candidates)
            .into_iter()
            .take(limit)
            .map(|scored| scored.load.clone())
            .collect()
    }

    /// Score every active candidate with some signal and order them.
    ///
    /// Ordering: total score desc, time distance asc, pickup asc, load_id asc.
    pub fn rank<'a, Tz: TimeZone>(
        &self,
        equipment_type: &str,
        origin_location: &str,
        availability_time: &DateTime<Tz>,
        candidates: &'a [Load],
    ) -> Vec<ScoredLoad<'a>> {
        let wanted_equipment = canonical_equipment(equipment_type, self.aliases);
        let wanted_origin = normalize_text(origin_location);
        let origin_tokens = tokens(&wanted_origin);
        let available_at = to_naive_utc(availability_time);

        let mut scored: Vec<ScoredLoad<'a>> = candidates
            .iter()
            .filter(|load| load.is_active)
            .filter_map(|load| {
                let equipment_score = equipment_score(
                    &wanted_equipment,
                    &canonical_equipment(&load.equipment_type, self.aliases),
                );
                let origin_score =
                    origin_score(&wanted_origin, &origin_tokens, &normalize_text(&load.origin));

                if equipment_score == 0 && origin_score == 0 {
                    return None;
                }

                let pickup = to_naive_utc(&load.pickup_datetime);
                Some(ScoredLoad {
                    load,
                    equipment_score,
                    origin_score,
                    total: equipment_score * self.weights.equipment
                        + origin_score * self.weights.origin,
                    time_distance: (pickup - available_at).num_seconds().abs(),
                })
            })
            .collect();

        scored.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        scored
    }
}

fn equipment_score(wanted: &str, offered: &str) -> u32 {
    if wanted.is_empty() || offered.is_empty() {
        0
    } else if wanted == offered {
        EXACT
    } else if wanted.contains(offered) || offered.contains(wanted) {
        CONTAINED
    } else {
        0
    }
}

fn origin_score(wanted: &str, wanted_tokens: &[&str], origin: &str) -> u32 {
    if wanted.is_empty() || origin.is_empty() {
        return 0;
    }
    if origin.contains(wanted) {
        return EXACT;
    }

    match wanted_tokens.iter().filter(|t| origin.contains(**t)).count() {
        0 => 0,
        1 => SINGLE_TOKEN,
        _ => MULTI_TOKEN,
    }
}
