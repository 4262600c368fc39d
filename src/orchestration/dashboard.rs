use crate::db::{
    CallStats, DecisionBreakdown, FunnelStage, NegotiationOutcome, Repository, SentimentPoint,
};
use crate::domain::{Decision, Money};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

pub const LOAD_PERFORMANCE_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_calls: i64,
    pub verified_carriers: i64,
    pub booked_loads: i64,
    pub avg_sentiment: f64,
    pub revenue_accepted: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadPerformance {
    pub load_id: String,
    /// Percentage of rounds on this load that were accepted, 2 dp.
    pub acceptance_rate: f64,
    pub avg_offer: Money,
    /// Zero when the load is no longer in the inventory.
    pub loadboard_rate: Money,
}

/// Read-only analytics over calls and negotiation history.
#[derive(Clone)]
pub struct Dashboard {
    repo: Arc<Repository>,
}

impl Dashboard {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub async fn overview(&self) -> Result<Overview, sqlx::Error> {
        let (stats, accepted) =
            futures::try_join!(self.repo.call_stats(), self.repo.accepted_offers())?;
        let CallStats {
            total_calls,
            verified_carriers,
            booked_loads,
            avg_sentiment,
        } = stats;

        Ok(Overview {
            total_calls,
            verified_carriers,
            booked_loads,
            avg_sentiment,
            revenue_accepted: accepted.into_iter().sum::<Money>().round_cents(),
        })
    }

    pub async fn funnel(&self) -> Result<Vec<FunnelStage>, sqlx::Error> {
        self.repo.call_funnel().await
    }

    pub async fn negotiations(&self) -> Result<Vec<DecisionBreakdown>, sqlx::Error> {
        self.repo.decision_breakdown().await
    }

    pub async fn sentiment(&self) -> Result<Vec<SentimentPoint>, sqlx::Error> {
        self.repo.sentiment_by_day().await
    }

    pub async fn load_performance(&self) -> Result<Vec<LoadPerformance>, sqlx::Error> {
        let (outcomes, loads) =
            futures::try_join!(self.repo.negotiation_outcomes(), self.repo.all_loads())?;
        let rates: HashMap<String, Money> = loads
            .into_iter()
            .map(|l| (l.load_id.as_str().to_string(), l.loadboard_rate))
            .collect();

        Ok(summarize_load_performance(&outcomes, &rates, LOAD_PERFORMANCE_LIMIT))
    }
}

#[derive(Default)]
struct Tally {
    attempts: i64,
    accepted: i64,
    offers: Money,
}

/// Per-load attempt statistics, most negotiated loads first (ties by id).
pub fn summarize_load_performance(
    outcomes: &[NegotiationOutcome],
    rates: &HashMap<String, Money>,
    limit: usize,
) -> Vec<LoadPerformance> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for outcome in outcomes {
        let tally = tallies.entry(outcome.load_id.as_str()).or_default();
        tally.attempts += 1;
        if outcome.decision == Decision::Accept {
            tally.accepted += 1;
        }
        tally.offers = tally.offers + outcome.carrier_offer;
    }

    let mut ranked: Vec<(&str, Tally)> = tallies.into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| b.attempts.cmp(&a.attempts).then(a_id.cmp(b_id)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(load_id, tally)| {
            let attempts = Decimal::from(tally.attempts);
            let rate = (Decimal::from(tally.accepted * 100) / attempts)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

            LoadPerformance {
                load_id: load_id.to_string(),
                acceptance_rate: rate.to_f64().unwrap_or(0.0),
                avg_offer: Money::new(tally.offers.inner() / attempts).round_cents(),
                loadboard_rate: rates.get(load_id).copied().unwrap_or_default(),
            }
        })
        .collect()
}
