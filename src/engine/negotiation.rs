//! Rate negotiation decision engine.
//!
//! Pure function of (load, offer, round, prior counter). Every threshold is a
//! multiple of the load's loadboard rate and lives in [`NegotiationPolicy`].

use crate::domain::{Decision, Load, Money, OfferEvaluation};
use rust_decimal::Decimal;

const UNKNOWN_LOAD: &str = "Unknown load_id; cannot evaluate without a valid load context.";
const NON_POSITIVE_OFFER: &str = "Carrier offer must be a positive amount.";
const WITHIN_TOLERANCE: &str = "Offer is within accepted rate tolerance.";
const FINAL_ROUND_PREMIUM: &str = "Final negotiation round exceeded acceptable premium threshold.";
const ABOVE_BASELINE: &str = "Offer is materially above market baseline.";
const COUNTERING: &str = "Countering toward indexed market rate.";

/// Markups over the loadboard rate that drive each decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationPolicy {
    /// Offers at or below `rate * accept_markup` (cent-rounded) are accepted.
    pub accept_markup: Decimal,
    /// From this round on, a tighter premium ceiling applies.
    pub final_round: u32,
    pub final_round_markup: Decimal,
    /// Offers at or above `rate * hard_reject_markup` (cent-rounded) are rejected.
    pub hard_reject_markup: Decimal,
    /// Counters never exceed `rate * counter_cap_markup`.
    pub counter_cap_markup: Decimal,
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self {
            accept_markup: Decimal::new(102, 2),
            final_round: 3,
            final_round_markup: Decimal::new(110, 2),
            hard_reject_markup: Decimal::new(115, 2),
            counter_cap_markup: Decimal::new(106, 2),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NegotiationEngine {
    policy: NegotiationPolicy,
}

impl NegotiationEngine {
    pub fn new(policy: NegotiationPolicy) -> Self {
        Self { policy }
    }

    /// Decide on a carrier offer.
    ///
    /// Invalid input degrades to `NeedsMoreInfo` so the voice flow always has
    /// something to say. `round_number` is validated by the caller.
    pub fn evaluate_offer(
        &self,
        load: Option<&Load>,
        carrier_offer: Money,
        round_number: u32,
        previous_counter_rate: Option<Money>,
    ) -> OfferEvaluation {
        let Some(load) = load else {
            return OfferEvaluation::new(Decision::NeedsMoreInfo, UNKNOWN_LOAD);
        };

        if !carrier_offer.is_positive() {
            return OfferEvaluation::new(Decision::NeedsMoreInfo, NON_POSITIVE_OFFER);
        }

        let p = &self.policy;
        let target = load.loadboard_rate;

        let accept_threshold = target.scale(p.accept_markup).round_cents();
        if carrier_offer <= accept_threshold {
            return OfferEvaluation::new(Decision::Accept, WITHIN_TOLERANCE);
        }

        if round_number >= p.final_round && carrier_offer > target.scale(p.final_round_markup) {
            return OfferEvaluation::new(Decision::Reject, FINAL_ROUND_PREMIUM);
        }

        let hard_reject_threshold = target.scale(p.hard_reject_markup).round_cents();
        if carrier_offer >= hard_reject_threshold {
            return OfferEvaluation::new(Decision::Reject, ABOVE_BASELINE);
        }

        // Anchor on the last counter so the midpoint never walks back.
        let anchor = match previous_counter_rate {
            Some(prev) => target.max(prev),
            None => target,
        };
        let counter_raw = Money::midpoint(carrier_offer, anchor);
        let counter_cap = target.scale(p.counter_cap_markup);
        let mut counter_rate = counter_raw.min(counter_cap).round_cents();

        if let Some(prev) = previous_counter_rate {
            counter_rate = counter_rate.max(prev.round_cents());
        }

        OfferEvaluation::counter(counter_rate, COUNTERING)
    }
}
