use crate::db::{LoadCatalog, NegotiationHistory};
use crate::domain::{LoadId, Money, NegotiationRecord, OfferEvaluation};
use crate::engine::NegotiationEngine;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// One carrier offer as received from the voice agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRequest {
    pub load_id: String,
    pub carrier_offer: Money,
    pub round_number: u32,
    pub call_sid: Option<String>,
}

/// Runs an offer through the engine with the load and negotiation context
/// fetched from storage, and records the round.
///
/// Rounds on the same load are serialized: the prior-counter read, the
/// evaluation and the history write happen under one per-load lock, so a
/// concurrent round always sees the counter written before it.
#[derive(Clone)]
pub struct OfferDesk {
    catalog: Arc<dyn LoadCatalog>,
    history: Arc<dyn NegotiationHistory>,
    engine: NegotiationEngine,
    load_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl OfferDesk {
    pub fn new(
        catalog: Arc<dyn LoadCatalog>,
        history: Arc<dyn NegotiationHistory>,
        engine: NegotiationEngine,
    ) -> Self {
        Self {
            catalog,
            history,
            engine,
            load_locks: Arc::new(DashMap::new()),
        }
    }

    fn load_lock(&self, load_id: &str) -> Arc<Mutex<()>> {
        self.load_locks
            .entry(load_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Evaluate an offer.
    ///
    /// Unknown loads are answered with `needs_more_info` and nothing is
    /// recorded, since history rows must reference a stored load.
    ///
    /// # Errors
    /// Returns an error if a storage lookup or the history write fails.
    pub async fn evaluate(&self, request: &OfferRequest) -> Result<OfferEvaluation, sqlx::Error> {
        let Some(load) = self.catalog.get_by_id(&request.load_id).await? else {
            debug!(load_id = %request.load_id, "Offer for unknown load");
            return Ok(self.engine.evaluate_offer(
                None,
                request.carrier_offer,
                request.round_number,
                None,
            ));
        };

        let lock = self.load_lock(&request.load_id);
        let _guard = lock.lock().await;

        let previous_counter = self
            .history
            .latest_counter_before_round(&request.load_id, request.round_number)
            .await?;

        let evaluation = self.engine.evaluate_offer(
            Some(&load),
            request.carrier_offer,
            request.round_number,
            previous_counter,
        );

        let record = NegotiationRecord::from_evaluation(
            request.call_sid.clone(),
            LoadId::new(request.load_id.as_str()),
            request.carrier_offer,
            request.round_number,
            &evaluation,
        );
        self.history.record(&record).await?;

        info!(
            load_id = %request.load_id,
            round = request.round_number,
            offer = %request.carrier_offer,
            previous_counter = ?previous_counter.map(|m| m.to_storage_string()),
            decision = %evaluation.decision,
            counter_rate = ?evaluation.counter_rate.map(|m| m.to_storage_string()),
            "Evaluated offer"
        );

        Ok(evaluation)
    }
}
