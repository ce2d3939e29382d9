//! Hooks for inspecting how rates were matched and priced.

use crate::cost::CostBreakdown;
use crate::ids::{MethodId, RateId};
use crate::matching::RateEvaluation;
use crate::model::{RateType, ShippingRate};
use crate::money::Money;
use serde::Serialize;
use std::sync::Mutex;

/// Receives matcher and pricing events.
///
/// All methods default to no-ops, so implementors only override what they
/// need.
pub trait MatchObserver: Send + Sync {
    /// A rate was evaluated for eligibility.
    fn rate_evaluated(&self, _rate: &ShippingRate, _evaluation: &RateEvaluation) {}

    /// The winning rate of a method was priced.
    fn rate_priced(&self, _rate: &ShippingRate, _breakdown: &CostBreakdown, _total: Money) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// One evaluated rate, as collected by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTrace {
    pub method_id: MethodId,
    pub rate_id: RateId,
    pub rate_name: String,
    pub rate_type: RateType,
    pub base_rate: Money,
    pub evaluation: RateEvaluation,
    /// Set once the rate won and was priced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
}

/// Observer that keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    traces: Mutex<Vec<RateTrace>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the traces collected so far.
    pub fn traces(&self) -> Vec<RateTrace> {
        self.lock().clone()
    }

    /// Traces belonging to one method.
    pub fn traces_for(&self, method_id: &MethodId) -> Vec<RateTrace> {
        self.lock()
            .iter()
            .filter(|trace| &trace.method_id == method_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RateTrace>> {
        // A poisoned lock only means another recorder panicked mid-push.
        self.traces.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MatchObserver for RecordingObserver {
    fn rate_evaluated(&self, rate: &ShippingRate, evaluation: &RateEvaluation) {
        self.lock().push(RateTrace {
            method_id: rate.method_id.clone(),
            rate_id: rate.id.clone(),
            rate_name: rate.name.clone(),
            rate_type: rate.rate_type(),
            base_rate: rate.base_rate,
            evaluation: *evaluation,
            breakdown: None,
            total: None,
        });
    }

    fn rate_priced(&self, rate: &ShippingRate, breakdown: &CostBreakdown, total: Money) {
        let mut traces = self.lock();
        if let Some(trace) = traces
            .iter_mut()
            .rev()
            .find(|trace| trace.rate_id == rate.id && trace.method_id == rate.method_id)
        {
            trace.breakdown = Some(*breakdown);
            trace.total = Some(total);
        }
    }
}
