//! Hit policy: turning the nearest stored entry into a lookup outcome

use crate::domain::vector_index::ScoredPayload;

use super::CacheEntry;

/// Map an L2 distance to a confidence in (0, 1]
pub fn confidence_from_distance(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// A cache hit with the values callers log or surface
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub response: String,
    pub confidence: f32,
    pub age_secs: f64,
    pub session_id: String,
}

/// Outcome of evaluating the single nearest neighbor
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Caching is switched off; nothing was consulted
    Disabled,
    /// The index held no entries
    Empty,
    BelowThreshold { confidence: f32 },
    Expired { confidence: f32, age_secs: f64 },
    /// Close and fresh, but the stored response is empty
    EmptyResponse,
    Hit(CacheHit),
}

impl LookupOutcome {
    /// Label used for the lookup metric
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Empty | Self::EmptyResponse => "miss",
            Self::BelowThreshold { .. } => "below_threshold",
            Self::Expired { .. } => "expired",
            Self::Hit(_) => "hit",
        }
    }

    pub fn into_response(self) -> Option<String> {
        match self {
            Self::Hit(hit) => Some(hit.response),
            _ => None,
        }
    }
}

/// Decide whether the nearest entry is served.
///
/// Threshold is checked before freshness. No other neighbor is consulted
/// when the nearest one fails either check. An empty stored response is
/// never served.
pub fn evaluate(
    nearest: Option<ScoredPayload<CacheEntry>>,
    similarity_threshold: f32,
    ttl_seconds: u64,
    now: f64,
) -> LookupOutcome {
    let Some(nearest) = nearest else {
        return LookupOutcome::Empty;
    };

    let confidence = confidence_from_distance(nearest.distance);

    // NaN confidence must never count as a hit
    if !(confidence >= similarity_threshold) {
        return LookupOutcome::BelowThreshold { confidence };
    }

    let entry = nearest.payload;
    let age_secs = entry.age_at(now);

    if !entry.is_live_at(now, ttl_seconds) {
        return LookupOutcome::Expired {
            confidence,
            age_secs,
        };
    }

    if entry.response_text().is_empty() {
        return LookupOutcome::EmptyResponse;
    }

    LookupOutcome::Hit(CacheHit {
        response: entry.response_text().to_string(),
        confidence,
        age_secs,
        session_id: entry.session_id().to_string(),
    })
}
