use log::debug;

use crate::metrics::record_fix;
use crate::types::{Coordinate, RawFix};

/// Jordradius brukt av haversine (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const DEFAULT_MAX_ACCURACY_M: f64 = 20.0;
pub const DEFAULT_MIN_DISTANCE_M: f64 = 2.0;

/// Storsirkelavstand i meter (haversine).
pub fn haversine_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let dphi = (b.lat() - a.lat()).to_radians();
    let dlambda = (b.lng() - a.lng()).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDecision {
    Accept(Coordinate),
    RejectAccuracy { accuracy_m: f64 },
    RejectDistance { distance_m: f64 },
    /// NaN/utenfor gyldig område
    RejectInvalid,
}

impl FilterDecision {
    pub fn label(&self) -> &'static str {
        match self {
            FilterDecision::Accept(_) => "accepted",
            FilterDecision::RejectAccuracy { .. } => "rejected_accuracy",
            FilterDecision::RejectDistance { .. } => "rejected_distance",
            FilterDecision::RejectInvalid => "rejected_invalid",
        }
    }
}

/// Forkaster unøyaktige og redundante målinger.
///
/// Husker kun siste aksepterte koordinat; ingen batching, lookahead eller omsortering.
/// Første måling slippes alltid gjennom uansett nøyaktighet, ellers kan sporet bli
/// stående tomt på enheter som konvergerer sakte.
#[derive(Debug, Clone)]
pub struct PositionFilter {
    max_accuracy_m: f64,
    min_distance_m: f64,
    last_accepted: Option<Coordinate>,
}

impl Default for PositionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ACCURACY_M, DEFAULT_MIN_DISTANCE_M)
    }
}

impl PositionFilter {
    pub fn new(max_accuracy_m: f64, min_distance_m: f64) -> Self {
        Self {
            max_accuracy_m,
            min_distance_m,
            last_accepted: None,
        }
    }

    pub fn last_accepted(&self) -> Option<Coordinate> {
        self.last_accepted
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    pub fn evaluate(&mut self, fix: &RawFix) -> FilterDecision {
        let candidate = fix.coordinate();
        let decision = if !candidate.is_valid() || fix.accuracy_m.is_nan() {
            FilterDecision::RejectInvalid
        } else {
            match self.last_accepted {
                None => FilterDecision::Accept(candidate),
                Some(_) if fix.accuracy_m > self.max_accuracy_m => FilterDecision::RejectAccuracy {
                    accuracy_m: fix.accuracy_m,
                },
                Some(prev) => {
                    let d = haversine_m(&prev, &candidate);
                    if d <= self.min_distance_m {
                        FilterDecision::RejectDistance { distance_m: d }
                    } else {
                        FilterDecision::Accept(candidate)
                    }
                }
            }
        };

        if let FilterDecision::Accept(c) = decision {
            self.last_accepted = Some(c);
        }
        debug!(
            "fix lat={:.6} lng={:.6} acc={:.1}m -> {}",
            fix.lat,
            fix.lng,
            fix.accuracy_m,
            decision.label()
        );
        record_fix(decision.label());
        decision
    }
}
