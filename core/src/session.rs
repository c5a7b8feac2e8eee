use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::error::PlotError;
use crate::estimate::estimate_local_area;
use crate::filter::{FilterDecision, PositionFilter};
use crate::types::{closed_ring, AreaResult, Coordinate, RawFix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Paused,
    Finished,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
        }
    }
}

/// Hva som skjedde med en måling som nådde sesjonen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixOutcome {
    /// Lagt til som node; estimat er `Some` fra og med 3 noder.
    Appended { vertex: Coordinate, estimate: Option<AreaResult> },
    Filtered(FilterDecision),
    /// Sesjonen tar ikke imot noder nå (Idle/Paused/Finished).
    Ignored,
}

/// Én opptaksøkt: tilstand, spor og filter (med siste aksepterte måling).
///
/// Feltene er private; sporet endres bare gjennom overgangsmetodene under.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    state: SessionState,
    track: Vec<Coordinate>,
    filter: PositionFilter,
    estimate: Option<AreaResult>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new(PositionFilter::default())
    }
}

impl RecordingSession {
    pub fn new(filter: PositionFilter) -> Self {
        Self {
            state: SessionState::Idle,
            track: Vec::new(),
            filter,
            estimate: None,
            finished_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn track(&self) -> &[Coordinate] {
        &self.track
    }

    /// Siste planære estimat (veiledende).
    pub fn estimate(&self) -> Option<AreaResult> {
        self.estimate
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn last_accepted(&self) -> Option<Coordinate> {
        self.filter.last_accepted()
    }

    /// Lukket ring (avledet, ikke lagret).
    pub fn closed_polygon(&self) -> Vec<Coordinate> {
        closed_ring(&self.track)
    }

    fn invalid(&self, event: &'static str) -> PlotError {
        PlotError::InvalidTransition {
            state: self.state.as_str(),
            event,
        }
    }

    fn transition(&mut self, next: SessionState) {
        info!("session {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
    }

    /// Idle -> Recording, tomt spor.
    pub fn start(&mut self) -> Result<(), PlotError> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("start"));
        }
        self.track.clear();
        self.filter.reset();
        self.estimate = None;
        self.finished_at = None;
        self.transition(SessionState::Recording);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlotError> {
        if self.state != SessionState::Recording {
            return Err(self.invalid("pause"));
        }
        self.transition(SessionState::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PlotError> {
        if self.state != SessionState::Paused {
            return Err(self.invalid("resume"));
        }
        self.transition(SessionState::Recording);
        Ok(())
    }

    /// Kjør målingen gjennom filteret og legg den til som node.
    /// Målinger utenfor Recording forkastes uten å røre filteret.
    pub fn accept_fix(&mut self, fix: &RawFix) -> FixOutcome {
        if self.state != SessionState::Recording {
            crate::metrics::record_fix("ignored");
            return FixOutcome::Ignored;
        }
        match self.filter.evaluate(fix) {
            FilterDecision::Accept(vertex) => {
                self.track.push(vertex);
                if self.track.len() >= 3 {
                    self.estimate = estimate_local_area(&self.track);
                }
                FixOutcome::Appended {
                    vertex,
                    estimate: self.estimate,
                }
            }
            rejected => FixOutcome::Filtered(rejected),
        }
    }

    /// Recording/Paused -> Finished når sporet har minst 3 noder.
    /// Returnerer den lukkede ringen; ellers `InsufficientPoints` uten overgang.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<Vec<Coordinate>, PlotError> {
        match self.state {
            SessionState::Recording | SessionState::Paused => {}
            _ => return Err(self.invalid("finish")),
        }
        if self.track.len() < 3 {
            return Err(PlotError::InsufficientPoints {
                got: self.track.len(),
            });
        }
        self.finished_at = Some(now);
        self.transition(SessionState::Finished);
        Ok(self.closed_polygon())
    }

    /// Avbryt (tillatelse nektet): sporet kastes, tilbake til Idle.
    pub fn abort(&mut self) {
        if self.state != SessionState::Idle {
            info!("session aborted with {} vertices discarded", self.track.len());
        }
        *self = Self::new(self.fresh_filter());
    }

    /// Finished i minst `ttl` -> ny Idle-sesjon. Returnerer true hvis den ble nullstilt.
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (self.state, self.finished_at) {
            (SessionState::Finished, Some(at)) if now - at >= ttl => {
                info!("finished session expired, ready for a new walk");
                *self = Self::new(self.fresh_filter());
                true
            }
            _ => false,
        }
    }

    fn fresh_filter(&self) -> PositionFilter {
        let mut f = self.filter.clone();
        f.reset();
        f
    }
}
