use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::path::PathBuf;

use crate::client::AreaService;
use crate::config::RecordingConfig;
use crate::error::PlotError;
use crate::export::write_export;
use crate::metrics::record_session_finished;
use crate::session::{FixOutcome, RecordingSession, SessionState};
use crate::source::{PositionEvent, PositionSource};
use crate::types::AreaResult;

/// Utfallet av den autoritative beregningen etter `finish`.
#[derive(Debug)]
pub enum AreaOutcome {
    Authoritative(AreaResult),
    /// Nettverket feilet; vis kun det lokale estimatet.
    LocalOnly { estimate: Option<AreaResult>, reason: String },
    /// Tjenesten avviste polygonet; ingen delresultat.
    Rejected(PlotError),
}

impl AreaOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AreaOutcome::Authoritative(_) => "authoritative",
            AreaOutcome::LocalOnly { .. } => "local_only",
            AreaOutcome::Rejected(_) => "rejected",
        }
    }
}

#[derive(Debug)]
pub struct FinishReport {
    /// Lokal eksport, skrevet før nettverkskallet.
    pub export_path: PathBuf,
    pub point_count: usize,
    pub local_estimate: Option<AreaResult>,
    pub outcome: AreaOutcome,
}

/// Eier den ene aktive opptaksøkten, posisjonskilden og arealtjenesten.
pub struct PlotController<S: PositionSource, A: AreaService> {
    session: RecordingSession,
    source: S,
    area_service: A,
    export_dir: PathBuf,
    recording: RecordingConfig,
}

impl<S: PositionSource, A: AreaService> PlotController<S, A> {
    pub fn new(source: S, area_service: A, export_dir: impl Into<PathBuf>, recording: RecordingConfig) -> Self {
        Self {
            session: RecordingSession::new(recording.filter()),
            source,
            area_service,
            export_dir: export_dir.into(),
            recording,
        }
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn start(&mut self) -> Result<(), PlotError> {
        self.session.start()?;
        if let Err(e) = self.source.subscribe() {
            self.abort();
            return Err(e);
        }
        Ok(())
    }

    /// Abonnementet holdes åpent; målinger under pause ignoreres.
    pub fn pause(&mut self) -> Result<(), PlotError> {
        self.session.pause()
    }

    pub fn resume(&mut self) -> Result<(), PlotError> {
        self.session.resume()?;
        if !self.source.is_active() {
            info!("position subscription lost during pause, re-subscribing");
            if let Err(e) = self.source.subscribe() {
                self.abort();
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: PositionEvent) -> Result<FixOutcome, PlotError> {
        match event {
            PositionEvent::Fix(fix) => Ok(self.session.accept_fix(&fix)),
            PositionEvent::Unavailable(reason) => {
                warn!("positioning unavailable: {reason} (recording continues)");
                Ok(FixOutcome::Ignored)
            }
            PositionEvent::PermissionDenied => {
                self.abort();
                Err(PlotError::PermissionDenied)
            }
        }
    }

    /// Tømmer ventende hendelser fra kilden, én om gangen.
    /// Returnerer antall noder lagt til.
    pub fn pump(&mut self) -> Result<usize, PlotError> {
        let mut appended = 0;
        while let Some(event) = self.source.next_event() {
            if let FixOutcome::Appended { .. } = self.handle_event(event)? {
                appended += 1;
            }
        }
        Ok(appended)
    }

    /// Recording/Paused -> Finished, deretter lokal eksport og så autoritativt areal.
    ///
    /// Eksporten skrives uansett nettverksstatus; nettverksfeil gir `LocalOnly`.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<FinishReport, PlotError> {
        self.session.finish(now)?;
        self.source.cancel();

        let track = self.session.track();
        let export_path = write_export(&self.export_dir, track, now)?;
        let local_estimate = self.session.estimate();

        // tjenesten lukker ringen selv
        let outcome = match self.area_service.calculate(track) {
            Ok(calc) => AreaOutcome::Authoritative(calc.area),
            Err(PlotError::NetworkFailure(reason)) => {
                warn!("area service unreachable, showing local estimate only: {reason}");
                AreaOutcome::LocalOnly {
                    estimate: local_estimate,
                    reason,
                }
            }
            Err(e) => {
                warn!("area service rejected polygon: {e}");
                AreaOutcome::Rejected(e)
            }
        };
        record_session_finished(outcome.label());

        Ok(FinishReport {
            export_path,
            point_count: track.len(),
            local_estimate,
            outcome,
        })
    }

    /// Nullstill en ferdig økt når visningstiden er ute.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let ttl = self.finished_ttl();
        self.session.expire(now, ttl)
    }

    /// Eksplisitt ny økt fra controlleren.
    pub fn reset(&mut self) {
        self.source.cancel();
        self.session = RecordingSession::new(self.recording.filter());
    }

    fn abort(&mut self) {
        self.source.cancel();
        self.session.abort();
    }

    fn finished_ttl(&self) -> Duration {
        self.recording.finished_ttl()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }
}
