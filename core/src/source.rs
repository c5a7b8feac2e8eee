use std::collections::VecDeque;
use std::io::Read;

use serde_path_to_error as spte;

use crate::error::PlotError;
use crate::types::RawFix;

#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Fix(RawFix),
    PermissionDenied,
    /// Midlertidig uten posisjon (timeout e.l.); opptaket fortsetter.
    Unavailable(String),
}

/// Sekvensiell, kansellerbar strøm av posisjonshendelser.
///
/// Leveringen er sekvensiell: `next_event` kalles aldri mens forrige hendelse
/// fortsatt behandles. Etter `cancel` leveres ingen flere hendelser.
pub trait PositionSource {
    fn subscribe(&mut self) -> Result<(), PlotError>;
    fn next_event(&mut self) -> Option<PositionEvent>;
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Forhåndsinnspilt kilde (tester og `replay`-kommandoen).
#[derive(Debug, Default)]
pub struct ReplaySource {
    events: VecDeque<PositionEvent>,
    active: bool,
    deny_permission: bool,
    subscriptions: usize,
}

impl ReplaySource {
    pub fn new(events: impl IntoIterator<Item = PositionEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn from_fixes(fixes: impl IntoIterator<Item = RawFix>) -> Self {
        Self::new(fixes.into_iter().map(PositionEvent::Fix))
    }

    /// JSON-array av `{ "lat", "lng", "accuracy_m" }`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, PlotError> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        let fixes: Vec<RawFix> = spte::deserialize(&mut de)
            .map_err(|e| PlotError::BadRequest(format!("fixes parse at {}: {}", e.path(), e.inner())))?;
        Ok(Self::from_fixes(fixes))
    }

    /// Kilde som nekter tillatelse ved første `subscribe`.
    pub fn denying_permission() -> Self {
        Self {
            deny_permission: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, event: PositionEvent) {
        self.events.push_back(event);
    }

    /// Simulerer at plattformen slipper abonnementet (f.eks. under pause).
    pub fn interrupt(&mut self) {
        self.active = false;
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl PositionSource for ReplaySource {
    fn subscribe(&mut self) -> Result<(), PlotError> {
        if self.deny_permission {
            return Err(PlotError::PermissionDenied);
        }
        self.active = true;
        self.subscriptions += 1;
        Ok(())
    }

    fn next_event(&mut self) -> Option<PositionEvent> {
        if !self.active {
            return None;
        }
        self.events.pop_front()
    }

    fn cancel(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
