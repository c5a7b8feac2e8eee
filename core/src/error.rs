use thiserror::Error;

/// Feiltaksonomi for opptak, arealberegning og opplasting.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("positioning permission denied")]
    PermissionDenied,

    #[error("positioning unavailable: {0}")]
    PositioningUnavailable(String),

    #[error("At least 3 coordinates required (got {got})")]
    InsufficientPoints { got: usize },

    #[error("Invalid polygon geometry: {0}")]
    DegeneratePolygon(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("area service unreachable: {0}")]
    NetworkFailure(String),

    #[error("area service rejected request ({status}): {message}")]
    ServiceRejected { status: u16, message: String },

    #[error("cannot {event} while {state}")]
    InvalidTransition { state: &'static str, event: &'static str },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlotError {
    /// HTTP-status brukt av serveren.
    pub fn http_status(&self) -> u16 {
        match self {
            PlotError::InsufficientPoints { .. }
            | PlotError::DegeneratePolygon(_)
            | PlotError::InvalidGeometry(_)
            | PlotError::BadRequest(_) => 400,
            PlotError::PermissionDenied => 403,
            PlotError::InvalidTransition { .. } => 409,
            PlotError::ServiceRejected { status, .. } => *status,
            PlotError::NetworkFailure(_) => 502,
            PlotError::PositioningUnavailable(_) => 503,
            PlotError::Io(_) => 500,
        }
    }

    /// Kort etikett for metrics/logg.
    pub fn kind(&self) -> &'static str {
        match self {
            PlotError::PermissionDenied => "permission_denied",
            PlotError::PositioningUnavailable(_) => "positioning_unavailable",
            PlotError::InsufficientPoints { .. } => "insufficient_points",
            PlotError::DegeneratePolygon(_) => "degenerate_polygon",
            PlotError::InvalidGeometry(_) => "invalid_geometry",
            PlotError::NetworkFailure(_) => "network_failure",
            PlotError::ServiceRejected { .. } => "service_rejected",
            PlotError::InvalidTransition { .. } => "invalid_transition",
            PlotError::BadRequest(_) => "bad_request",
            PlotError::Io(_) => "io",
        }
    }
}
