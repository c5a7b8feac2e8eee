use serde::{Deserialize, Serialize};

/// Antall desimaler en koordinat lagres/serialiseres med (~0.11 m).
pub const COORD_DECIMALS: u32 = 6;

pub const M2_PER_HECTARE: f64 = 10_000.0;

// --- RoundTo trait (offentlig, brukt av geodesic/export) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

/// WGS84-posisjon i grader. Uforanderlig etter opprettelse.
///
/// På wire-formatet er en koordinat alltid `[lat, lng]` rundet til 6 desimaler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Kopi rundet til kanonisk presisjon.
    pub fn rounded(&self) -> Self {
        Self {
            lat: self.lat.round_to(COORD_DECIMALS),
            lng: self.lng.round_to(COORD_DECIMALS),
        }
    }

    /// GeoJSON-rekkefølge: `[lng, lat]`, rundet.
    pub fn to_lng_lat(&self) -> [f64; 2] {
        let r = self.rounded();
        [r.lng, r.lat]
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(v: [f64; 2]) -> Self {
        Coordinate::new(v[0], v[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        let r = c.rounded();
        [r.lat, r.lng]
    }
}

/// Rå posisjonsmåling fra enheten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    pub lat: f64,
    pub lng: f64,
    #[serde(alias = "accuracy")]
    pub accuracy_m: f64,
}

impl RawFix {
    pub fn new(lat: f64, lng: f64, accuracy_m: f64) -> Self {
        Self { lat, lng, accuracy_m }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMethod {
    Planar,
    Geodesic,
}

/// Arealresultat. Planar = veiledende live-estimat, Geodesic = autoritativt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaResult {
    pub area_m2: f64,
    pub area_ha: f64,
    pub method: AreaMethod,
}

impl AreaResult {
    pub fn from_m2(area_m2: f64, method: AreaMethod) -> Self {
        Self {
            area_m2,
            area_ha: area_m2 / M2_PER_HECTARE,
            method,
        }
    }
}

/// Lukket ring: sporet med første koordinat lagt til som siste (hvis ikke allerede lukket).
pub fn closed_ring(track: &[Coordinate]) -> Vec<Coordinate> {
    let mut ring = track.to_vec();
    if let (Some(first), Some(last)) = (track.first(), track.last()) {
        if track.len() > 1 && first.rounded() != last.rounded() {
            ring.push(*first);
        }
    }
    ring
}
