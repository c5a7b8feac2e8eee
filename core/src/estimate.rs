use crate::types::{AreaMethod, AreaResult, Coordinate};

/// Meter per grad i den grove ekvirektangulære projeksjonen.
pub const METERS_PER_DEGREE: f64 = 111_319.9;

/// Grovt planært areal (shoelace) for live-tilbakemelding i UI.
///
/// Hver node projiseres med sin egen breddegrad som skaleringsbredde
/// (`x = lng * k * cos(lat)`, `y = lat * k`). Projeksjonen er ikke uniform og
/// duger bare fordi teiger er små. Resultatet er veiledende og skal aldri skrives
/// inn som autoritativt areal i en eksport.
///
/// Returnerer `None` for færre enn 3 noder.
pub fn estimate_local_area(track: &[Coordinate]) -> Option<AreaResult> {
    let n = track.len();
    if n < 3 {
        return None;
    }

    let project = |c: &Coordinate| {
        let x = c.lng() * METERS_PER_DEGREE * c.lat().to_radians().cos();
        let y = c.lat() * METERS_PER_DEGREE;
        (x, y)
    };

    // shoelace-summen er 2x signert areal
    let mut twice_area = 0.0;
    for i in 0..n {
        let (x1, y1) = project(&track[i]);
        let (x2, y2) = project(&track[(i + 1) % n]);
        twice_area += x1 * y2 - x2 * y1;
    }

    let area_ha = twice_area.abs() / 20_000.0;
    Some(AreaResult {
        area_m2: twice_area.abs() / 2.0,
        area_ha,
        method: AreaMethod::Planar,
    })
}
