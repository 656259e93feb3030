use serde::{Deserialize, Serialize};

use super::error::CalcError;

const DOOR_AREA_SQFT: f64 = 21.0;
const WINDOW_AREA_SQFT: f64 = 15.0;
const PRIMER_COVERAGE_SQFT: f64 = 300.0;
const QUARTS_PER_GALLON: f64 = 4.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceTexture {
    Smooth,
    #[serde(alias = "lightTexture", alias = "light")]
    LightTexture,
    #[serde(alias = "heavyTexture", alias = "heavy")]
    HeavyTexture,
    Rough,
}

impl SurfaceTexture {
    /// Square feet covered by one gallon, one coat.
    pub fn coverage_per_gallon(self) -> f64 {
        match self {
            SurfaceTexture::Smooth => 400.0,
            SurfaceTexture::LightTexture => 350.0,
            SurfaceTexture::HeavyTexture => 300.0,
            SurfaceTexture::Rough => 250.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Interior,
    Exterior,
    Ceiling,
}

impl ProjectType {
    pub fn waste_factor(self) -> f64 {
        match self {
            ProjectType::Interior => 0.10,
            ProjectType::Exterior => 0.15,
            ProjectType::Ceiling => 0.10,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomPreset {
    Bedroom,
    #[serde(alias = "livingRoom")]
    LivingRoom,
    Kitchen,
    Bathroom,
    Office,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub doors: u32,
    pub windows: u32,
}

impl RoomPreset {
    pub fn dimensions(self) -> RoomDimensions {
        let (length, width, height, doors, windows) = match self {
            RoomPreset::Bedroom => (12.0, 12.0, 8.0, 1, 2),
            RoomPreset::LivingRoom => (18.0, 15.0, 9.0, 2, 3),
            RoomPreset::Kitchen => (12.0, 10.0, 8.0, 1, 1),
            RoomPreset::Bathroom => (8.0, 5.0, 8.0, 1, 1),
            RoomPreset::Office => (10.0, 10.0, 8.0, 1, 1),
        };
        RoomDimensions {
            length,
            width,
            height,
            doors,
            windows,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaintJob {
    pub room: RoomDimensions,
    pub coats: u32,
    pub texture: SurfaceTexture,
    pub project: ProjectType,
    pub include_ceiling: bool,
    pub primer: bool,
    pub price_per_gallon: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEstimate {
    pub wall_area: f64,
    pub ceiling_area: f64,
    pub paintable_area: f64,
    pub coverage_per_gallon: f64,
    pub gallons_needed: f64,
    pub gallon_cans: u32,
    pub quart_cans: u32,
    pub primer_gallons: f64,
    pub primer_cans: u32,
    pub estimated_cost: f64,
}

pub fn estimate(job: &PaintJob) -> Result<PaintEstimate, CalcError> {
    let room = &job.room;
    for (field, value) in [
        ("length", room.length),
        ("width", room.width),
        ("height", room.height),
        ("pricePerGallon", job.price_per_gallon),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CalcError::invalid_range(
                field,
                format!("must be a non-negative number, got {value}"),
            ));
        }
    }
    if job.coats == 0 {
        return Err(CalcError::invalid_range("coats", "at least one coat is required"));
    }

    let floor_area = room.length * room.width;
    let (wall_area, ceiling_area) = match job.project {
        ProjectType::Ceiling => (0.0, floor_area),
        ProjectType::Interior | ProjectType::Exterior => {
            let gross = 2.0 * (room.length + room.width) * room.height;
            let openings =
                room.doors as f64 * DOOR_AREA_SQFT + room.windows as f64 * WINDOW_AREA_SQFT;
            let ceiling = if job.include_ceiling { floor_area } else { 0.0 };
            ((gross - openings).max(0.0), ceiling)
        }
    };
    let paintable_area = wall_area + ceiling_area;

    let coverage_per_gallon = job.texture.coverage_per_gallon();
    let gallons_needed = paintable_area * job.coats as f64 / coverage_per_gallon
        * (1.0 + job.project.waste_factor());
    let (gallon_cans, quart_cans) = cans_for(gallons_needed)?;

    let (primer_gallons, primer_cans) = if job.primer {
        let gallons = paintable_area / PRIMER_COVERAGE_SQFT;
        (gallons, can_count("primerGallons", gallons.ceil())?)
    } else {
        (0.0, 0)
    };

    let paint_purchased = gallon_cans as f64 + quart_cans as f64 / QUARTS_PER_GALLON;
    let estimated_cost = (paint_purchased + primer_cans as f64) * job.price_per_gallon;

    Ok(PaintEstimate {
        wall_area,
        ceiling_area,
        paintable_area,
        coverage_per_gallon,
        gallons_needed,
        gallon_cans,
        quart_cans,
        primer_gallons,
        primer_cans,
        estimated_cost,
    })
}

/// Whole gallons plus enough quarts to cover the remainder. Four quarts
/// become another gallon.
fn cans_for(gallons: f64) -> Result<(u32, u32), CalcError> {
    let whole = gallons.floor();
    let quarts = ((gallons - whole) * QUARTS_PER_GALLON).ceil() as u32;
    if quarts >= QUARTS_PER_GALLON as u32 {
        Ok((can_count("gallonsNeeded", whole + 1.0)?, 0))
    } else {
        Ok((can_count("gallonsNeeded", whole)?, quarts))
    }
}

fn can_count(field: &'static str, cans: f64) -> Result<u32, CalcError> {
    if cans.is_finite() && (0.0..=u32::MAX as f64).contains(&cans) {
        Ok(cans as u32)
    } else {
        Err(CalcError::invalid_range(
            field,
            format!("{cans} cans is more than can be estimated"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn bedroom_job() -> PaintJob {
        PaintJob {
            room: RoomPreset::Bedroom.dimensions(),
            coats: 2,
            texture: SurfaceTexture::Smooth,
            project: ProjectType::Interior,
            include_ceiling: false,
            primer: false,
            price_per_gallon: 40.0,
        }
    }

    #[test]
    fn bedroom_walls_subtract_openings() {
        let estimate = estimate(&bedroom_job()).expect("valid job");
        // 2 * (12 + 12) * 8 = 384, minus one door and two windows.
        assert_approx(estimate.wall_area, 333.0);
        assert_approx(estimate.paintable_area, 333.0);
        assert_approx(estimate.gallons_needed, 333.0 * 2.0 / 400.0 * 1.1);
        // 1.8315 gallons: one gallon plus four quarts rounds to two gallons.
        assert_eq!((estimate.gallon_cans, estimate.quart_cans), (2, 0));
        assert_approx(estimate.estimated_cost, 80.0);
    }

    #[test]
    fn ceiling_and_primer_are_added() {
        let mut job = bedroom_job();
        job.include_ceiling = true;
        job.primer = true;
        let estimate = estimate(&job).expect("valid job");
        assert_approx(estimate.ceiling_area, 144.0);
        assert_approx(estimate.paintable_area, 477.0);
        assert_approx(estimate.primer_gallons, 477.0 / 300.0);
        assert_eq!(estimate.primer_cans, 2);
    }

    #[test]
    fn ceiling_project_paints_only_the_ceiling() {
        let mut job = bedroom_job();
        job.project = ProjectType::Ceiling;
        job.coats = 1;
        let estimate = estimate(&job).expect("valid job");
        assert_eq!(estimate.wall_area, 0.0);
        assert_approx(estimate.paintable_area, 144.0);
        assert_approx(estimate.gallons_needed, 144.0 / 400.0 * 1.1);
        assert_eq!((estimate.gallon_cans, estimate.quart_cans), (0, 2));
        assert_approx(estimate.estimated_cost, 20.0);
    }

    #[test]
    fn rougher_surfaces_need_more_paint() {
        let mut job = bedroom_job();
        let smooth = estimate(&job).expect("valid job").gallons_needed;
        job.texture = SurfaceTexture::Rough;
        let rough = estimate(&job).expect("valid job").gallons_needed;
        assert_approx(rough / smooth, 400.0 / 250.0);
    }

    #[test]
    fn openings_never_make_area_negative() {
        let mut job = bedroom_job();
        job.room.doors = 50;
        let estimate = estimate(&job).expect("valid job");
        assert_eq!(estimate.wall_area, 0.0);
        assert_eq!(estimate.gallons_needed, 0.0);
        assert_eq!((estimate.gallon_cans, estimate.quart_cans), (0, 0));
    }

    #[test]
    fn rejects_invalid_jobs() {
        let mut job = bedroom_job();
        job.coats = 0;
        assert!(matches!(
            estimate(&job),
            Err(CalcError::InvalidRange { field: "coats", .. })
        ));

        let mut job = bedroom_job();
        job.room.height = -1.0;
        assert!(matches!(
            estimate(&job),
            Err(CalcError::InvalidRange { field: "height", .. })
        ));
    }

    #[test]
    fn cans_round_up_in_quarts() {
        assert_eq!(cans_for(0.0), Ok((0, 0)));
        assert_eq!(cans_for(1.0), Ok((1, 0)));
        assert_eq!(cans_for(1.1), Ok((1, 1)));
        assert_eq!(cans_for(2.5), Ok((2, 2)));
        assert_eq!(cans_for(2.9), Ok((3, 0)));
        assert_eq!(cans_for(u32::MAX as f64 - 0.1), Ok((u32::MAX, 0)));
        assert!(cans_for(u32::MAX as f64 + 1.5).is_err());
    }

    #[test]
    fn huge_jobs_fail_instead_of_truncating_cans() {
        let mut job = bedroom_job();
        job.project = ProjectType::Ceiling;
        job.room.length = 1e9;
        job.room.width = 1e9;
        assert!(matches!(
            estimate(&job),
            Err(CalcError::InvalidRange {
                field: "gallonsNeeded",
                ..
            })
        ));

        job.room.length = f64::MAX;
        job.room.width = f64::MAX;
        job.primer = true;
        assert!(estimate(&job).is_err());
    }
}
