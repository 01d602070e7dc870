//! KMA Lambert Conformal Conic grid projection
//!
//! The village/nowcast services address locations by cells of a 5km grid laid
//! over a Lambert Conformal Conic projection with standard parallels 30°N and
//! 60°N, origin at 126°E 38°N. This module converts between geographic
//! coordinates and those cells.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::models::{Coordinate, GridCell};

/// Parameters of a Lambert Conformal Conic grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertGrid {
    /// Earth radius (km)
    pub earth_radius_km: f64,
    /// Grid spacing (km)
    pub grid_km: f64,
    /// First standard parallel (deg)
    pub standard_lat1: f64,
    /// Second standard parallel (deg)
    pub standard_lat2: f64,
    /// Origin longitude (deg)
    pub origin_lon: f64,
    /// Origin latitude (deg)
    pub origin_lat: f64,
    /// Grid x of the origin
    pub origin_x: f64,
    /// Grid y of the origin
    pub origin_y: f64,
}

/// Derived cone constants, computed once per grid
#[derive(Debug, Clone, Copy)]
struct Cone {
    re: f64,
    sn: f64,
    sf: f64,
    ro: f64,
    olon: f64,
}

impl LambertGrid {
    /// The KMA digital forecast grid
    pub const KMA: LambertGrid = LambertGrid {
        earth_radius_km: 6371.00877,
        grid_km: 5.0,
        standard_lat1: 30.0,
        standard_lat2: 60.0,
        origin_lon: 126.0,
        origin_lat: 38.0,
        origin_x: 43.0,
        origin_y: 136.0,
    };

    fn cone(&self) -> Cone {
        let slat1 = self.standard_lat1.to_radians();
        let slat2 = self.standard_lat2.to_radians();
        let olat = self.origin_lat.to_radians();
        let re = self.earth_radius_km / self.grid_km;

        let sn = (slat1.cos() / slat2.cos()).ln()
            / ((FRAC_PI_4 + slat2 * 0.5).tan() / (FRAC_PI_4 + slat1 * 0.5).tan()).ln();
        let sf = (FRAC_PI_4 + slat1 * 0.5).tan().powf(sn) * slat1.cos() / sn;
        let ro = re * sf / (FRAC_PI_4 + olat * 0.5).tan().powf(sn);

        Cone {
            re,
            sn,
            sf,
            ro,
            olon: self.origin_lon.to_radians(),
        }
    }

    /// Fractional grid position of a coordinate, before rounding
    #[must_use]
    pub fn project_exact(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let cone = self.cone();

        let ra = cone.re * cone.sf / (FRAC_PI_4 + latitude.to_radians() * 0.5).tan().powf(cone.sn);

        let mut theta = longitude.to_radians() - cone.olon;
        if theta > PI {
            theta -= 2.0 * PI;
        }
        if theta < -PI {
            theta += 2.0 * PI;
        }
        theta *= cone.sn;

        let x = ra * theta.sin() + self.origin_x;
        let y = cone.ro - ra * theta.cos() + self.origin_y;
        (x, y)
    }

    /// Grid cell containing a coordinate
    ///
    /// Rounds by adding 0.5 and truncating toward zero, which is only correct
    /// for non-negative positions; inside the grid domain they always are.
    #[must_use]
    pub fn project(&self, latitude: f64, longitude: f64) -> GridCell {
        let (x, y) = self.project_exact(latitude, longitude);
        GridCell::new((x + 0.5) as i32, (y + 0.5) as i32)
    }

    /// Coordinate of a grid cell's centre
    #[must_use]
    pub fn unproject(&self, cell: GridCell) -> Coordinate {
        let cone = self.cone();

        let xn = f64::from(cell.x) - self.origin_x;
        let yn = cone.ro - f64::from(cell.y) + self.origin_y;

        let mut ra = (xn * xn + yn * yn).sqrt();
        if cone.sn < 0.0 {
            ra = -ra;
        }
        let alat = 2.0 * (cone.re * cone.sf / ra).powf(1.0 / cone.sn).atan() - FRAC_PI_2;

        let theta = if xn.abs() <= 0.0 {
            0.0
        } else if yn.abs() <= 0.0 {
            if xn < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 }
        } else {
            xn.atan2(yn)
        };
        let alon = theta / cone.sn + cone.olon;

        Coordinate::new(alat.to_degrees(), alon.to_degrees())
    }
}

/// Grid cell on the KMA grid containing the coordinate
#[must_use]
pub fn project(latitude: f64, longitude: f64) -> GridCell {
    LambertGrid::KMA.project(latitude, longitude)
}

/// Centre of a KMA grid cell
#[must_use]
pub fn unproject(cell: GridCell) -> Coordinate {
    LambertGrid::KMA.unproject(cell)
}
