//! Static table of Korean metropolitan cities and provinces
//!
//! Each region is represented by the coordinate of its administrative seat.
//! Lookups match the short name or one of the official long forms exactly.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::grid;
use crate::models::{Coordinate, GridCell};
use crate::Result;

/// A named region with a representative coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Short name, e.g. `서울`
    pub name: &'static str,
    /// Official long forms accepted by `lookup`
    pub aliases: &'static [&'static str],
    pub latitude: f64,
    pub longitude: f64,
}

impl Region {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// KMA grid cell of the representative coordinate
    #[must_use]
    pub fn grid_cell(&self) -> GridCell {
        grid::project(self.latitude, self.longitude)
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

const fn region(
    name: &'static str,
    aliases: &'static [&'static str],
    latitude: f64,
    longitude: f64,
) -> Region {
    Region {
        name,
        aliases,
        latitude,
        longitude,
    }
}

/// All supported regions in presentation order
pub static REGIONS: [Region; 17] = [
    region("서울", &["서울특별시", "서울시"], 37.5665, 126.9780),
    region("부산", &["부산광역시", "부산시"], 35.1796, 129.0756),
    region("대구", &["대구광역시", "대구시"], 35.8714, 128.6014),
    region("인천", &["인천광역시", "인천시"], 37.4563, 126.7052),
    region("광주", &["광주광역시", "광주시"], 35.1595, 126.8526),
    region("대전", &["대전광역시", "대전시"], 36.3504, 127.3845),
    region("울산", &["울산광역시", "울산시"], 35.5384, 129.3114),
    region("세종", &["세종특별자치시", "세종시"], 36.4800, 127.2890),
    region("경기", &["경기도"], 37.2636, 127.0286),
    region("강원", &["강원도", "강원특별자치도"], 37.8813, 127.7298),
    region("충북", &["충청북도"], 36.6424, 127.4890),
    region("충남", &["충청남도"], 36.6588, 126.6728),
    region("전북", &["전라북도", "전북특별자치도"], 35.8242, 127.1480),
    region("전남", &["전라남도"], 34.8161, 126.4629),
    region("경북", &["경상북도"], 36.5684, 128.7294),
    region("경남", &["경상남도"], 35.2279, 128.6811),
    region("제주", &["제주특별자치도", "제주도"], 33.4996, 126.5312),
];

/// Find a region by short name or alias, ignoring surrounding whitespace
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Region> {
    let name = name.trim();
    REGIONS.iter().find(|region| region.matches(name))
}

/// Short names of all regions
pub fn names() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|region| region.name)
}

#[derive(Serialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

/// Serializes the table as `{name: {lat, lon}}`, keeping table order
struct RegionTable;

impl Serialize for RegionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(REGIONS.len()))?;
        for region in &REGIONS {
            map.serialize_entry(
                region.name,
                &LatLon {
                    lat: region.latitude,
                    lon: region.longitude,
                },
            )?;
        }
        map.end()
    }
}

/// Region table as pretty-printed JSON
pub fn regions_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&RegionTable)?)
}
