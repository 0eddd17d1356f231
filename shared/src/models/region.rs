//! Busan district classification

use serde::{Deserialize, Serialize};

/// Coarse geographic grouping of a Busan district
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RegionGroup {
    Coastal,
    InlandUrban,
    MountainHighland,
    RiversideLowland,
    Other,
}

/// Districts on the coastline
pub const COASTAL_DISTRICTS: &[&str] = &[
    "해운대구", // Haeundae-gu
    "수영구",   // Suyeong-gu
    "영도구",   // Yeongdo-gu
    "중구",     // Jung-gu
    "동구",     // Dong-gu
    "서구",     // Seo-gu
    "남구",     // Nam-gu
];

/// Inland city-center districts
pub const INLAND_URBAN_DISTRICTS: &[&str] = &[
    "부산진구", // Busanjin-gu
    "동래구",   // Dongnae-gu
    "연제구",   // Yeonje-gu
];

/// Mountain and highland districts
pub const MOUNTAIN_DISTRICTS: &[&str] = &[
    "금정구", // Geumjeong-gu
    "기장군", // Gijang-gun
];

/// Riverside and lowland districts along the Nakdong
pub const LOWLAND_DISTRICTS: &[&str] = &[
    "강서구", // Gangseo-gu
    "북구",   // Buk-gu
    "사상구", // Sasang-gu
    "사하구", // Saha-gu
];

impl RegionGroup {
    /// Every group, in declaration order
    pub const ALL: [RegionGroup; 5] = [
        RegionGroup::Coastal,
        RegionGroup::InlandUrban,
        RegionGroup::MountainHighland,
        RegionGroup::RiversideLowland,
        RegionGroup::Other,
    ];

    /// Classify a district by exact name. Unknown names fall into `Other`.
    pub fn for_district(district: &str) -> Self {
        if COASTAL_DISTRICTS.contains(&district) {
            RegionGroup::Coastal
        } else if INLAND_URBAN_DISTRICTS.contains(&district) {
            RegionGroup::InlandUrban
        } else if MOUNTAIN_DISTRICTS.contains(&district) {
            RegionGroup::MountainHighland
        } else if LOWLAND_DISTRICTS.contains(&district) {
            RegionGroup::RiversideLowland
        } else {
            RegionGroup::Other
        }
    }

    /// Snake-case identifier, same as the serialized form
    pub fn id(&self) -> &'static str {
        match self {
            RegionGroup::Coastal => "coastal",
            RegionGroup::InlandUrban => "inland_urban",
            RegionGroup::MountainHighland => "mountain_highland",
            RegionGroup::RiversideLowland => "riverside_lowland",
            RegionGroup::Other => "other",
        }
    }

    /// Category string the call-count pipeline was fitted on
    pub fn label_ko(&self) -> &'static str {
        match self {
            RegionGroup::Coastal => "해안지역",
            RegionGroup::InlandUrban => "내륙 도심",
            RegionGroup::MountainHighland => "산지/고지대",
            RegionGroup::RiversideLowland => "하천/저지대",
            RegionGroup::Other => "기타",
        }
    }

    /// Districts listed for this group; empty for `Other`
    pub fn districts(&self) -> &'static [&'static str] {
        match self {
            RegionGroup::Coastal => COASTAL_DISTRICTS,
            RegionGroup::InlandUrban => INLAND_URBAN_DISTRICTS,
            RegionGroup::MountainHighland => MOUNTAIN_DISTRICTS,
            RegionGroup::RiversideLowland => LOWLAND_DISTRICTS,
            RegionGroup::Other => &[],
        }
    }
}

impl std::fmt::Display for RegionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionGroup::Coastal => write!(f, "Coastal"),
            RegionGroup::InlandUrban => write!(f, "Inland Urban"),
            RegionGroup::MountainHighland => write!(f, "Mountain/Highland"),
            RegionGroup::RiversideLowland => write!(f, "Riverside/Lowland"),
            RegionGroup::Other => write!(f, "Other"),
        }
    }
}

/// One row of the static district table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistrictEntry {
    pub district: String,
    pub group: RegionGroup,
    pub group_label_ko: String,
}

/// All known districts with their groups, sorted by district name
pub fn district_table() -> Vec<DistrictEntry> {
    let mut entries: Vec<DistrictEntry> = RegionGroup::ALL
        .iter()
        .flat_map(|group| {
            group.districts().iter().map(move |d| DistrictEntry {
                district: (*d).to_string(),
                group: *group,
                group_label_ko: group.label_ko().to_string(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.district.cmp(&b.district));
    entries
}
