use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level body of a `forecast:lookup` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    #[serde(default)]
    pub daily_info: Vec<DailyInfo>,
}

impl ForecastResponse {
    /// Today's entry; the provider always lists days in order.
    pub fn today(&self) -> Option<&DailyInfo> {
        self.daily_info.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyInfo {
    pub date: Date,
    #[serde(default, rename = "pollenTypeInfo")]
    pub pollen_types: Vec<PollenTypeInfo>,
}

impl DailyInfo {
    pub fn in_season(&self) -> impl Iterator<Item = &PollenTypeInfo> {
        self.pollen_types.iter().filter(|p| p.in_season)
    }

    /// Highest severity among in-season types, 0 when nothing is in season.
    pub fn max_in_season_level(&self) -> i32 {
        self.in_season().map(|p| p.index_info.value).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Renders as `YYYY-MM-DD`.
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollenTypeInfo {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub in_season: bool,
    #[serde(default)]
    pub index_info: IndexInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_description: Option<String>,
}
