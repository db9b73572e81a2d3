//! Vehicle filtering and sorting
//!
//! Every criterion is independently either "all" or one specific value; a
//! vehicle is kept only when it satisfies every active criterion. Sorting is
//! stable, so vehicles that compare equal keep their input order.

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::models::vehicle::{Vehicle, VehicleCategory, VehicleStatus};

/// One filter field: inactive, or restricted to a single value.
///
/// Deserializes from `"all"`, an empty string or a missing field as
/// [`Criterion::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion<T> {
    All,
    Only(T),
}

impl<T> Default for Criterion<T> {
    fn default() -> Self {
        Criterion::All
    }
}

impl<T> Criterion<T> {
    pub fn is_active(&self) -> bool {
        matches!(self, Criterion::Only(_))
    }

    /// True when inactive, otherwise the result of `check`
    pub fn admits(&self, check: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Criterion::All => true,
            Criterion::Only(value) => check(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Criterion<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(Criterion::All),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(Criterion::All),
            Some(value) => value.parse().map(Criterion::Only).map_err(de::Error::custom),
        }
    }
}

impl<T: fmt::Display> Serialize for Criterion<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Criterion::All => serializer.serialize_str("all"),
            Criterion::Only(value) => serializer.collect_str(value),
        }
    }
}

/// Listing price bands, in LKR. Lower bound inclusive, upper exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBucket {
    Under2m,
    From2mTo5m,
    From5mTo10m,
    Over10m,
}

const TWO_MILLION: Decimal = Decimal::from_parts(2_000_000, 0, 0, false, 0);
const FIVE_MILLION: Decimal = Decimal::from_parts(5_000_000, 0, 0, false, 0);
const TEN_MILLION: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

impl PriceBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBucket::Under2m => "under-2m",
            PriceBucket::From2mTo5m => "2m-5m",
            PriceBucket::From5mTo10m => "5m-10m",
            PriceBucket::Over10m => "over-10m",
        }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        match self {
            PriceBucket::Under2m => price < TWO_MILLION,
            PriceBucket::From2mTo5m => price >= TWO_MILLION && price < FIVE_MILLION,
            PriceBucket::From5mTo10m => price >= FIVE_MILLION && price < TEN_MILLION,
            PriceBucket::Over10m => price >= TEN_MILLION,
        }
    }
}

impl FromStr for PriceBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "under-2m" => Ok(PriceBucket::Under2m),
            "2m-5m" => Ok(PriceBucket::From2mTo5m),
            "5m-10m" => Ok(PriceBucket::From5mTo10m),
            "over-10m" => Ok(PriceBucket::Over10m),
            _ => Err(format!("unknown price range '{}'", s)),
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model year bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBucket {
    From2020,
    From2015To2019,
    From2010To2014,
    Before2010,
}

impl YearBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            YearBucket::From2020 => "2020-plus",
            YearBucket::From2015To2019 => "2015-2019",
            YearBucket::From2010To2014 => "2010-2014",
            YearBucket::Before2010 => "before-2010",
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        match self {
            YearBucket::From2020 => year >= 2020,
            YearBucket::From2015To2019 => (2015..=2019).contains(&year),
            YearBucket::From2010To2014 => (2010..=2014).contains(&year),
            YearBucket::Before2010 => year < 2010,
        }
    }
}

impl FromStr for YearBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2020-plus" => Ok(YearBucket::From2020),
            "2015-2019" => Ok(YearBucket::From2015To2019),
            "2010-2014" => Ok(YearBucket::From2010To2014),
            "before-2010" => Ok(YearBucket::Before2010),
            _ => Err(format!("unknown year range '{}'", s)),
        }
    }
}

impl fmt::Display for YearBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
    MileageAsc,
    MileageDesc,
}

/// Selected filters. Text fields compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub category: Criterion<VehicleCategory>,
    pub brand: Criterion<String>,
    pub price_range: Criterion<PriceBucket>,
    pub year_range: Criterion<YearBucket>,
    pub fuel_type: Criterion<String>,
    pub transmission: Criterion<String>,
    pub condition: Criterion<String>,
    pub location: Criterion<String>,
    pub status: Criterion<VehicleStatus>,
    /// Substring of make or model
    pub search: Criterion<String>,
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn same_optional_text(value: Option<&str>, wanted: &str) -> bool {
    value.map_or(false, |v| same_text(v, wanted))
}

impl FilterCriteria {
    /// Whether any criterion is restricting the list
    pub fn is_active(&self) -> bool {
        self.category.is_active()
            || self.brand.is_active()
            || self.price_range.is_active()
            || self.year_range.is_active()
            || self.fuel_type.is_active()
            || self.transmission.is_active()
            || self.condition.is_active()
            || self.location.is_active()
            || self.status.is_active()
            || self.search.is_active()
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.category.admits(|c| vehicle.category == *c)
            && self.brand.admits(|b| same_text(&vehicle.make, b))
            && self.price_range.admits(|p| p.contains(vehicle.price))
            && self.year_range.admits(|y| y.contains(vehicle.year))
            && self.fuel_type.admits(|f| same_text(&vehicle.fuel_type, f))
            && self.transmission.admits(|t| same_text(&vehicle.transmission, t))
            && self.condition.admits(|c| same_optional_text(vehicle.condition.as_deref(), c))
            && self.location.admits(|l| same_optional_text(vehicle.location.as_deref(), l))
            && self.status.admits(|s| vehicle.status == *s)
            && self.search.admits(|term| {
                let term = term.trim().to_lowercase();
                vehicle.make.to_lowercase().contains(&term)
                    || vehicle.model.to_lowercase().contains(&term)
            })
    }
}

/// Filtered and sorted view of a vehicle list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub vehicles: Vec<Vehicle>,
    pub total: usize,
    /// Nothing matched: show "no vehicles found" rather than an error
    pub is_empty: bool,
    /// At least one criterion is set, so "reset filters" applies
    pub filters_active: bool,
}

/// Stable in-place sort
pub fn sort_vehicles(vehicles: &mut [Vehicle], key: SortKey) {
    match key {
        SortKey::PriceAsc => vehicles.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => vehicles.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::YearAsc => vehicles.sort_by(|a, b| a.year.cmp(&b.year)),
        SortKey::YearDesc => vehicles.sort_by(|a, b| b.year.cmp(&a.year)),
        SortKey::MileageAsc => vehicles.sort_by(|a, b| a.mileage.cmp(&b.mileage)),
        SortKey::MileageDesc => vehicles.sort_by(|a, b| b.mileage.cmp(&a.mileage)),
    }
}

/// Apply `criteria` then, if given, `sort`. Without a sort key the input
/// order is kept.
pub fn filter_vehicles(
    vehicles: &[Vehicle],
    criteria: &FilterCriteria,
    sort: Option<SortKey>,
) -> FilterResult {
    let mut matched: Vec<Vehicle> = vehicles
        .iter()
        .filter(|vehicle| criteria.matches(vehicle))
        .cloned()
        .collect();

    if let Some(key) = sort {
        sort_vehicles(&mut matched, key);
    }

    FilterResult {
        total: matched.len(),
        is_empty: matched.is_empty(),
        filters_active: criteria.is_active(),
        vehicles: matched,
    }
}
