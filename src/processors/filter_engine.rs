use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::models::{Dataset, Selection};
use crate::utils::constants::ALL_SELECTION;

/// Selector options offered to the user, each led by the "All" sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDomains {
    pub countries: Vec<String>,
    pub cities: Vec<String>,
}

impl FilterDomains {
    /// Sorted distinct non-empty Country and City values of the dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut countries = BTreeSet::new();
        let mut cities = BTreeSet::new();

        for record in dataset.records() {
            if !record.country.is_empty() {
                countries.insert(record.country.as_str());
            }
            if !record.city.is_empty() {
                cities.insert(record.city.as_str());
            }
        }

        debug!(
            countries = countries.len(),
            cities = cities.len(),
            "Computed selector domains"
        );

        Self {
            countries: with_sentinel(countries),
            cities: with_sentinel(cities),
        }
    }

    pub fn contains_country(&self, selection: &Selection) -> bool {
        self.countries.iter().any(|c| c == selection.as_str())
    }

    pub fn contains_city(&self, selection: &Selection) -> bool {
        self.cities.iter().any(|c| c == selection.as_str())
    }
}

fn with_sentinel(values: BTreeSet<&str>) -> Vec<String> {
    std::iter::once(ALL_SELECTION.to_string())
        .chain(values.into_iter().map(|v| v.to_string()))
        .collect()
}

/// The current country and city selector values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub country: Selection,
    pub city: Selection,
}

impl FilterState {
    pub fn new(country: Selection, city: Selection) -> Self {
        Self { country, city }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_choices(country: Option<&str>, city: Option<&str>) -> Self {
        Self {
            country: Selection::from_option(country),
            city: Selection::from_option(city),
        }
    }
}

pub struct FilterEngine;

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// Rows matching both selectors, in their original order.
    ///
    /// Pure and idempotent; the result keeps the dataset's headers.
    pub fn filter(&self, dataset: &Dataset, state: &FilterState) -> Dataset {
        if state.country.is_all() && state.city.is_all() {
            return dataset.clone();
        }

        let rows = dataset
            .rows()
            .iter()
            .filter(|row| {
                state.country.matches(&row.record.country) && state.city.matches(&row.record.city)
            })
            .cloned()
            .collect::<Vec<_>>();

        if rows.is_empty() {
            warn!(
                country = %state.country,
                city = %state.city,
                "Filter combination matched no rows"
            );
        } else {
            debug!(
                country = %state.country,
                city = %state.city,
                rows = rows.len(),
                "Applied filters"
            );
        }

        dataset.with_rows(rows)
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}
