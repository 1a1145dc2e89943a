//! Autocomplete suggestions from previously used names

use std::collections::BTreeSet;

use serde::Serialize;
use shared::{AssemblyPart, DEFAULT_INSTALLER, DEFAULT_VEHICLE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// Sorted, unique; always contains the default installer
    pub installers: Vec<String>,
    /// Sorted, unique; always contains the default vehicle
    pub vehicles: Vec<String>,
}

pub fn build_suggestions(parts: &[AssemblyPart]) -> Suggestions {
    let mut installers: BTreeSet<&str> = BTreeSet::from([DEFAULT_INSTALLER]);
    let mut vehicles: BTreeSet<&str> = BTreeSet::from([DEFAULT_VEHICLE]);

    for part in parts {
        if let Some(r) = &part.installation {
            installers.extend(r.installers.iter().map(String::as_str));
        }
        if let Some(r) = &part.bolting {
            if !r.installer.is_empty() {
                installers.insert(&r.installer);
            }
        }
        if let Some(r) = &part.delivery {
            if !r.vehicle.is_empty() {
                vehicles.insert(&r.vehicle);
            }
        }
    }

    Suggestions {
        installers: installers.into_iter().map(str::to_string).collect(),
        vehicles: vehicles.into_iter().map(str::to_string).collect(),
    }
}

impl Suggestions {
    /// Entries containing `query`, leaving out installers already chosen
    pub fn matching(&self, query: &str, chosen_installers: &[String]) -> Suggestions {
        Suggestions {
            installers: owned(filter(&self.installers, query, chosen_installers)),
            vehicles: owned(filter(&self.vehicles, query, &[])),
        }
    }
}

fn owned(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

/// Options containing `query` (case-insensitive), minus values already chosen
pub fn filter<'a>(options: &'a [String], query: &str, chosen: &[String]) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    options
        .iter()
        .filter(|opt| !chosen.contains(opt))
        .filter(|opt| opt.to_lowercase().contains(&query))
        .map(String::as_str)
        .collect()
}
