// src/models/bus_data.rs

//! The result set of one ingestion run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Direction, Route, RouteStopLink, Stop};

/// All four collections of one run, handed to a data store as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusData {
    pub routes: Vec<Route>,
    /// Distinct directions, in first-seen order
    pub directions: Vec<Direction>,
    /// Distinct stops, in first-seen order
    pub stops: Vec<Stop>,
    pub links: Vec<RouteStopLink>,
}

impl BusData {
    pub fn summary(&self) -> IngestSummary {
        IngestSummary {
            routes: self.routes.len(),
            directions: self.directions.len(),
            stops: self.stops.len(),
            links: self.links.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
            && self.directions.is_empty()
            && self.stops.is_empty()
            && self.links.is_empty()
    }

    /// Check that every link points at a direction and stop in this data set.
    pub fn dangling_links(&self) -> Vec<&RouteStopLink> {
        let directions: std::collections::HashSet<u32> =
            self.directions.iter().map(|d| d.number).collect();
        let stops: std::collections::HashSet<u32> = self.stops.iter().map(|s| s.number).collect();

        self.links
            .iter()
            .filter(|l| !directions.contains(&l.direction_number) || !stops.contains(&l.stop_number))
            .collect()
    }
}

/// Final counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub routes: usize,
    pub directions: usize,
    pub stops: usize,
    pub links: usize,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} routes {} directions {} stops {} links",
            self.routes, self.directions, self.stops, self.links
        )
    }
}
