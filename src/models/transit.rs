// src/models/transit.rs

//! Route, Direction, Stop, and RouteStopLink records.

use serde::{Deserialize, Serialize};

/// A numbered transit line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Route number as published (e.g., "02"); the leading zeros are part of page URLs
    pub number: String,

    /// Display name (e.g., "WHARNCLIFFE")
    pub name: String,
}

impl Route {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }

    /// Numeric value of the route number, used for sorting and display.
    pub fn numeric(&self) -> Option<u32> {
        self.number.parse().ok()
    }

    /// Route number without leading zeros ("02" -> "2").
    pub fn display_number(&self) -> &str {
        let trimmed = self.number.trim_start_matches('0');
        if trimmed.is_empty() && !self.number.is_empty() {
            "0"
        } else {
            trimmed
        }
    }

    /// Route number and name, e.g. "2 WHARNCLIFFE".
    pub fn name_with_number(&self) -> String {
        format!("{} {}", self.display_number(), self.name)
    }
}

/// A travel direction; the id is shared by every route using it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub number: u32,
    pub name: String,
}

impl Direction {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

/// A physical stop location, identified globally by its number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stop {
    pub number: u32,
    pub name: String,
}

impl Stop {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

/// "This route, in this direction, serves this stop."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteStopLink {
    pub route_number: String,
    pub direction_number: u32,
    pub stop_number: u32,
}

impl RouteStopLink {
    pub fn new(route_number: impl Into<String>, direction_number: u32, stop_number: u32) -> Self {
        Self {
            route_number: route_number.into(),
            direction_number,
            stop_number,
        }
    }
}
