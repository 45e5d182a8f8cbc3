//! This module defines the error types used by the `hotspot-grid` crate.

/// Error type for clustering operations.
///
/// The engine only fails on caller contract violations. Bad individual
/// points are dropped and counted instead of being reported here.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// Error for an invalid grid cell size.
    /// This variant is returned when the cell size is zero, negative or not finite.
    InvalidCellSize(&'static str),
}

impl core::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ClusterError::InvalidCellSize(msg) => write!(f, "Invalid cell size: {}", msg),
        }
    }
}

impl std::error::Error for ClusterError {}
