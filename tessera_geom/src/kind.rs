// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry type tags.

use core::fmt;

/// The kind of geometry a collection stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Single positions.
    Point,
    /// Groups of positions.
    MultiPoint,
    /// Open polylines of two or more points.
    LineString,
    /// Groups of polylines.
    MultiLineString,
    /// Closed rings with optional holes.
    Polygon,
    /// Groups of polygons.
    MultiPolygon,
}

impl GeometryKind {
    /// Conventional name, as used by GeoJSON and WKT.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
        }
    }

    /// Fewest positions a single member of this kind may have.
    pub const fn min_points(self) -> usize {
        match self {
            Self::Point | Self::MultiPoint => 1,
            Self::LineString | Self::MultiLineString => 2,
            Self::Polygon | Self::MultiPolygon => 4,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
