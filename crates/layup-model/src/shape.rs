//! Element topologies as reported by the engine, and their corner-node counts.

use serde::{Deserialize, Serialize};

/// Element topology enumeration, numbered by the engine's shape codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementShape {
    /// 10-node tetrahedron
    Tet10,
    /// 20-node hexahedron
    Hex20,
    /// 15-node wedge
    Wedge15,
    /// 13-node pyramid
    Pyramid13,
    /// 6-node triangle
    Tri6,
    /// 6-node triangular shell
    TriShell6,
    /// 8-node quadrilateral
    Quad8,
    /// 8-node quadrilateral shell
    QuadShell8,
    /// 3-node line
    Line3,
    /// Point
    Point1,
    /// 4-node tetrahedron
    Tet4,
    /// 8-node hexahedron
    Hex8,
    /// 6-node wedge
    Wedge6,
    /// 5-node pyramid
    Pyramid5,
    /// 3-node triangle
    Tri3,
    /// 3-node triangular shell
    TriShell3,
    /// 4-node quadrilateral
    Quad4,
    /// 4-node quadrilateral shell
    QuadShell4,
    /// 2-node line
    Line2,
}

impl ElementShape {
    /// All shapes, ordered by code
    pub const ALL: [ElementShape; 19] = [
        ElementShape::Tet10,
        ElementShape::Hex20,
        ElementShape::Wedge15,
        ElementShape::Pyramid13,
        ElementShape::Tri6,
        ElementShape::TriShell6,
        ElementShape::Quad8,
        ElementShape::QuadShell8,
        ElementShape::Line3,
        ElementShape::Point1,
        ElementShape::Tet4,
        ElementShape::Hex8,
        ElementShape::Wedge6,
        ElementShape::Pyramid5,
        ElementShape::Tri3,
        ElementShape::TriShell3,
        ElementShape::Quad4,
        ElementShape::QuadShell4,
        ElementShape::Line2,
    ];

    /// Engine shape code
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Shape for an engine shape code
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Total number of nodes, midside nodes included
    pub fn num_nodes(self) -> usize {
        match self {
            ElementShape::Tet10 => 10,
            ElementShape::Hex20 => 20,
            ElementShape::Wedge15 => 15,
            ElementShape::Pyramid13 => 13,
            ElementShape::Tri6 | ElementShape::TriShell6 => 6,
            ElementShape::Quad8 | ElementShape::QuadShell8 => 8,
            ElementShape::Line3 => 3,
            ElementShape::Point1 => 1,
            ElementShape::Tet4 => 4,
            ElementShape::Hex8 => 8,
            ElementShape::Wedge6 => 6,
            ElementShape::Pyramid5 => 5,
            ElementShape::Tri3 | ElementShape::TriShell3 => 3,
            ElementShape::Quad4 | ElementShape::QuadShell4 => 4,
            ElementShape::Line2 => 2,
        }
    }

    /// Number of corner nodes (midside nodes excluded)
    pub fn corner_nodes(self) -> usize {
        match self {
            ElementShape::Tet10 | ElementShape::Tet4 => 4,
            ElementShape::Hex20 | ElementShape::Hex8 => 8,
            ElementShape::Wedge15 | ElementShape::Wedge6 => 6,
            ElementShape::Pyramid13 | ElementShape::Pyramid5 => 5,
            ElementShape::Tri6
            | ElementShape::TriShell6
            | ElementShape::Tri3
            | ElementShape::TriShell3 => 3,
            ElementShape::Quad8
            | ElementShape::QuadShell8
            | ElementShape::Quad4
            | ElementShape::QuadShell4 => 4,
            ElementShape::Line3 | ElementShape::Line2 => 2,
            ElementShape::Point1 => 1,
        }
    }

    pub fn is_shell(self) -> bool {
        matches!(
            self,
            ElementShape::TriShell3
                | ElementShape::TriShell6
                | ElementShape::QuadShell4
                | ElementShape::QuadShell8
        )
    }
}

/// Corner-node count by shape code.
///
/// Dense array indexed by code; a negative entry marks a code without a
/// known corner-node count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerNodeTable {
    counts: Vec<i64>,
}

impl CornerNodeTable {
    /// Table covering every [`ElementShape`]
    pub fn standard() -> Self {
        let counts = ElementShape::ALL
            .iter()
            .map(|shape| shape.corner_nodes() as i64)
            .collect();
        Self { counts }
    }

    /// Table from raw counts (negative = unknown)
    pub fn from_counts(counts: Vec<i64>) -> Self {
        Self { counts }
    }

    /// Corner nodes for `code`, `None` for unknown or negative entries
    pub fn corner_nodes(&self, code: i64) -> Option<usize> {
        let index = usize::try_from(code).ok()?;
        let count = *self.counts.get(index)?;
        usize::try_from(count).ok()
    }
}

impl Default for CornerNodeTable {
    fn default() -> Self {
        Self::standard()
    }
}
