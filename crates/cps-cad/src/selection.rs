//! Selection model
//!
//! The host selection is an ordered list of `(object, sub-element name,
//! resolved sub-object)` entries. Sub-element names are `Edge<N>`,
//! `Face<N>` or `Vertex<N>`, numbered from 1.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use cps_core::EdgeRef;

use crate::sketch::SketchError;

/// Kind of topological sub-element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubElementKind {
    Edge,
    Face,
    Vertex,
}

impl SubElementKind {
    /// Name prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            SubElementKind::Edge => "Edge",
            SubElementKind::Face => "Face",
            SubElementKind::Vertex => "Vertex",
        }
    }
}

/// A parsed sub-element name with a 0-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubElement {
    pub kind: SubElementKind,
    /// 0-based index (`Edge1` is 0)
    pub index: usize,
}

impl SubElement {
    pub fn edge(index: usize) -> Self {
        Self {
            kind: SubElementKind::Edge,
            index,
        }
    }

    pub fn face(index: usize) -> Self {
        Self {
            kind: SubElementKind::Face,
            index,
        }
    }

    /// Host name, e.g. `Edge3` for edge index 2
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SubElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.index + 1)
    }
}

impl FromStr for SubElement {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SketchError::InvalidSubElement(s.to_string());
        let (kind, digits) = [
            SubElementKind::Edge,
            SubElementKind::Face,
            SubElementKind::Vertex,
        ]
        .into_iter()
        .find_map(|kind| s.strip_prefix(kind.prefix()).map(|rest| (kind, rest)))
        .ok_or_else(invalid)?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: usize = digits.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        Ok(Self {
            kind,
            index: number - 1,
        })
    }
}

/// Geometry the host resolved for a selected sub-element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubObject {
    /// A straight edge
    Edge(EdgeRef),
    /// A planar face
    Face { axis: DVec3, center_of_mass: DVec3 },
}

/// One selected sub-element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    /// Internal name of the owning object
    pub object: String,
    /// Sub-element name as reported by the host
    pub sub_element: String,
    /// Resolved geometry, when the host provided it
    pub sub_object: Option<SubObject>,
}

impl SelectionItem {
    /// Parse the sub-element name
    pub fn parsed(&self) -> Result<SubElement, SketchError> {
        self.sub_element.parse()
    }
}

/// Ordered selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    items: Vec<SelectionItem>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry
    pub fn push(&mut self, item: SelectionItem) {
        self.items.push(item);
    }

    /// Add a sub-element by name only
    pub fn with_name(mut self, object: &str, sub_element: &str) -> Self {
        self.push(SelectionItem {
            object: object.to_string(),
            sub_element: sub_element.to_string(),
            sub_object: None,
        });
        self
    }

    /// Add an edge together with its resolved geometry
    pub fn with_edge(mut self, object: &str, sub_element: &str, edge: EdgeRef) -> Self {
        self.push(SelectionItem {
            object: object.to_string(),
            sub_element: sub_element.to_string(),
            sub_object: Some(SubObject::Edge(edge)),
        });
        self
    }

    /// Add a face together with its resolved geometry
    pub fn with_face(
        mut self,
        object: &str,
        sub_element: &str,
        axis: DVec3,
        center_of_mass: DVec3,
    ) -> Self {
        self.push(SelectionItem {
            object: object.to_string(),
            sub_element: sub_element.to_string(),
            sub_object: Some(SubObject::Face {
                axis,
                center_of_mass,
            }),
        });
        self
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Owning object of the first entry
    pub fn first_object(&self) -> Option<&str> {
        self.items.first().map(|i| i.object.as_str())
    }

    /// Entries whose sub-element parses as `kind`, in selection order
    ///
    /// Unparseable names are skipped.
    pub fn of_kind(&self, kind: SubElementKind) -> Vec<(SubElement, &SelectionItem)> {
        self.items
            .iter()
            .filter_map(|item| item.parsed().ok().map(|sub| (sub, item)))
            .filter(|(sub, _)| sub.kind == kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        let e: SubElement = "Edge12".parse().unwrap();
        assert_eq!(e, SubElement::edge(11));
        assert_eq!(e.name(), "Edge12");

        let f: SubElement = "Face1".parse().unwrap();
        assert_eq!(f, SubElement::face(0));

        let v: SubElement = "Vertex3".parse().unwrap();
        assert_eq!(v.kind, SubElementKind::Vertex);
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        for bad in ["Edge0", "Edge", "Edge1a", "Edge-1", "edge1", "Wire2", "", "Edge+3"] {
            assert!(
                matches!(bad.parse::<SubElement>(), Err(SketchError::InvalidSubElement(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_of_kind_keeps_order() {
        let selection = Selection::new()
            .with_name("Box", "Edge3")
            .with_name("Box", "Face2")
            .with_name("Box", "Edge1")
            .with_name("Box", "Garbage");
        let edges = selection.of_kind(SubElementKind::Edge);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].0, SubElement::edge(2));
        assert_eq!(edges[1].0, SubElement::edge(0));
        assert_eq!(selection.of_kind(SubElementKind::Face).len(), 1);
        assert_eq!(selection.first_object(), Some("Box"));
    }
}
