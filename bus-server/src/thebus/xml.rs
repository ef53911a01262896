//! Decoding of the XML vehicle document.
//!
//! The vehicle endpoint answers with a flat document:
//!
//! ```xml
//! <vehicles>
//!   <timestamp>1/7/2024 10:15:40 AM</timestamp>
//!   <vehicle>
//!     <number>249</number>
//!     <trip>2761580</trip>
//!     <latitude>21.29</latitude>
//!     ...
//!   </vehicle>
//! </vehicles>
//! ```
//!
//! Each `<vehicle>` becomes a tag-name → text map. The literal text `null`
//! means "no value".

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

/// Fields of one `<vehicle>` element, keyed by child tag name.
pub type VehicleFields = BTreeMap<String, Option<String>>;

/// A decoded vehicle document, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDocument {
    pub timestamp: Option<String>,
    pub vehicles: Vec<VehicleFields>,
}

/// Failure to decode a vehicle document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XmlError {
    /// Not well-formed XML, or the document carries a parser-error marker.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// A well-formed document reporting a service-level error.
    #[error("service error: {0}")]
    Service(String),
}

/// Parse a vehicle document.
pub fn parse_vehicle_document(text: &str) -> Result<VehicleDocument, XmlError> {
    let doc = Document::parse(text).map_err(|e| XmlError::Malformed(e.to_string()))?;

    // Some relays wrap upstream parse failures in a <parsererror> element
    // instead of failing the request.
    if doc.descendants().any(|n| n.has_tag_name("parsererror")) {
        return Err(XmlError::Malformed("parser error marker present".to_string()));
    }

    let root = doc.root_element();

    if let Some(message) = child_text(root, "errorMessage") {
        return Err(XmlError::Service(message));
    }

    let timestamp = child_text(root, "timestamp");

    let vehicles = doc
        .descendants()
        .filter(|n| n.has_tag_name("vehicle"))
        .map(vehicle_fields)
        .collect();

    Ok(VehicleDocument {
        timestamp,
        vehicles,
    })
}

fn vehicle_fields(node: Node<'_, '_>) -> VehicleFields {
    node.children()
        .filter(Node::is_element)
        .map(|child| {
            (
                child.tag_name().name().to_string(),
                normalize_text(child.text()),
            )
        })
        .collect()
}

/// Trimmed text of a direct child element, if non-empty.
fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(name))
        .and_then(|c| normalize_text(c.text()))
}

fn normalize_text(text: Option<&str>) -> Option<String> {
    let text = text?.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text.to_string())
    }
}
