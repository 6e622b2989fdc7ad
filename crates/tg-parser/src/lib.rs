mod xml;

pub use xml::{parse_xml_document, ElementId, XmlDocument, XmlElementNode};
