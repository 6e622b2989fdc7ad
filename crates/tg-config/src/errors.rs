use tg_core::{ConfigError, ConversionError};
use tg_parser::XmlElementNode;

use crate::context::ParseContext;

pub const XML_ATTR_NOT_FOUND: &str = "XML_ATTR_NOT_FOUND";
pub const XML_ATTR_EMPTY: &str = "XML_ATTR_EMPTY";
pub const XML_ATTR_INVALID_VALUE: &str = "XML_ATTR_INVALID_VALUE";
pub const XML_ATTR_CONFLICT: &str = "XML_ATTR_CONFLICT";
pub const XML_ELEMENT_NOT_FOUND: &str = "XML_ELEMENT_NOT_FOUND";
pub const XML_ELEMENT_TOO_MANY: &str = "XML_ELEMENT_TOO_MANY";
pub const XML_ELEMENT_INVALID: &str = "XML_ELEMENT_INVALID";
pub const XML_ATTR_INVALID: &str = "XML_ATTR_INVALID";

/// Error constructors. Each one composes the breadcrumbs and the line of
/// the attribute (or of the element when `attr` is empty or missing).
impl ParseContext<'_> {
    pub fn error(
        &self,
        element: &XmlElementNode,
        attr: &str,
        code: &str,
        detail: impl Into<String>,
    ) -> ConfigError {
        let line = if attr.is_empty() {
            element.line()
        } else {
            element.attribute_line(attr)
        };
        ConfigError::at(
            code,
            detail,
            self.breadcrumbs(),
            Some(&element.name),
            Some(attr),
            Some(line),
        )
    }

    pub fn error_attr_not_found(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_NOT_FOUND,
            format!("expected attribute '{}' not found", attr),
        )
    }

    pub fn error_attr_empty(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_EMPTY,
            format!("attribute '{}' cannot be empty", attr),
        )
    }

    pub fn error_attr_empty_value(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_EMPTY,
            format!("attribute '{}' cannot have empty value", attr),
        )
    }

    pub fn error_attr_invalid_value(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute '{}' has invalid value", attr),
        )
    }

    pub fn error_attr_not_number(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute '{}' not a well formed number", attr),
        )
    }

    pub fn error_attr_not_name(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute '{}' not a well formed name", attr),
        )
    }

    pub fn error_attr_too_many_names(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute '{}' created one too many names", attr),
        )
    }

    pub fn error_attr_names_range(&self, element: &XmlElementNode, attr: &str) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute '{}' can't define range of names", attr),
        )
    }

    /// `Attribute 'attr': <conversion message>`.
    pub fn error_attr_conversion(
        &self,
        element: &XmlElementNode,
        attr: &str,
        error: &ConversionError,
    ) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("Attribute '{}': {}", attr, error),
        )
    }

    pub fn error_attr_already_defined_by(
        &self,
        element: &XmlElementNode,
        attr: &str,
        other: &str,
    ) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_CONFLICT,
            format!("attribute '{}' already defined by attribute '{}'", attr, other),
        )
    }

    pub fn error_attr_already_defined_by_range(
        &self,
        element: &XmlElementNode,
        attr: &str,
        from: &str,
        to: &str,
    ) -> ConfigError {
        self.error(
            element,
            attr,
            XML_ATTR_CONFLICT,
            format!(
                "attribute '{}' already defined by attributes '{}'-'{}'",
                attr, from, to
            ),
        )
    }

    pub fn error_element_not_found(&self, parent: &XmlElementNode, name: &str) -> ConfigError {
        self.error(
            parent,
            "",
            XML_ELEMENT_NOT_FOUND,
            format!("expected subelement '{}' not found", name),
        )
    }

    pub fn error_element_too_many(&self, element: &XmlElementNode, name: &str) -> ConfigError {
        self.error(
            element,
            "",
            XML_ELEMENT_TOO_MANY,
            format!("Too many node elements '{}'", name),
        )
    }
}
