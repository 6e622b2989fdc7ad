use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tg_core::convert::tokenize;
use tg_core::ConfigError;
use tg_parser::{ElementId, XmlElementNode};

use crate::errors::{XML_ATTR_INVALID, XML_ELEMENT_INVALID};

pub const EXIST_IF_NODE: &str = "ExistIf";
pub const PASSTHROUGH_IF_NODE: &str = "PassthroughIf";
pub const ATTR_IF_NODE: &str = "AttrIf";
/// Attribute of an `AttrIf` block listing attributes it makes undefined.
pub const ATTR_IF_UNDEF_ATTR: &str = "_undef_";
pub const ATTR_IF_UNDEF_SEPARATOR: &str = ",";

/// Elements with this prefix are never validated.
pub const IGNORE_ELEMENT_PREFIX: &str = "_Ign_";
/// Attributes with this prefix are never validated.
pub const IGNORE_ATTR_PREFIX: &str = "_ign_";

const CONDITIONAL_NODES: [&str; 3] = [EXIST_IF_NODE, PASSTHROUGH_IF_NODE, ATTR_IF_NODE];

#[derive(Debug)]
struct Scope {
    name: String,
    line: usize,
    count: usize,
    check_children: bool,
    check_attrs: bool,
    valid_children: HashSet<String>,
    valid_attrs: HashSet<String>,
}

/// Reference counted record of the child and attribute names declared
/// legal for each element.
///
/// Every helper that looks at an element opens its scope, declares the
/// names it consumed and closes it again. Unknown names are only reported
/// when the last reference is closed.
#[derive(Debug, Default)]
pub struct Checker {
    scopes: HashMap<ElementId, Scope>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, element: &XmlElementNode) {
        let scope = self.scopes.entry(element.id).or_insert_with(|| Scope {
            name: element.name.clone(),
            line: element.line(),
            count: 0,
            check_children: false,
            check_attrs: false,
            valid_children: CONDITIONAL_NODES.iter().map(|name| name.to_string()).collect(),
            valid_attrs: HashSet::new(),
        });
        scope.count += 1;
    }

    pub fn is_open(&self, element: &XmlElementNode) -> bool {
        self.scopes.contains_key(&element.id)
    }

    pub fn declare_child(
        &mut self,
        element: &XmlElementNode,
        name: &str,
        breadcrumbs: &[String],
    ) -> Result<(), ConfigError> {
        let scope = self.scope_mut(element, breadcrumbs)?;
        if !name.is_empty() {
            scope.valid_children.insert(name.to_string());
        }
        Ok(())
    }

    pub fn declare_attr(
        &mut self,
        element: &XmlElementNode,
        name: &str,
        breadcrumbs: &[String],
    ) -> Result<(), ConfigError> {
        let scope = self.scope_mut(element, breadcrumbs)?;
        if !name.is_empty() {
            scope.valid_attrs.insert(name.to_string());
        }
        Ok(())
    }

    /// Releases one reference. The check flags accumulate over releases and
    /// validation runs when the last reference goes away.
    pub fn close(
        &mut self,
        element: &XmlElementNode,
        check_children: bool,
        check_attrs: bool,
        breadcrumbs: &[String],
    ) -> Result<(), ConfigError> {
        let Entry::Occupied(mut entry) = self.scopes.entry(element.id) else {
            return Err(scope_not_open(element, breadcrumbs));
        };
        let scope = entry.get_mut();
        scope.check_children |= check_children;
        scope.check_attrs |= check_attrs;
        scope.count -= 1;
        if scope.count > 0 {
            return Ok(());
        }
        let scope = entry.remove();
        validate(element, &scope, breadcrumbs)
    }

    /// Scopes still open, as `(element name, line)` ordered by line.
    pub fn leaked(&self) -> Vec<(String, usize)> {
        let mut leaked = self
            .scopes
            .values()
            .map(|scope| (scope.name.clone(), scope.line))
            .collect::<Vec<_>>();
        leaked.sort_by(|left, right| left.1.cmp(&right.1).then_with(|| left.0.cmp(&right.0)));
        leaked
    }

    fn scope_mut(
        &mut self,
        element: &XmlElementNode,
        breadcrumbs: &[String],
    ) -> Result<&mut Scope, ConfigError> {
        match self.scopes.get_mut(&element.id) {
            Some(scope) => Ok(scope),
            None => Err(scope_not_open(element, breadcrumbs)),
        }
    }
}

fn scope_not_open(element: &XmlElementNode, breadcrumbs: &[String]) -> ConfigError {
    ConfigError::at(
        "CHECKER_SCOPE_NOT_OPEN",
        format!("No validation scope open for element '{}'", element.name),
        breadcrumbs,
        Some(&element.name),
        None,
        Some(element.line()),
    )
}

fn invalid_attr(element: &XmlElementNode, attr: &str, breadcrumbs: &[String]) -> ConfigError {
    ConfigError::at(
        XML_ATTR_INVALID,
        format!("Attribute {}: invalid", attr),
        breadcrumbs,
        Some(&element.name),
        Some(attr),
        Some(element.attribute_line(attr)),
    )
}

fn validate(
    element: &XmlElementNode,
    scope: &Scope,
    breadcrumbs: &[String],
) -> Result<(), ConfigError> {
    if scope.check_attrs {
        // Attributes of AttrIf blocks override the parent's, so they must be legal there.
        for attr_if in element.children_named(ATTR_IF_NODE) {
            for (name, value) in &attr_if.attributes {
                if name.starts_with(IGNORE_ATTR_PREFIX) {
                    continue;
                }
                if name == ATTR_IF_UNDEF_ATTR {
                    for token in tokenize(value, ATTR_IF_UNDEF_SEPARATOR) {
                        if !scope.valid_attrs.contains(token) {
                            return Err(ConfigError::at(
                                XML_ATTR_INVALID,
                                format!("Attribute {}: invalid", token),
                                breadcrumbs,
                                Some(&attr_if.name),
                                Some(name),
                                Some(attr_if.attribute_line(name)),
                            ));
                        }
                    }
                    continue;
                }
                if !scope.valid_attrs.contains(name) {
                    return Err(invalid_attr(attr_if, name, breadcrumbs));
                }
            }
        }
    }
    if scope.check_children {
        for child in &element.children {
            if child.name.starts_with(IGNORE_ELEMENT_PREFIX) {
                continue;
            }
            if !scope.valid_children.contains(&child.name) {
                return Err(ConfigError::at(
                    XML_ELEMENT_INVALID,
                    format!("Invalid element '{}'", child.name),
                    breadcrumbs,
                    Some(&child.name),
                    None,
                    Some(child.line()),
                ));
            }
        }
    }
    if scope.check_attrs {
        for name in element.attributes.keys() {
            if name.starts_with(IGNORE_ATTR_PREFIX) {
                continue;
            }
            if !scope.valid_attrs.contains(name) {
                return Err(invalid_attr(element, name, breadcrumbs));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_parser::parse_xml_document;

    fn document(source: &str) -> tg_parser::XmlDocument {
        parse_xml_document(source).expect("fixture should parse")
    }

    #[test]
    fn validation_waits_for_last_reference() {
        let doc = document(r#"<Color name="red" extra="1"/>"#);
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker.open(&doc.root);
        checker.declare_attr(&doc.root, "name", &[]).expect("declare");
        checker
            .close(&doc.root, false, true, &[])
            .expect("first close does not validate");
        checker.declare_attr(&doc.root, "extra", &[]).expect("declare");
        checker
            .close(&doc.root, false, false, &[])
            .expect("accumulated check flag validates declared names");
        assert!(!checker.is_open(&doc.root));
    }

    #[test]
    fn scopes_of_equal_documents_stay_separate() {
        let selector = document(r#"<Color name="red"/>"#);
        let tile = document(r#"<Color tint="1"/>"#);
        let mut checker = Checker::new();
        checker.open(&selector.root);
        checker.open(&tile.root);
        checker.declare_attr(&selector.root, "name", &[]).expect("declare");
        let error = checker
            .close(&tile.root, false, true, &[])
            .expect_err("tint is declared on neither scope");
        assert_eq!(error.detail, "Attribute tint: invalid");
        assert!(checker.is_open(&selector.root));
        checker
            .close(&selector.root, false, true, &[])
            .expect("name was declared on its own scope");
        assert!(checker.leaked().is_empty());
    }

    #[test]
    fn undeclared_attribute_is_reported_on_last_close() {
        let doc = document("<Color\n name=\"red\"\n bogus=\"1\"/>");
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker.declare_attr(&doc.root, "name", &[]).expect("declare");
        let crumbs = vec!["Theme".to_string()];
        let error = checker
            .close(&doc.root, false, true, &crumbs)
            .expect_err("bogus is not declared");
        assert_eq!(error.code, "XML_ATTR_INVALID");
        assert_eq!(error.message, "Theme: Error at line 3: Attribute bogus: invalid");
        assert_eq!(error.attribute.as_deref(), Some("bogus"));
    }

    #[test]
    fn undeclared_child_is_reported_and_ignored_prefix_is_skipped() {
        let doc = document("<Colors><Color/><_Ign_Note/><Font/></Colors>");
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker.declare_child(&doc.root, "Color", &[]).expect("declare");
        let error = checker
            .close(&doc.root, true, false, &[])
            .expect_err("Font is not declared");
        assert_eq!(error.code, "XML_ELEMENT_INVALID");
        assert_eq!(error.detail, "Invalid element 'Font'");
    }

    #[test]
    fn conditional_children_are_always_legal() {
        let doc = document("<Colors><ExistIf/><AttrIf/><PassthroughIf/></Colors>");
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker
            .close(&doc.root, true, false, &[])
            .expect("conditional blocks are implicitly declared");
    }

    #[test]
    fn ignored_attributes_are_skipped() {
        let doc = document(r#"<Color _ign_comment="x"/>"#);
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker.close(&doc.root, true, true, &[]).expect("ignored attribute");
    }

    #[test]
    fn attr_if_attributes_must_be_legal_on_parent() {
        let doc = document(r#"<Color name="a"><AttrIf name="b" size="3"/></Color>"#);
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker.declare_attr(&doc.root, "name", &[]).expect("declare");
        let error = checker
            .close(&doc.root, true, true, &[])
            .expect_err("size is not legal on Color");
        assert_eq!(error.detail, "Attribute size: invalid");
        assert_eq!(error.element.as_deref(), Some("AttrIf"));
    }

    #[test]
    fn attr_if_undef_tokens_must_be_legal_on_parent() {
        let doc = document(r#"<Color name="a"><AttrIf _undef_="name, size"/></Color>"#);
        let mut checker = Checker::new();
        checker.open(&doc.root);
        checker.declare_attr(&doc.root, "name", &[]).expect("declare");
        let error = checker
            .close(&doc.root, false, true, &[])
            .expect_err("size is not legal on Color");
        assert_eq!(error.detail, "Attribute size: invalid");
    }

    #[test]
    fn declaring_without_open_scope_fails() {
        let doc = document("<Color/>");
        let mut checker = Checker::new();
        let error = checker
            .declare_attr(&doc.root, "name", &[])
            .expect_err("scope not open");
        assert_eq!(error.code, "CHECKER_SCOPE_NOT_OPEN");
        let error = checker
            .close(&doc.root, false, false, &[])
            .expect_err("scope not open");
        assert_eq!(error.code, "CHECKER_SCOPE_NOT_OPEN");
    }

    #[test]
    fn leaked_lists_open_scopes_by_line() {
        let doc = document("<Game>\n<Team/>\n</Game>");
        let mut checker = Checker::new();
        checker.open(&doc.root.children[0]);
        checker.open(&doc.root);
        assert_eq!(
            checker.leaked(),
            vec![("Game".to_string(), 1), ("Team".to_string(), 2)]
        );
    }
}
