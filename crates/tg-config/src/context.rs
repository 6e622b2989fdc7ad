use tg_core::{AppPreferences, ConfigError, Named};
use tg_parser::XmlElementNode;
use tracing::warn;

use crate::checker::Checker;

/// State of one parse pass.
///
/// Owns the validation scopes and the breadcrumb stack used to compose
/// error messages. The named resource registry and the preferences are
/// injected by the caller; without preferences conditions are only
/// validated, not resolved against a roster.
#[derive(Debug)]
pub struct ParseContext<'a> {
    preferences: Option<&'a AppPreferences>,
    named: &'a mut Named,
    checker: Checker,
    breadcrumbs: Vec<String>,
    context_team: i32,
    context_mate: i32,
}

impl<'a> ParseContext<'a> {
    pub fn new(named: &'a mut Named) -> Self {
        Self {
            preferences: None,
            named,
            checker: Checker::new(),
            breadcrumbs: Vec::new(),
            context_team: -1,
            context_mate: -1,
        }
    }

    pub fn with_preferences(preferences: &'a AppPreferences, named: &'a mut Named) -> Self {
        Self {
            preferences: Some(preferences),
            ..Self::new(named)
        }
    }

    pub fn preferences(&self) -> Option<&'a AppPreferences> {
        self.preferences
    }

    pub fn named(&self) -> &Named {
        &*self.named
    }

    pub fn named_mut(&mut self) -> &mut Named {
        &mut *self.named
    }

    /// Team and mate applied when an element doesn't name its owner. `-1`
    /// means undefined.
    pub fn set_context_owner(&mut self, team: i32, mate: i32) {
        self.context_team = team;
        self.context_mate = mate;
    }

    pub fn context_team(&self) -> i32 {
        self.context_team
    }

    pub fn context_mate(&self) -> i32 {
        self.context_mate
    }

    pub fn push_context(&mut self, crumb: impl Into<String>) {
        self.breadcrumbs.push(crumb.into());
    }

    pub fn pop_context(&mut self) {
        self.breadcrumbs.pop();
    }

    pub fn breadcrumbs(&self) -> &[String] {
        &self.breadcrumbs
    }

    pub fn open(&mut self, element: &XmlElementNode) {
        self.checker.open(element);
    }

    pub fn declare_child(
        &mut self,
        element: &XmlElementNode,
        name: &str,
    ) -> Result<(), ConfigError> {
        self.checker.declare_child(element, name, &self.breadcrumbs)
    }

    pub fn declare_attr(
        &mut self,
        element: &XmlElementNode,
        name: &str,
    ) -> Result<(), ConfigError> {
        self.checker.declare_attr(element, name, &self.breadcrumbs)
    }

    pub fn close(
        &mut self,
        element: &XmlElementNode,
        check_children: bool,
        check_attrs: bool,
    ) -> Result<(), ConfigError> {
        self.checker
            .close(element, check_children, check_attrs, &self.breadcrumbs)
    }

    /// Ends the parse pass. Fails if a validation scope was left open.
    ///
    /// Only call this when the pass succeeded: after an error the scopes of
    /// the aborted elements are expected to be open.
    pub fn finish(self) -> Result<(), ConfigError> {
        let leaked = self.checker.leaked();
        if leaked.is_empty() {
            return Ok(());
        }
        for (element, line) in &leaked {
            warn!(element = %element, line = *line, "validation scope left open");
        }
        let list = leaked
            .iter()
            .map(|(element, line)| format!("{} (line {})", element, line))
            .collect::<Vec<_>>()
            .join(", ");
        Err(ConfigError::new(
            "CHECKER_SCOPE_LEAKED",
            format!("Validation scopes left open: {}", list),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_parser::parse_xml_document;

    #[test]
    fn finish_fails_on_leaked_scope() {
        let doc = parse_xml_document("<Game>\n<Team/>\n</Game>").expect("parse");
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        ctx.open(&doc.root);
        ctx.open(&doc.root.children[0]);
        ctx.close(&doc.root, false, false).expect("close root");
        let error = ctx.finish().expect_err("Team scope leaked");
        assert_eq!(error.code, "CHECKER_SCOPE_LEAKED");
        assert_eq!(error.message, "Validation scopes left open: Team (line 2)");
    }

    #[test]
    fn finish_succeeds_when_balanced() {
        let doc = parse_xml_document("<Game/>").expect("parse");
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        ctx.open(&doc.root);
        ctx.close(&doc.root, true, true).expect("close");
        ctx.finish().expect("no leaks");
    }

    #[test]
    fn breadcrumbs_compose_into_errors() {
        let doc = parse_xml_document(r#"<Game bad="1"/>"#).expect("parse");
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        ctx.push_context("Game 'demo'");
        ctx.push_context("Layout");
        ctx.pop_context();
        ctx.open(&doc.root);
        let error = ctx.close(&doc.root, false, true).expect_err("bad attribute");
        assert_eq!(error.message, "Game 'demo': Error at line 1: Attribute bad: invalid");
    }

    #[test]
    fn context_owner_defaults_to_undefined() {
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        assert_eq!((ctx.context_team(), ctx.context_mate()), (-1, -1));
        ctx.set_context_owner(1, 0);
        assert_eq!((ctx.context_team(), ctx.context_mate()), (1, 0));
        assert!(ctx.preferences().is_none());
        ctx.named_mut().colors.add_name("red");
        assert_eq!(ctx.named().colors.index("red"), Some(0));
    }
}
