use thiserror::Error;

/// Fatal error raised while resolving or validating a configuration document.
///
/// `message` is the text shown to users: the breadcrumb trail of the parse
/// context followed by `Error at line N: <detail>`. `detail` keeps the bare
/// message so callers and tests can match on it without the decoration.
#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct ConfigError {
    pub code: String,
    pub message: String,
    pub detail: String,
    pub element: Option<String>,
    pub attribute: Option<String>,
    pub line: Option<usize>,
}

impl ConfigError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.into(),
            detail: message.clone(),
            message,
            element: None,
            attribute: None,
            line: None,
        }
    }

    pub fn at(
        code: impl Into<String>,
        detail: impl Into<String>,
        breadcrumbs: &[String],
        element: Option<&str>,
        attribute: Option<&str>,
        line: Option<usize>,
    ) -> Self {
        let detail = detail.into();
        let mut message = String::new();
        for crumb in breadcrumbs {
            message.push_str(crumb);
            message.push_str(": ");
        }
        match line {
            Some(line) => message.push_str(&format!("Error at line {}: {}", line, detail)),
            None => message.push_str(&format!("Error: {}", detail)),
        }
        Self {
            code: code.into(),
            message,
            detail,
            element: element.map(str::to_string),
            attribute: attribute.filter(|name| !name.is_empty()).map(str::to_string),
            line,
        }
    }
}
