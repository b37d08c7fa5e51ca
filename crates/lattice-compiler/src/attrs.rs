//! Field attributes (`@key(body)`).

use lattice_core::Span;
use lattice_core::adt::{Attr, Attrs};
use lattice_syntax::ast::Attribute;
use thiserror::Error;

/// A malformed or repeated attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrError {
    #[error("invalid attribute {text:?}: {reason}")]
    Invalid {
        text: String,
        reason: &'static str,
        span: Span,
    },

    #[error("attribute {key:?} declared more than once")]
    Duplicate { key: String, span: Span },
}

impl AttrError {
    /// Position of the offending attribute.
    pub fn span(&self) -> Span {
        match self {
            AttrError::Invalid { span, .. } | AttrError::Duplicate { span, .. } => *span,
        }
    }
}

/// Parse the attributes of one field into a set sorted by key.
pub fn create_attrs(attrs: &[Attribute<'_>]) -> Result<Attrs, AttrError> {
    let mut parsed: Vec<(Attr, Span)> = Vec::with_capacity(attrs.len());
    for a in attrs {
        let attr = parse_attribute(a.text).map_err(|reason| AttrError::Invalid {
            text: a.text.to_string(),
            reason,
            span: a.span,
        })?;
        parsed.push((attr, a.span));
    }
    parsed.sort_by(|a, b| a.0.key.cmp(&b.0.key));

    if let Some(w) = parsed.windows(2).find(|w| w[0].0.key == w[1].0.key) {
        return Err(AttrError::Duplicate {
            key: w[1].0.key.clone(),
            span: w[1].1,
        });
    }
    Ok(Attrs::from_sorted(parsed.into_iter().map(|(a, _)| a).collect()))
}

/// Split `@key(body)` into key and body.
fn parse_attribute(text: &str) -> Result<Attr, &'static str> {
    let rest = text.strip_prefix('@').ok_or("missing '@'")?;
    let open = rest.find('(').ok_or("missing '('")?;
    let key = &rest[..open];
    if key.is_empty() || !lattice_core::label::is_identifier(key) {
        return Err("invalid key");
    }
    let body = rest[open + 1..]
        .strip_suffix(')')
        .ok_or("missing closing ')'")?;
    check_balanced(body)?;
    Ok(Attr {
        key: key.to_string(),
        body: body.to_string(),
    })
}

/// Parentheses in the body must balance outside of quoted strings.
fn check_balanced(body: &str) -> Result<(), &'static str> {
    let mut depth = 0u32;
    let mut quote = None;
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            (None, _) => {}
        }
    }
    if quote.is_some() {
        return Err("unterminated string");
    }
    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    Ok(())
}
