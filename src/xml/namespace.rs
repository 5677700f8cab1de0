//! Manual namespace resolution for parsed XML element and attribute names.
//!
//! The tokenizer we drive (xml5ever's low-level `XmlTokenizer`) only splits a raw
//! name into a `prefix:local` pair; its `QualName::ns` field is always the empty
//! namespace.  It does not know anything about `xmlns` declarations, since that is
//! the job of a full tree builder, which we don't use.  This module keeps a stack
//! of the namespace bindings in scope as elements are entered and exited, and
//! resolves a tokenizer-provided name into its fully qualified form.

use markup5ever::{ns, Namespace, Prefix, QualName};
use std::collections::HashMap;

const XMLNS_URI: &str = "http://www.w3.org/2000/xmlns/";
const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Clone, Default)]
struct Scope {
    default_ns: Option<Namespace>,
    prefixes: HashMap<Prefix, Namespace>,
}

/// Tracks `xmlns` / `xmlns:prefix` bindings as elements are entered and exited.
#[derive(Default)]
pub struct NamespaceStack {
    scopes: Vec<Scope>,
}

impl NamespaceStack {
    pub fn new() -> NamespaceStack {
        NamespaceStack { scopes: Vec::new() }
    }

    /// Pushes a new scope inheriting the enclosing scope's bindings, applying any
    /// `xmlns` / `xmlns:*` declarations found among `attrs`.
    pub fn push_scope<'a>(&mut self, attrs: impl Iterator<Item = (&'a QualName, &'a str)>) {
        let mut scope = self.scopes.last().cloned().unwrap_or_default();

        for (name, value) in attrs {
            if name.prefix.is_none() && &name.local[..] == "xmlns" {
                scope.default_ns = if value.is_empty() {
                    None
                } else {
                    Some(Namespace::from(value))
                };
            } else if name.prefix.as_ref().map(|p| &p[..]) == Some("xmlns") {
                scope
                    .prefixes
                    .insert(Prefix::from(&name.local[..]), Namespace::from(value));
            }
        }

        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn lookup_prefix(&self, prefix: &Prefix) -> Option<Namespace> {
        self.scopes
            .last()
            .and_then(|s| s.prefixes.get(prefix).cloned())
    }

    /// Resolves an element name.  An element with no prefix takes on the current
    /// default namespace, per the XML namespaces recommendation.
    pub fn resolve_element(&self, name: &QualName) -> QualName {
        let resolved_ns = match &name.prefix {
            None => self
                .scopes
                .last()
                .and_then(|s| s.default_ns.clone())
                .unwrap_or_else(|| ns!()),
            Some(p) if &p[..] == "xml" => Namespace::from(XML_URI),
            Some(p) => self.lookup_prefix(p).unwrap_or_else(|| ns!()),
        };

        QualName::new(name.prefix.clone(), resolved_ns, name.local.clone())
    }

    /// Resolves an attribute name.  Unprefixed attributes never inherit the
    /// default namespace; `xmlns`/`xmlns:*` declarations resolve to the reserved
    /// XML namespaces URI so downstream code can recognize and skip them.
    pub fn resolve_attribute(&self, name: &QualName) -> QualName {
        if name.prefix.is_none() && &name.local[..] == "xmlns" {
            return QualName::new(None, Namespace::from(XMLNS_URI), name.local.clone());
        }

        match &name.prefix {
            None => QualName::new(None, ns!(), name.local.clone()),
            Some(p) if &p[..] == "xmlns" => {
                QualName::new(name.prefix.clone(), Namespace::from(XMLNS_URI), name.local.clone())
            }
            Some(p) if &p[..] == "xml" => {
                QualName::new(name.prefix.clone(), Namespace::from(XML_URI), name.local.clone())
            }
            Some(p) => {
                let uri = self.lookup_prefix(p).unwrap_or_else(|| ns!());
                QualName::new(name.prefix.clone(), uri, name.local.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup5ever::{expanded_name, LocalName};

    fn qname(prefix: Option<&str>, local: &str) -> QualName {
        QualName::new(prefix.map(Prefix::from), ns!(), LocalName::from(local))
    }

    #[test]
    fn resolves_default_namespace() {
        let mut stack = NamespaceStack::new();
        let svg_tag = qname(None, "svg");
        let xmlns_attr = qname(None, "xmlns");

        stack.push_scope(std::iter::once((&xmlns_attr, "http://www.w3.org/2000/svg")));

        let resolved = stack.resolve_element(&svg_tag);
        assert_eq!(resolved.expanded(), expanded_name!(svg "svg"));
    }

    #[test]
    fn resolves_prefixed_namespace_and_inherits_into_children() {
        let mut stack = NamespaceStack::new();
        let xlink_decl = qname(Some("xmlns"), "xlink");

        stack.push_scope(std::iter::once((
            &xlink_decl,
            "http://www.w3.org/1999/xlink",
        )));
        stack.push_scope(std::iter::empty());

        let href = qname(Some("xlink"), "href");
        let resolved = stack.resolve_attribute(&href);
        assert_eq!(resolved.expanded(), expanded_name!(xlink "href"));

        stack.pop_scope();
        stack.pop_scope();
    }

    #[test]
    fn unprefixed_attribute_has_no_namespace() {
        let stack = NamespaceStack::new();
        let attr = qname(None, "width");
        assert_eq!(stack.resolve_attribute(&attr).expanded(), expanded_name!("", "width"));
    }
}
