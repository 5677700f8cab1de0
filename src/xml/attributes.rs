//! Store XML element attributes and their values.

use std::slice;
use std::str;

use markup5ever::{expanded_name, QualName};
use string_cache::DefaultAtom;
use xml5ever::tokenizer::Attribute as XmlAttribute;

use crate::error::{ImplementationLimit, LoadingError};
use crate::limits;
use crate::xml::namespace::NamespaceStack;

/// Type used to store attribute values.
///
/// Attribute values are often repeated in an SVG file, so we intern them using the
/// string_cache crate.
pub type AttributeValue = DefaultAtom;

/// Iterable wrapper for a tag's attribute list, with namespaces resolved.
#[derive(Clone)]
pub struct Attributes {
    attrs: Box<[(QualName, AttributeValue)]>,
    id_idx: Option<u16>,
    class_idx: Option<u16>,
}

/// Iterator from `Attributes.iter`.
pub struct AttributesIter<'a>(slice::Iter<'a, (QualName, AttributeValue)>);

#[cfg(test)]
impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    #[cfg(test)]
    pub fn new() -> Attributes {
        Attributes {
            attrs: [].into(),
            id_idx: None,
            class_idx: None,
        }
    }

    /// Builds an `Attributes` from a tag's raw attribute list as produced by the XML
    /// tokenizer, resolving each attribute name's namespace against `ns_stack`.
    ///
    /// `ns_stack` must already have had its scope pushed for the element that owns
    /// these attributes (so that `xmlns`-declaring attributes on the element itself
    /// are visible to the resolution of its other, prefixed attributes).
    pub fn from_tag_attrs(
        raw_attrs: &[XmlAttribute],
        ns_stack: &NamespaceStack,
    ) -> Result<Attributes, LoadingError> {
        if raw_attrs.len() > limits::MAX_LOADED_ATTRIBUTES {
            return Err(LoadingError::LimitExceeded(
                ImplementationLimit::TooManyAttributes,
            ));
        }

        let mut array = Vec::with_capacity(raw_attrs.len());
        let mut id_idx = None;
        let mut class_idx = None;

        for attr in raw_attrs {
            let qual_name = ns_stack.resolve_attribute(&attr.name);

            // xmlns / xmlns:* declarations are namespace bookkeeping, not
            // regular attributes that elements or CSS selectors can see.
            if qual_name.local.as_ref() == "xmlns"
                || qual_name.prefix.as_ref().map(|p| &p[..]) == Some("xmlns")
            {
                continue;
            }

            let value_atom = DefaultAtom::from(attr.value.as_ref());

            let idx = array.len() as u16;
            match qual_name.expanded() {
                expanded_name!("", "id") => id_idx = Some(idx),
                expanded_name!("", "class") => class_idx = Some(idx),
                _ => (),
            }

            array.push((qual_name, value_atom));
        }

        Ok(Attributes {
            attrs: array.into(),
            id_idx,
            class_idx,
        })
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Creates an iterator that yields `(QualName, &'a str)` tuples.
    pub fn iter(&self) -> AttributesIter<'_> {
        AttributesIter(self.attrs.iter())
    }

    pub fn get_id(&self) -> Option<&str> {
        self.id_idx.and_then(|idx| {
            self.attrs
                .get(usize::from(idx))
                .map(|(_name, value)| &value[..])
        })
    }

    pub fn get_class(&self) -> Option<&str> {
        self.class_idx.and_then(|idx| {
            self.attrs
                .get(usize::from(idx))
                .map(|(_name, value)| &value[..])
        })
    }

    pub fn clear_class(&mut self) {
        self.class_idx = None;
    }
}

impl<'a> Iterator for AttributesIter<'a> {
    type Item = (QualName, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(a, v)| (a.clone(), v.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup5ever::{expanded_name, LocalName, Prefix};

    fn attr(prefix: Option<&str>, local: &str, value: &str) -> XmlAttribute {
        XmlAttribute {
            name: QualName::new(prefix.map(Prefix::from), markup5ever::ns!(), LocalName::from(local)),
            value: value.into(),
        }
    }

    #[test]
    fn empty_attributes() {
        let ns_stack = NamespaceStack::new();
        let map = Attributes::from_tag_attrs(&[], &ns_stack).unwrap();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn attributes_with_namespaces() {
        let xmlns_xlink = attr(Some("xmlns"), "xlink", "http://www.w3.org/1999/xlink");
        let raw_attrs = vec![
            xmlns_xlink.clone(),
            attr(Some("xlink"), "href", "1"),
            attr(None, "ry", "2"),
            attr(None, "d", ""),
        ];

        let mut ns_stack = NamespaceStack::new();
        ns_stack.push_scope(raw_attrs.iter().map(|a| (&a.name, a.value.as_ref())));

        let attrs = Attributes::from_tag_attrs(&raw_attrs, &ns_stack).unwrap();

        let mut had_href: bool = false;
        let mut had_ry: bool = false;
        let mut had_d: bool = false;

        for (a, v) in attrs.iter() {
            match a.expanded() {
                expanded_name!(xlink "href") => {
                    assert!(v == "1");
                    had_href = true;
                }

                expanded_name!("", "ry") => {
                    assert!(v == "2");
                    had_ry = true;
                }

                expanded_name!("", "d") => {
                    assert!(v.is_empty());
                    had_d = true;
                }

                _ => unreachable!(),
            }
        }

        assert!(had_href);
        assert!(had_ry);
        assert!(had_d);
    }
}
