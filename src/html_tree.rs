//! Typed queries over a parsed HTML page.
//!
//! `tl` exposes a flat node arena plus raw child handles. Extraction code never
//! touches those directly: it walks [`Element`]s whose accessors return
//! `Option` whenever something may be missing from the page.

use crate::error::ExtractError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tl::{HTMLTag, NodeHandle, Parser, VDom};

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

pub struct HtmlDocument<'a> {
    dom: VDom<'a>,
}

impl<'a> HtmlDocument<'a> {
    pub fn parse(html: &'a str) -> Result<Self, ExtractError> {
        let dom = tl::parse(html, tl::ParserOptions::default())
            .map_err(|e| ExtractError::Html(e.to_string()))?;
        Ok(Self { dom })
    }

    /// Top-level elements of the document.
    pub fn roots(&self) -> Vec<Element<'_, 'a>> {
        let parser = self.dom.parser();
        self.dom
            .children()
            .iter()
            .filter_map(|handle| Element::from_handle(*handle, parser))
            .collect()
    }

    /// Every element in document order (pre-order).
    ///
    /// `VDom::nodes` stores children before their parents, so the walk starts
    /// from the root handles instead.
    pub fn elements(&self) -> Vec<Element<'_, 'a>> {
        let mut out = Vec::new();
        for root in self.roots() {
            out.push(root);
            root.collect_descendants(&mut out);
        }
        out
    }

    pub fn find_first<'d, P>(&'d self, predicate: P) -> Option<Element<'d, 'a>>
    where
        P: Fn(&Element<'d, 'a>) -> bool,
    {
        self.elements().into_iter().find(|element| predicate(element))
    }

    pub fn find_all<'d, P>(&'d self, predicate: P) -> Vec<Element<'d, 'a>>
    where
        P: Fn(&Element<'d, 'a>) -> bool,
    {
        self.elements()
            .into_iter()
            .filter(|element| predicate(element))
            .collect()
    }
}

/// A tag node together with the parser needed to resolve its children.
#[derive(Clone, Copy)]
pub struct Element<'d, 'a> {
    handle: NodeHandle,
    tag: &'d HTMLTag<'a>,
    parser: &'d Parser<'a>,
}

impl fmt::Debug for Element<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name())
            .field("id", &self.id())
            .finish()
    }
}

impl<'d, 'a> Element<'d, 'a> {
    fn from_handle(handle: NodeHandle, parser: &'d Parser<'a>) -> Option<Self> {
        let tag = handle.get(parser)?.as_tag()?;
        Some(Self {
            handle,
            tag,
            parser,
        })
    }

    pub fn name(&self) -> String {
        self.tag.name().as_utf8_str().to_ascii_lowercase()
    }

    pub fn is(&self, tag_name: &str) -> bool {
        self.tag.name().as_utf8_str().eq_ignore_ascii_case(tag_name)
    }

    pub fn is_with_class(&self, tag_name: &str, class: &str) -> bool {
        self.is(tag_name) && self.has_class(class)
    }

    /// Attribute value with HTML entities decoded. `None` when the attribute
    /// is absent or has no value.
    pub fn attribute(&self, name: &'static str) -> Option<String> {
        self.tag
            .attributes()
            .get(name)
            .flatten()
            .map(|value| decode_entities(&value.as_utf8_str()))
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    /// Whether `class` is one of the whitespace-separated class tokens.
    pub fn has_class(&self, class: &str) -> bool {
        self.tag
            .attributes()
            .class()
            .map(|value| {
                value
                    .as_utf8_str()
                    .split_whitespace()
                    .any(|token| token == class)
            })
            .unwrap_or(false)
    }

    fn child_handles(&self) -> Vec<NodeHandle> {
        self.tag.children().top().iter().copied().collect()
    }

    /// Direct element children, skipping text and comment nodes.
    pub fn children(&self) -> Vec<Element<'d, 'a>> {
        self.child_handles()
            .into_iter()
            .filter_map(|handle| Element::from_handle(handle, self.parser))
            .collect()
    }

    pub fn first_child_matching<P>(&self, predicate: P) -> Option<Element<'d, 'a>>
    where
        P: Fn(&Element<'d, 'a>) -> bool,
    {
        self.children().into_iter().find(|child| predicate(child))
    }

    pub fn children_matching<P>(&self, predicate: P) -> Vec<Element<'d, 'a>>
    where
        P: Fn(&Element<'d, 'a>) -> bool,
    {
        self.children()
            .into_iter()
            .filter(|child| predicate(child))
            .collect()
    }

    /// All nested elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element<'d, 'a>> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    pub fn descendants_matching<P>(&self, predicate: P) -> Vec<Element<'d, 'a>>
    where
        P: Fn(&Element<'d, 'a>) -> bool,
    {
        self.descendants()
            .into_iter()
            .filter(|element| predicate(element))
            .collect()
    }

    fn collect_descendants(&self, out: &mut Vec<Element<'d, 'a>>) {
        for child in self.children() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Full inner text, entity-decoded and trimmed.
    pub fn text(&self) -> String {
        decode_entities(&self.tag.inner_text(self.parser))
            .trim()
            .to_string()
    }

    /// The first non-blank text node that is a direct child of this element.
    pub fn own_text(&self) -> Option<String> {
        self.child_handles()
            .into_iter()
            .filter_map(|handle| {
                handle
                    .get(self.parser)?
                    .as_raw()
                    .map(|raw| decode_entities(&raw.as_utf8_str()))
            })
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
    }

    /// Text that directly follows `child` inside this element, up to the next
    /// element sibling. Empty when `child` is not a direct child.
    pub fn text_after(&self, child: &Element<'_, '_>) -> String {
        let handles = self.child_handles();
        let Some(position) = handles
            .iter()
            .position(|handle| handle.get_inner() == child.handle.get_inner())
        else {
            return String::new();
        };

        let mut text = String::new();
        for handle in &handles[position + 1..] {
            let Some(node) = handle.get(self.parser) else {
                continue;
            };
            if node.as_tag().is_some() {
                break;
            }
            if let Some(raw) = node.as_raw() {
                text.push_str(&raw.as_utf8_str());
            }
        }
        decode_entities(&text).trim().to_string()
    }
}

/// Decodes numeric character references and the handful of named entities
/// that appear on statute pages. Unknown entities are left untouched.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    ENTITY_RE
        .replace_all(input, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };
            match decoded {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "sect" => Some('\u{00A7}'),
        _ => None,
    }
}
