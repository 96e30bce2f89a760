//! Reference rewriting
//!
//! Points asset and hyperlink attributes of a page at the local copies of
//! their targets, so the saved page works offline. A reference is only
//! touched when its target is same-origin with the page and a local copy
//! actually exists; everything else is left exactly as it was.

use crate::document::{parse_candidate_list, AttrValue, Document, Element, TagKind};
use crate::storage::{ProjectLayout, Storage};
use crate::url::{is_same_origin, strip_fragment};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Characters escaped in rewritten local references
const LOCAL_HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Rewrites a document's references to point at local copies
///
/// `asset_map` holds the paths of assets downloaded for this page; any other
/// same-origin reference is located through the path mapper.
///
/// Returns the number of references rewritten.
pub fn rewrite_references<S: Storage>(
    document: &mut Document,
    page_url: &Url,
    layout: &ProjectLayout,
    storage: &S,
    asset_map: Option<&HashMap<Url, PathBuf>>,
) -> usize {
    let page_path = layout.local_path(page_url, None);
    let rewriter = Rewriter {
        page_url,
        page_dir: page_path.parent().unwrap_or(layout.root()),
        layout,
        storage,
        asset_map,
    };

    let mut rewritten = 0;
    document.for_each_element_mut(|element| {
        if let Some(kind) = element.kind() {
            rewritten += rewriter.rewrite_element(element, kind);
        }
    });

    if rewritten > 0 {
        tracing::debug!("Rewrote {} references in {}", rewritten, page_url);
    }
    rewritten
}

struct Rewriter<'a, S> {
    page_url: &'a Url,
    page_dir: &'a Path,
    layout: &'a ProjectLayout,
    storage: &'a S,
    asset_map: Option<&'a HashMap<Url, PathBuf>>,
}

impl<S: Storage> Rewriter<'_, S> {
    fn rewrite_element(&self, element: &mut Element, kind: TagKind) -> usize {
        let mut rewritten = 0;

        if let Some(attr) = kind.reference_attr() {
            let reference = element
                .attr_value(attr)
                .and_then(|value| value.first().map(str::to_owned));
            let replacement = reference.and_then(|reference| self.rewrite_reference(&reference, kind));
            if let Some(replacement) = replacement {
                element.set_attr_value(attr, AttrValue::Single(replacement));
                rewritten += 1;
            }
        }

        if let Some(attr) = kind.candidate_list_attr() {
            if let Some(value) = element.attr_value(attr) {
                let (entries, count) = self.rewrite_candidate_list(&value.joined());
                if !entries.is_empty() {
                    element.set_attr_value(attr, AttrValue::Single(entries.join(", ")));
                }
                rewritten += count;
            }
        }

        rewritten
    }

    /// Returns the replacement for a single reference, if it should change
    fn rewrite_reference(&self, reference: &str, kind: TagKind) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() || reference.starts_with('#') {
            return None;
        }

        let absolute = self.resolve_same_origin(reference)?;
        let href = self.local_href(&absolute)?;

        // Anchors keep their fragment so in-page targets still work offline
        match absolute.fragment() {
            Some(fragment) if kind == TagKind::Anchor => Some(format!("{}#{}", href, fragment)),
            _ => Some(href),
        }
    }

    /// Rewrites each candidate of a list, keeping descriptors
    fn rewrite_candidate_list(&self, value: &str) -> (Vec<String>, usize) {
        let mut rewritten = 0;
        let entries = parse_candidate_list(value)
            .into_iter()
            .map(|candidate| {
                let local = self
                    .resolve_same_origin(candidate.url)
                    .and_then(|absolute| self.local_href(&absolute));

                match local {
                    Some(href) => {
                        rewritten += 1;
                        format!("{} {}", href, candidate.descriptor)
                            .trim_end()
                            .to_string()
                    }
                    None if candidate.descriptor.is_empty() => candidate.url.to_string(),
                    None => format!("{} {}", candidate.url, candidate.descriptor),
                }
            })
            .collect();

        (entries, rewritten)
    }

    fn resolve_same_origin(&self, reference: &str) -> Option<Url> {
        let absolute = self.page_url.join(reference).ok()?;
        is_same_origin(self.page_url, &absolute).then_some(absolute)
    }

    /// Returns the page-relative reference to the local copy of `url`
    fn local_href(&self, url: &Url) -> Option<String> {
        let key = strip_fragment(url);
        let local_path = self
            .asset_map
            .and_then(|map| map.get(&key).cloned())
            .unwrap_or_else(|| self.layout.local_path(&key, None));

        if !self.storage.exists(&local_path) {
            return None;
        }

        let href = match pathdiff::diff_paths(&local_path, self.page_dir) {
            Some(relative) => slash_path(&relative),
            None => {
                let from_root = local_path
                    .strip_prefix(self.layout.root())
                    .unwrap_or(&local_path);
                format!("/{}", slash_path(from_root))
            }
        };

        Some(utf8_percent_encode(&href, LOCAL_HREF).to_string())
    }
}

/// Joins path components with forward slashes
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::RootDir => Some(String::new()),
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
