// src/site/anchors.rs
// =============================================================================
// Extracts the anchor ids a page defines.
//
// A URL fragment "#foo" can target:
// - any element with id="foo" (headings, custom anchors, ...)
// - a legacy <a name="foo"> target
//
// Ids are compared byte-for-byte later on, so nothing is lowercased or
// decoded here.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// The anchors defined by one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    /// Every id defined in the page, stored once
    pub ids: BTreeSet<String>,
    /// Ids defined by more than one element
    pub duplicates: BTreeSet<String>,
}

impl AnchorSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Finds an id that differs from `id` only by ASCII case
    pub fn find_case_insensitive(&self, id: &str) -> Option<&str> {
        self.ids
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(id))
            .map(String::as_str)
    }
}

/// Parses `html` and collects every anchor id it defines
///
/// Example:
///   `<h2 id="setup">Setup</h2><a name="legacy"></a>`
///   -> ids = {"legacy", "setup"}
pub fn extract_anchors(html: &str) -> AnchorSet {
    let document = Html::parse_document(html);

    // Constant selector, known to be valid
    let selector = Selector::parse("[id], a[name]").expect("anchor selector is valid");

    let mut anchors = AnchorSet::default();

    for element in document.select(&selector) {
        let element = element.value();

        // <a id="x" name="x"> defines "x" once, not twice
        let mut names: Vec<&str> = Vec::with_capacity(2);
        if let Some(id) = element.attr("id") {
            names.push(id);
        }
        if element.name() == "a" {
            if let Some(name) = element.attr("name") {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        for name in names.into_iter().filter(|n| !n.is_empty()) {
            if !anchors.ids.insert(name.to_string()) {
                anchors.duplicates.insert(name.to_string());
            }
        }
    }

    anchors
}
