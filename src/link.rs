//! External chapter links.
//!
//! A reference such as `"John 3"` maps to
//! `<base>/bible/<translation id>/JHN.3.<translation>`. References whose
//! book is unknown to the canon fall back to the service's search page.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::canon::Canon;
use crate::scripture::{split_chapter, split_references};

/// Where chapter links point.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LinkConfig {
    pub base_url: String,
    pub translation_id: u32,
    pub translation: String,
}

impl Default for LinkConfig {
    fn default() -> LinkConfig {
        LinkConfig {
            base_url: "https://www.bible.com".into(),
            translation_id: 1,
            translation: "KJV".into(),
        }
    }
}

impl LinkConfig {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn search(&self, query: &str) -> String {
        let q: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}/search/bible?q={}", self.base(), q)
    }
}

/// Returns the link for the first reference in `query`.
pub fn chapter_link(query: &str, canon: &Canon, config: &LinkConfig) -> String {
    let first = match split_references(query).first() {
        Some(r) => *r,
        None => return config.base().to_owned(),
    };

    let (book, chapter) = split_chapter(first);
    let chapter: String = chapter.chars().take_while(|c| c.is_ascii_digit()).collect();
    match canon.code_for(book) {
        Some(code) if !chapter.is_empty() => format!(
            "{}/bible/{}/{}.{}.{}",
            config.base(),
            config.translation_id,
            code,
            chapter,
            config.translation
        ),
        _ => config.search(first),
    }
}
