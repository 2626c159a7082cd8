//! Bento CDN resource URLs.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Prefix of per-component Bento stylesheets.
pub const BENTO_STYLESHEET_PREFIX: &str = "https://cdn.ampproject.org/v0/bento-";
/// Prefix of per-component Bento scripts.
pub const BENTO_SCRIPT_PREFIX: &str = "https://cdn.ampproject.org/v0/bento";
/// The shared Bento runtime, in both module and nomodule builds.
pub const BENTO_RUNTIME_SCRIPTS: [&str; 2] = [
    "https://cdn.ampproject.org/bento.mjs",
    "https://cdn.ampproject.org/bento.js",
];

// bento-<name>-<major>.<minor>.(js|mjs|css); the name match is lazy so `-1.0` is the version.
static COMPONENT_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(bento-.*?)-\d+\.\d+\.(?:m?js|css)").expect("component filename pattern")
});

/// Component name encoded in a Bento CDN script or stylesheet URL.
///
/// `https://cdn.ampproject.org/v0/bento-accordion-1.0.css` gives `bento-accordion`.
/// Trailing slashes are ignored when picking the filename. Returns `None` for URLs that do
/// not parse or whose filename lacks a version segment.
pub fn bento_component_name_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let filename = url.path().trim_end_matches('/').rsplit('/').next()?;
    let captures = COMPONENT_FILENAME.captures(filename)?;
    Some(captures.get(1)?.as_str().to_string())
}

pub fn is_bento_runtime_script(src: &str) -> bool {
    BENTO_RUNTIME_SCRIPTS.contains(&src)
}
