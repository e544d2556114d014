//! Selector pipelines turning forum pages into records.
//!
//! Each view has one fixed pipeline: select a root container, then read
//! text or a `src` attribute from fixed child selectors. Nothing is parsed
//! numerically, deduplicated, or reordered: records come out in document
//! order, and a selector miss yields an empty field rather than an error.
//!
//! # Example
//!
//! ```rust
//! use bandbbs_core::extract::{Extraction, HomeView};
//! use bandbbs_core::{Document, SiteConfig};
//!
//! let html = r#"<div class="block block--category"><h2>General</h2></div>"#;
//! let doc = Document::parse(html).unwrap();
//!
//! let blocks = HomeView::extract(&doc, &SiteConfig::default()).unwrap();
//! assert_eq!(blocks[0].name, "General");
//! assert!(blocks[0].nodes.is_empty());
//! ```

pub mod discover;
pub mod home;
pub mod resources;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{Block, DiscoverItem, Resource};
use crate::parse::{Document, Element, join_texts};
use crate::siteconfig::SiteConfig;
use crate::{BbsError, Result};

pub use discover::DiscoverView;
pub use home::HomeView;
pub use resources::ResourcesView;

/// A typed extraction routine for one page of the forum.
pub trait Extraction: Send + Sync + 'static {
    type Record: Clone + fmt::Debug + Serialize + Send + Sync + 'static;

    /// Which view this routine serves.
    const VIEW: View;

    /// Run the selector pipeline over a parsed page.
    fn extract(doc: &Document, site: &SiteConfig) -> Result<Vec<Self::Record>>;
}

/// The destinations of the client.
///
/// `Profile` has no page to scrape: it hands off to the external login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Resources,
    Discover,
    Profile,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Resources, View::Discover, View::Profile];

    pub fn route(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Resources => "resource",
            View::Discover => "discover",
            View::Profile => "profile",
        }
    }

    /// Display label used by the forum's own navigation.
    pub fn label(self) -> &'static str {
        match self {
            View::Home => "首页",
            View::Resources => "资源",
            View::Discover => "发现",
            View::Profile => "我的",
        }
    }

    /// Page path relative to the base URL; `None` for views without a page.
    pub fn path(self, site: &SiteConfig) -> Option<&str> {
        match self {
            View::Home => Some(&site.home_path),
            View::Resources => Some(&site.resources_path),
            View::Discover => Some(&site.discover_path),
            View::Profile => None,
        }
    }

    /// Absolute URL this view loads, or the login URL for `Profile`.
    pub fn page_url(self, site: &SiteConfig) -> Result<String> {
        match self.path(site) {
            Some(path) => site.page_url(path),
            None => Ok(site.login_url.clone()),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" | "index" => Ok(Self::Home),
            "resource" | "resources" => Ok(Self::Resources),
            "discover" | "whats-new" => Ok(Self::Discover),
            "profile" | "login" => Ok(Self::Profile),
            _ => Err(format!(
                "Invalid view: {}. Valid options: home, resources, discover, profile",
                s
            )),
        }
    }
}

/// Records of any scrapable view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "records", rename_all = "snake_case")]
pub enum ViewData {
    Home(Vec<Block>),
    #[serde(rename = "resource")]
    Resources(Vec<Resource>),
    Discover(Vec<DiscoverItem>),
}

impl ViewData {
    pub fn len(&self) -> usize {
        match self {
            ViewData::Home(records) => records.len(),
            ViewData::Resources(records) => records.len(),
            ViewData::Discover(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run the pipeline named by `view`.
///
/// # Errors
///
/// `Profile` has no page and yields [`BbsError::InvalidUrl`].
pub fn extract_view(view: View, doc: &Document, site: &SiteConfig) -> Result<ViewData> {
    match view {
        View::Home => HomeView::extract(doc, site).map(ViewData::Home),
        View::Resources => ResourcesView::extract(doc, site).map(ViewData::Resources),
        View::Discover => DiscoverView::extract(doc, site).map(ViewData::Discover),
        View::Profile => Err(BbsError::InvalidUrl(format!(
            "the profile view opens {} in a browser and has nothing to extract",
            site.login_url
        ))),
    }
}

/// Prefix a relative URL with the forum base.
///
/// An empty value stays empty. Otherwise this is plain concatenation: the
/// forum emits avatar and icon paths relative to its root.
pub fn prefix_base(base: &str, value: &str) -> String {
    if value.is_empty() { String::new() } else { format!("{}{}", base, value) }
}

/// Text of the counter sitting next to an icon image.
///
/// Finds the first `<img>` under `scope` whose `src` equals `icon_url`,
/// steps to its parent, and joins the text of every `<span>` inside it,
/// the parent itself included.
/// `None` when the icon is absent.
pub(crate) fn icon_sibling_text(scope: &Element<'_>, icon_url: &str) -> Result<Option<String>> {
    let selector = format!("img[src=\"{}\"]", css_string(icon_url));

    let Some(icon) = scope.select_first(&selector)? else {
        return Ok(None);
    };

    let Some(parent) = icon.parent() else {
        return Ok(None);
    };

    // A `<span>` parent counts as one of its own matches.
    let mut spans = parent.select("span")?;
    if parent.tag_name() == "span" {
        spans.insert(0, parent);
    }

    Ok(Some(join_texts(&spans)))
}

fn css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
