pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod model;
pub mod parse;
pub mod screen;
pub mod siteconfig;
pub mod state;

pub use error::{BbsError, Result};
pub use extract::{DiscoverView, Extraction, HomeView, ResourcesView, View, ViewData, extract_view, prefix_base};
pub use fetch::{FetchConfig, PageSource, StaticSource, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{HttpSource, fetch_document, fetch_url};
pub use formatters::{JsonConfig, JsonFormatter, TextConfig, TextFormatter, TextRender};
pub use formatters::{convert_to_json, convert_to_text, state_to_json};
pub use model::{Block, DiscoverItem, Extra, NewThreads, Node, Resource, TrendingContent};
pub use parse::{Document, Element};
pub use screen::{Records, Screen};
pub use siteconfig::{ConfigLoader, ConfigLoaderBuilder, ConfigParser, Directive, IconSet, SiteConfig};
pub use state::LoadState;
