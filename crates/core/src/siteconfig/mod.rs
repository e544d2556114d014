pub mod directives;
pub mod loader;
pub mod parser;

pub use directives::{DEFAULT_BASE_URL, DEFAULT_LOGIN_URL, Directive, IconSet, SiteConfig};
pub use loader::{ConfigLoader, ConfigLoaderBuilder, SITE_FILE};
pub use parser::ConfigParser;
