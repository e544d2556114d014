use crate::error::{BbsError, Result};
use crate::fetch::FetchConfig;
use std::collections::HashMap;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.bandbbs.cn/";
pub const DEFAULT_LOGIN_URL: &str = "https://bandbbs.cn";
const ICON_ROOT: &str = "https://static.cloudflare.ltd/Bandbbs_CDN/styles/bandbbs_new_svg/";

/// Represents a single site directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Forum host and page locations
    BaseUrl(String),
    HomePath(String),
    ResourcesPath(String),
    DiscoverPath(String),
    LoginUrl(String),

    /// Icon images whose parent holds a counter
    IconReply(String),
    IconWatch(String),
    IconStar(String),
    IconDownload(String),

    /// HTTP configuration
    Timeout(u64),
    UserAgent(String),
    HttpHeader(String, String),
}

/// Absolute URLs of the icons used to locate counters in list rows.
///
/// The forum renders counts as `<img src=ICON><span>COUNT</span>` pairs with
/// no distinguishing class, so the icon URL is the only stable anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    pub reply: String,
    pub watch: String,
    pub star: String,
    pub download: String,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            reply: format!("{}reply.svg", ICON_ROOT),
            watch: format!("{}watch.svg", ICON_ROOT),
            star: format!("{}star.svg", ICON_ROOT),
            download: format!("{}download.svg", ICON_ROOT),
        }
    }
}

/// Site configuration for the forum being scraped
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Forum root, always ending in `/`
    pub base_url: String,

    /// Page paths relative to `base_url`
    pub home_path: String,
    pub resources_path: String,
    pub discover_path: String,

    /// Page opened by the external login view
    pub login_url: String,

    pub icons: IconSet,

    /// HTTP overrides
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub http_headers: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            home_path: String::new(),
            resources_path: "resources/".to_string(),
            discover_path: "whats-new/".to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            icons: IconSet::default(),
            timeout: None,
            user_agent: None,
            http_headers: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Create a config for the default forum
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the default config with every directive applied in order
    pub fn from_directives(directives: impl IntoIterator<Item = Directive>) -> Self {
        let mut config = Self::default();
        config.apply_all(directives);
        config
    }

    /// Apply a directive to this config; later directives win
    pub fn add_directive(&mut self, directive: Directive) {
        match directive {
            Directive::BaseUrl(url) => self.set_base_url(&url),
            Directive::HomePath(path) => self.home_path = path,
            Directive::ResourcesPath(path) => self.resources_path = path,
            Directive::DiscoverPath(path) => self.discover_path = path,
            Directive::LoginUrl(url) => self.login_url = url,

            Directive::IconReply(url) => self.icons.reply = url,
            Directive::IconWatch(url) => self.icons.watch = url,
            Directive::IconStar(url) => self.icons.star = url,
            Directive::IconDownload(url) => self.icons.download = url,

            Directive::Timeout(secs) => self.timeout = Some(secs),
            Directive::UserAgent(ua) => self.user_agent = Some(ua),
            Directive::HttpHeader(name, value) => {
                self.http_headers.insert(name, value);
            }
        }
    }

    pub fn apply_all(&mut self, directives: impl IntoIterator<Item = Directive>) {
        for directive in directives {
            self.add_directive(directive);
        }
    }

    /// Set the forum root, appending the trailing slash relative paths need
    pub fn set_base_url(&mut self, url: &str) {
        let mut base = url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.base_url = base;
    }

    /// Resolve a page path against the base URL
    pub fn page_url(&self, path: &str) -> Result<String> {
        let base = Url::parse(&self.base_url).map_err(|e| BbsError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        let url = base
            .join(path)
            .map_err(|e| BbsError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;
        Ok(url.to_string())
    }

    /// HTTP settings derived from this config
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(ua) = &self.user_agent {
            config.user_agent = ua.clone();
        }
        config.headers = self.http_headers.clone();
        config
    }
}

/// Parse a directive line of the form `key: value`
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(BbsError::SiteConfigError("Empty or comment line".to_string()));
    }

    let Some((key, value)) = line.split_once(':') else {
        return Err(BbsError::SiteConfigError(format!("Invalid directive format: {}", line)));
    };
    let key = key.trim();
    let value = value.trim().to_string();

    match key {
        "base_url" => Ok(Directive::BaseUrl(value)),
        "home_path" => Ok(Directive::HomePath(value)),
        "resources_path" => Ok(Directive::ResourcesPath(value)),
        "discover_path" => Ok(Directive::DiscoverPath(value)),
        "login_url" => Ok(Directive::LoginUrl(value)),

        "icon_reply" => Ok(Directive::IconReply(value)),
        "icon_watch" => Ok(Directive::IconWatch(value)),
        "icon_star" => Ok(Directive::IconStar(value)),
        "icon_download" => Ok(Directive::IconDownload(value)),

        "timeout" => {
            let secs = value
                .parse::<u64>()
                .map_err(|_| BbsError::SiteConfigError(format!("Invalid timeout value: {}", value)))?;
            Ok(Directive::Timeout(secs))
        }
        "user_agent" => Ok(Directive::UserAgent(value)),

        _ => match key.strip_prefix("http_header(").and_then(|name| name.strip_suffix(')')) {
            Some(name) if !name.is_empty() => Ok(Directive::HttpHeader(name.to_string(), value)),
            Some(_) => Err(BbsError::SiteConfigError(format!("Invalid http_header format: {}", key))),
            None => Err(BbsError::SiteConfigError(format!("Unknown directive: {}", key))),
        },
    }
}
