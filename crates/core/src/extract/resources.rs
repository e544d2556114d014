//! Resources view: the resource manager listing.

use crate::Result;
use crate::extract::{Extraction, View, icon_sibling_text, prefix_base};
use crate::model::Resource;
use crate::parse::{Document, Element};
use crate::siteconfig::SiteConfig;

/// Selectors that differ between the listing page and the discover widget.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResourceLayout {
    pub title: &'static str,
    pub version: &'static str,
}

/// Layout of rows on the `resources/` page.
pub(crate) const LISTING: ResourceLayout =
    ResourceLayout { title: ".structItem-title a", version: ".structItem-version span.u-muted" };

/// Extraction for the resource listing page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourcesView;

impl Extraction for ResourcesView {
    type Record = Resource;

    const VIEW: View = View::Resources;

    fn extract(doc: &Document, site: &SiteConfig) -> Result<Vec<Resource>> {
        let resources = doc
            .select(".structItem")?
            .iter()
            .map(|item| extract_resource(item, site, LISTING))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(view = %Self::VIEW, resources = resources.len(), "extracted resources");
        Ok(resources)
    }
}

pub(crate) fn extract_resource(item: &Element<'_>, site: &SiteConfig, layout: ResourceLayout) -> Result<Resource> {
    let icon = item.select_attr("div.structItem-iconContainer a.avatar img", "src")?;
    let author_avatar = item.select_attr("div.node-extra-icon a.avatar img", "src")?;

    Ok(Resource {
        title: item.select_text(layout.title)?,
        sub_title: item.select_text("div.structItem-resourceTagLine")?,
        version: item.select_text(layout.version)?,
        icon: prefix_base(&site.base_url, &icon),
        category: item.select_text("a.button")?,
        label: item.select_text("span.label")?,
        score: icon_sibling_text(item, &site.icons.star)?.unwrap_or_default(),
        download: icon_sibling_text(item, &site.icons.download)?.unwrap_or_default(),
        author_name: item.select_text("a.username")?,
        author_avatar: prefix_base(&site.base_url, &author_avatar),
        time: item.select_text("time")?,
    })
}
