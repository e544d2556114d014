//! Discover view: the "what's new" page widgets.
//!
//! The feed concatenates three widgets in a fixed order: trending articles,
//! new threads, then new resources.

use crate::Result;
use crate::extract::resources::{ResourceLayout, extract_resource};
use crate::extract::{Extraction, View, icon_sibling_text, prefix_base};
use crate::model::{DiscoverItem, NewThreads, TrendingContent};
use crate::parse::{Document, Element};
use crate::siteconfig::SiteConfig;

const TRENDING: &str = "div[data-widget-definition='trending_content'] \
                        article.message.message--article.message--articlePreview";
const NEW_THREADS: &str = "div[data-widget-definition='new_threads'] div.structItem";
const NEW_RESOURCES: &str = "div[data-widget-definition='xfrm_new_resources'] div.structItem";

/// The widget shows the version as a bare muted span.
const WIDGET: ResourceLayout = ResourceLayout { title: "div.structItem-title a", version: "span.u-muted" };

/// Extraction for the `whats-new/` page.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoverView;

impl Extraction for DiscoverView {
    type Record = DiscoverItem;

    const VIEW: View = View::Discover;

    fn extract(doc: &Document, site: &SiteConfig) -> Result<Vec<DiscoverItem>> {
        let mut items = Vec::new();

        for article in doc.select(TRENDING)? {
            items.push(DiscoverItem::Trending(extract_trending(&article, site)?));
        }
        let trending = items.len();

        for thread in doc.select(NEW_THREADS)? {
            items.push(DiscoverItem::NewThread(extract_thread(&thread, site)?));
        }
        let threads = items.len() - trending;

        for resource in doc.select(NEW_RESOURCES)? {
            items.push(DiscoverItem::Resource(extract_resource(&resource, site, WIDGET)?));
        }

        tracing::debug!(
            view = %Self::VIEW,
            trending,
            threads,
            resources = items.len() - trending - threads,
            "extracted discover feed"
        );
        Ok(items)
    }
}

fn extract_trending(article: &Element<'_>, site: &SiteConfig) -> Result<TrendingContent> {
    let avatar = article.select_attr("a.avatar.avatar--xxs img", "src")?;

    Ok(TrendingContent {
        title: article.select_text("h2.articlePreview-title a")?,
        content: article.select_text("div.bbWrapper")?,
        preview_image: article.select_attr("a.articlePreview-image img", "src")?,
        author_name: article.select_text("li.articlePreview-by")?,
        author_avatar: prefix_base(&site.base_url, &avatar),
        reply_number: icon_sibling_text(article, &site.icons.reply)?.unwrap_or_default(),
        time: article.select_text("time.u-dt")?,
    })
}

fn extract_thread(thread: &Element<'_>, site: &SiteConfig) -> Result<NewThreads> {
    let avatar = thread.select_attr("div.node-extra-icon img", "src")?;
    let label = thread.select_text("span.label")?;

    Ok(NewThreads {
        title: thread.select_text("div.structItem-title a")?,
        author_name: thread.select_text("div.node-extra-user a")?,
        author_avatar: prefix_base(&site.base_url, &avatar),
        label: Some(label).filter(|l| !l.is_empty()),
        watch: icon_sibling_text(thread, &site.icons.watch)?,
        reply: icon_sibling_text(thread, &site.icons.reply)?,
        time: thread.select_text("time.structItem-latestDate.u-dt")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resource;
    use pretty_assertions::assert_eq;

    fn page(site: &SiteConfig) -> String {
        format!(
            r#"
            <div data-widget-definition="trending_content">
                <article class="message message--article message--articlePreview">
                    <a class="articlePreview-image"><img src="https://img.example.com/cover.jpg"></a>
                    <h2 class="articlePreview-title"><a href="/threads/1/">手环 9 评测</a></h2>
                    <div class="bbWrapper">续航 <b>两周</b></div>
                    <ul>
                        <li class="articlePreview-by"><a class="avatar avatar--xxs"><img src="data/avatars/xxs/1.jpg"></a>评测君</li>
                        <li><time class="u-dt">昨天 20:15</time></li>
                        <li><img src="{reply}"><span>88</span></li>
                    </ul>
                </article>
            </div>
            <div data-widget-definition="new_threads">
                <div class="structItem structItem--thread">
                    <div class="structItem-title"><span class="label">求助</span><a href="/threads/2/">表盘无法安装</a></div>
                    <div class="node-extra-icon"><img src="data/avatars/s/2.jpg"></div>
                    <div class="node-extra-user"><a>新手</a></div>
                    <ul>
                        <li><img src="{watch}"><span>120</span></li>
                        <li><img src="{reply}"><span>3</span></li>
                    </ul>
                    <time class="structItem-latestDate u-dt">5 分钟前</time>
                </div>
                <div class="structItem structItem--thread">
                    <div class="structItem-title"><a href="/threads/3/">安静的帖子</a></div>
                    <time class="structItem-latestDate u-dt">刚刚</time>
                </div>
            </div>
            <div data-widget-definition="xfrm_new_resources">
                <div class="structItem">
                    <div class="structItem-title"><a>字体包</a><span class="u-muted">1.0</span></div>
                </div>
            </div>
            "#,
            reply = site.icons.reply,
            watch = site.icons.watch,
        )
    }

    #[test]
    fn test_feed_order_and_variants() {
        let site = SiteConfig::default();
        let doc = Document::parse(&page(&site)).unwrap();
        let items = DiscoverView::extract(&doc, &site).unwrap();

        let titles: Vec<_> = items.iter().map(DiscoverItem::title).collect();
        assert_eq!(titles, ["手环 9 评测", "表盘无法安装", "安静的帖子", "字体包"]);
        assert!(matches!(items[0], DiscoverItem::Trending(_)));
        assert!(matches!(items[3], DiscoverItem::Resource(_)));
    }

    #[test]
    fn test_trending_fields() {
        let site = SiteConfig::default();
        let doc = Document::parse(&page(&site)).unwrap();
        let items = DiscoverView::extract(&doc, &site).unwrap();

        assert_eq!(
            items[0],
            DiscoverItem::Trending(TrendingContent {
                title: "手环 9 评测".to_string(),
                content: "续航 两周".to_string(),
                preview_image: "https://img.example.com/cover.jpg".to_string(),
                author_name: "评测君".to_string(),
                author_avatar: "https://www.bandbbs.cn/data/avatars/xxs/1.jpg".to_string(),
                reply_number: "88".to_string(),
                time: "昨天 20:15".to_string(),
            })
        );
    }

    #[test]
    fn test_thread_optional_fields() {
        let site = SiteConfig::default();
        let doc = Document::parse(&page(&site)).unwrap();
        let items = DiscoverView::extract(&doc, &site).unwrap();

        assert_eq!(
            items[1],
            DiscoverItem::NewThread(NewThreads {
                title: "表盘无法安装".to_string(),
                author_name: "新手".to_string(),
                author_avatar: "https://www.bandbbs.cn/data/avatars/s/2.jpg".to_string(),
                label: Some("求助".to_string()),
                watch: Some("120".to_string()),
                reply: Some("3".to_string()),
                time: "5 分钟前".to_string(),
            })
        );

        assert_eq!(
            items[2],
            DiscoverItem::NewThread(NewThreads {
                title: "安静的帖子".to_string(),
                time: "刚刚".to_string(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_widget_resource_version() {
        let site = SiteConfig::default();
        let doc = Document::parse(&page(&site)).unwrap();
        let items = DiscoverView::extract(&doc, &site).unwrap();

        assert_eq!(
            items[3],
            DiscoverItem::Resource(Resource {
                title: "字体包".to_string(),
                version: "1.0".to_string(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_widgets_outside_their_container_are_ignored() {
        let doc = Document::parse(r#"<div class="structItem"><div class="structItem-title"><a>x</a></div></div>"#)
            .unwrap();
        assert!(DiscoverView::extract(&doc, &SiteConfig::default()).unwrap().is_empty());
    }
}
