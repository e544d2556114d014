//! Home view: forum categories and their sub-boards.

use crate::extract::{Extraction, View, prefix_base};
use crate::model::{Block, Extra, Node};
use crate::parse::{Document, Element};
use crate::siteconfig::SiteConfig;
use crate::Result;

/// Extraction for the forum root page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeView;

impl Extraction for HomeView {
    type Record = Block;

    const VIEW: View = View::Home;

    fn extract(doc: &Document, site: &SiteConfig) -> Result<Vec<Block>> {
        let blocks = doc
            .select(".block--category")?
            .iter()
            .map(|block| extract_block(block, site))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(view = %Self::VIEW, blocks = blocks.len(), "extracted home blocks");
        Ok(blocks)
    }
}

fn extract_block(block: &Element<'_>, site: &SiteConfig) -> Result<Block> {
    let nodes = block
        .select("div.node-body")?
        .iter()
        .map(|node| extract_node(node, site))
        .collect::<Result<Vec<_>>>()?;

    Ok(Block { name: block.select_text("h2")?, nodes })
}

fn extract_node(node: &Element<'_>, site: &SiteConfig) -> Result<Node> {
    // Threads come first and messages last in the stats row.
    let post = node.select_first("div.node-stats span")?.map(|s| s.text()).unwrap_or_default();
    let reply = node.select_last("div.node-stats span")?.map(|s| s.text()).unwrap_or_default();

    let extra = Extra {
        title: node.select_last("div.node-extra-row")?.map(|row| row.text()).unwrap_or_default(),
        avatar: prefix_base(&site.base_url, &node.select_attr(".avatar img", "src")?),
        username: node.select_text(".username")?,
        time: node.select_text(".node-extra-date")?,
    };

    Ok(Node { description: node.select_text("[data-shortcut=node-description]")?, post, reply, extra })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NODE_HTML: &str = r#"
        <div class="block block--category block--category1">
            <div class="block-header"><h2><a href="/#general.1">综合讨论</a></h2></div>
            <div class="node node--forum">
                <div class="node-body">
                    <div class="node-main">
                        <h3 class="node-title"><a href="/forums/chat.2/">灌水区</a></h3>
                        <div class="node-description" data-shortcut="node-description">随便聊聊</div>
                    </div>
                    <div class="node-stats">
                        <dl class="pairs"><dt>主题</dt><dd><span>1.2k</span></dd></dl>
                        <dl class="pairs"><dt>消息</dt><dd><span>35.6k</span></dd></dl>
                    </div>
                    <div class="node-extra">
                        <div class="node-extra-icon">
                            <a class="avatar avatar--xxs"><img src="data/avatars/s/42/42.jpg"></a>
                        </div>
                        <div class="node-extra-wrap">
                            <div class="node-extra-row"><a class="node-extra-title">手环续航怎么样</a></div>
                            <div class="node-extra-row">
                                <ul>
                                    <li class="node-extra-date"><time>12 分钟前</time></li>
                                    <li class="node-extra-user"><a class="username">小米粉</a></li>
                                </ul>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    "#;

    #[test]
    fn test_extract_full_node() {
        let doc = Document::parse(NODE_HTML).unwrap();
        let blocks = HomeView::extract(&doc, &SiteConfig::default()).unwrap();

        assert_eq!(
            blocks,
            vec![Block {
                name: "综合讨论".to_string(),
                nodes: vec![Node {
                    description: "随便聊聊".to_string(),
                    post: "1.2k".to_string(),
                    reply: "35.6k".to_string(),
                    extra: Extra {
                        title: "12 分钟前 小米粉".to_string(),
                        avatar: "https://www.bandbbs.cn/data/avatars/s/42/42.jpg".to_string(),
                        username: "小米粉".to_string(),
                        time: "12 分钟前".to_string(),
                    },
                }],
            }]
        );
    }

    #[test]
    fn test_block_without_nodes() {
        let doc = Document::parse("<div class=\"block--category\"><h2>General</h2></div>").unwrap();
        let blocks = HomeView::extract(&doc, &SiteConfig::default()).unwrap();

        assert_eq!(blocks, vec![Block { name: "General".to_string(), nodes: Vec::new() }]);
    }

    #[test]
    fn test_empty_node_degrades_to_empty_fields() {
        let doc = Document::parse(r#"<div class="block--category"><div class="node-body"></div></div>"#).unwrap();
        let blocks = HomeView::extract(&doc, &SiteConfig::default()).unwrap();

        assert_eq!(blocks[0].name, "");
        assert_eq!(blocks[0].nodes, vec![Node::default()]);
    }

    #[test]
    fn test_single_stat_fills_post_and_reply() {
        let html = r#"<div class="block--category"><div class="node-body">
            <div class="node-stats"><span>9</span></div></div></div>"#;
        let doc = Document::parse(html).unwrap();
        let node = &HomeView::extract(&doc, &SiteConfig::default()).unwrap()[0].nodes[0];

        assert_eq!(node.post, "9");
        assert_eq!(node.reply, "9");
    }

    #[test]
    fn test_page_without_categories() {
        let doc = Document::parse("<html><body><p>maintenance</p></body></html>").unwrap();
        assert!(HomeView::extract(&doc, &SiteConfig::default()).unwrap().is_empty());
    }
}
