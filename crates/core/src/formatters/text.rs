use crate::extract::View;
use crate::model::{Block, DiscoverItem, NewThreads, Resource, TrendingContent};

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Include a header naming the view and page
    pub include_header: bool,

    /// Truncate long fields (in characters) at the specified width (0 = no limit)
    pub line_width: usize,
}

/// Records that can be listed as plain text.
pub trait TextRender {
    /// Append the lines for this record to `out`.
    fn render(&self, out: &mut Vec<String>, config: &TextConfig);
}

/// Plain text formatter for listing scraped records
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert<T: TextRender>(&self, view: View, source_url: &str, records: &[T]) -> String {
        convert_to_text(view, source_url, records, &self.config)
    }
}

/// Convert records to plain text with specified configuration
pub fn convert_to_text<T: TextRender>(view: View, source_url: &str, records: &[T], config: &TextConfig) -> String {
    let mut lines = Vec::new();

    if config.include_header {
        lines.extend(generate_header(view, source_url, records.len()));
        lines.push(String::new());
    }

    for record in records {
        record.render(&mut lines, config);
    }

    lines.join("\n").trim_end().to_string()
}

fn generate_header(view: View, source_url: &str, count: usize) -> Vec<String> {
    let title = format!("{} ({})", view.label(), view.route());
    let rule = "=".repeat(title.chars().count());

    vec![title, rule, format!("Source: {source_url}"), format!("Records: {count}")]
}

/// Join non-empty `label value` pairs with " | ".
fn pairs(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| if label.is_empty() { value.to_string() } else { format!("{label} {value}") })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn clip(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }

    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

fn or_untitled(title: &str) -> &str {
    if title.is_empty() { "(untitled)" } else { title }
}

impl TextRender for Block {
    fn render(&self, out: &mut Vec<String>, config: &TextConfig) {
        out.push(format!("# {}", or_untitled(&self.name)));

        for node in &self.nodes {
            let stats = pairs(&[("threads", node.post.as_str()), ("messages", node.reply.as_str())]);
            let description = clip(&node.description, config.line_width);
            out.push(if stats.is_empty() { format!("  - {description}") } else { format!("  - {description} [{stats}]") });

            let extra = &node.extra;
            let latest = pairs(&[("", extra.title.as_str()), ("by", extra.username.as_str()), ("at", extra.time.as_str())]);
            if !latest.is_empty() {
                out.push(format!("    latest: {}", clip(&latest, config.line_width)));
            }
        }

        out.push(String::new());
    }
}

impl TextRender for Resource {
    fn render(&self, out: &mut Vec<String>, config: &TextConfig) {
        let mut heading = or_untitled(&self.title).to_string();
        if !self.version.is_empty() {
            heading.push(' ');
            heading.push_str(&self.version);
        }
        if !self.label.is_empty() {
            heading = format!("[{}] {heading}", self.label);
        }
        out.push(heading);

        if !self.sub_title.is_empty() {
            out.push(format!("    {}", clip(&self.sub_title, config.line_width)));
        }

        let meta = pairs(&[
            ("category", self.category.as_str()),
            ("score", self.score.as_str()),
            ("downloads", self.download.as_str()),
            ("by", self.author_name.as_str()),
            ("at", self.time.as_str()),
        ]);
        if !meta.is_empty() {
            out.push(format!("    {meta}"));
        }
    }
}

fn render_trending(item: &TrendingContent, out: &mut Vec<String>, config: &TextConfig) {
    out.push(format!("[trending] {}", or_untitled(&item.title)));
    if !item.content.is_empty() {
        out.push(format!("    {}", clip(&item.content, config.line_width)));
    }

    let meta = pairs(&[
        ("by", item.author_name.as_str()),
        ("replies", item.reply_number.as_str()),
        ("at", item.time.as_str()),
    ]);
    if !meta.is_empty() {
        out.push(format!("    {meta}"));
    }
}

fn render_thread(item: &NewThreads, out: &mut Vec<String>) {
    match &item.label {
        Some(label) => out.push(format!("[thread] [{label}] {}", or_untitled(&item.title))),
        None => out.push(format!("[thread] {}", or_untitled(&item.title))),
    }

    let watch = item.watch.as_deref().unwrap_or_default();
    let reply = item.reply.as_deref().unwrap_or_default();
    let meta =
        pairs(&[("by", item.author_name.as_str()), ("views", watch), ("replies", reply), ("at", item.time.as_str())]);
    if !meta.is_empty() {
        out.push(format!("    {meta}"));
    }
}

impl TextRender for DiscoverItem {
    fn render(&self, out: &mut Vec<String>, config: &TextConfig) {
        match self {
            DiscoverItem::Trending(item) => render_trending(item, out, config),
            DiscoverItem::NewThread(item) => render_thread(item, out),
            DiscoverItem::Resource(item) => {
                let start = out.len();
                item.render(out, config);
                if let Some(first) = out.get_mut(start) {
                    first.insert_str(0, "[resource] ");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Extra, Node};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_block_listing() {
        let blocks = vec![Block {
            name: "综合讨论".to_string(),
            nodes: vec![Node {
                description: "随便聊聊".to_string(),
                post: "1.2k".to_string(),
                reply: "35.6k".to_string(),
                extra: Extra {
                    title: "手环续航怎么样".to_string(),
                    username: "小米粉".to_string(),
                    time: "12 分钟前".to_string(),
                    ..Default::default()
                },
            }],
        }];

        let text = convert_to_text(View::Home, "https://www.bandbbs.cn/", &blocks, &TextConfig::default());
        assert_eq!(
            text,
            "# 综合讨论\n  - 随便聊聊 [threads 1.2k | messages 35.6k]\n    latest: 手环续航怎么样 | by 小米粉 | at 12 分钟前"
        );
    }

    #[test]
    fn test_header_counts_records() {
        let config = TextConfig { include_header: true, ..Default::default() };
        let text = convert_to_text::<Resource>(View::Resources, "https://www.bandbbs.cn/resources/", &[], &config);

        assert_eq!(text, "资源 (resource)\n=============\nSource: https://www.bandbbs.cn/resources/\nRecords: 0");
    }

    #[test]
    fn test_resource_skips_empty_fields() {
        let resource = Resource {
            title: "字体包".to_string(),
            version: "1.0".to_string(),
            label: "免费".to_string(),
            score: "4.5".to_string(),
            ..Default::default()
        };
        let text = convert_to_text(View::Resources, "", &[resource], &TextConfig::default());

        assert_eq!(text, "[免费] 字体包 1.0\n    score 4.5");
    }

    #[test]
    fn test_discover_items_are_tagged() {
        let items = vec![
            DiscoverItem::NewThread(NewThreads {
                title: "求助".to_string(),
                watch: Some("120".to_string()),
                ..Default::default()
            }),
            DiscoverItem::Resource(Resource { title: "表盘".to_string(), ..Default::default() }),
        ];
        let text = convert_to_text(View::Discover, "", &items, &TextConfig::default());

        assert_eq!(text, "[thread] 求助\n    views 120\n[resource] 表盘");
    }

    #[test]
    fn test_line_width_clips_long_fields() {
        let item = TrendingContent { title: "t".to_string(), content: "abcdefghij".to_string(), ..Default::default() };
        let config = TextConfig { line_width: 6, ..Default::default() };
        let text = convert_to_text(View::Discover, "", &[DiscoverItem::Trending(item)], &config);

        assert_eq!(text, "[trending] t\n    abc...");
    }

    #[test]
    fn test_narrow_line_width_stays_within_width() {
        assert_eq!(clip("abcdef", 1), "a");
        assert_eq!(clip("abcdef", 2), "ab");
        assert_eq!(clip("abcdef", 3), "abc");
        assert_eq!(clip("abcdef", 4), "a...");
    }

    #[test]
    fn test_untitled_records() {
        let text = convert_to_text(View::Home, "", &[Block::default()], &TextConfig::default());
        assert_eq!(text, "# (untitled)");
    }
}
