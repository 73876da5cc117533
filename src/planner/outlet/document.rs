//! 将报告文本转换为可打印文档
//!
//! 逐行按前缀分类，生成与渲染引擎无关的 [`ReportDocument`]，
//! 再交给 [`DocumentRenderer`] 输出。

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static NUMBERED_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+\*\*(.*?)\*\*").unwrap());
static LABELLED_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \*\*(.+?)\*\*: (.+)").unwrap());

/// 文档中的一个块
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Spacer,
    Heading1(String),
    Heading2(String),
    Body(String),
    /// `- **label**: value`
    Labelled { label: String, value: String },
    /// 连续的 `- ` 行
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDocument {
    pub blocks: Vec<Block>,
}

/// 去掉标题中的emoji及其变体选择符
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let cp = *c as u32;
            !(matches!(cp, 0x1F000..=0x1FAFF)
                || matches!(cp, 0x2600..=0x27BF)
                || matches!(cp, 0x2B00..=0x2BFF)
                || cp == 0xFE0F
                || cp == 0x200D)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// 按行分类报告文本
pub fn classify_report(text: &str) -> ReportDocument {
    let mut blocks = Vec::new();
    let mut bullets: Vec<String> = Vec::new();

    let flush = |bullets: &mut Vec<String>, blocks: &mut Vec<Block>| {
        if !bullets.is_empty() {
            blocks.push(Block::Bullets(std::mem::take(bullets)));
        }
    };

    for raw in text.lines() {
        let line = raw.trim();

        if line.is_empty() {
            flush(&mut bullets, &mut blocks);
            blocks.push(Block::Spacer);
        } else if let Some(rest) = line.strip_prefix("# ") {
            flush(&mut bullets, &mut blocks);
            blocks.push(Block::Heading1(strip_emoji(rest)));
        } else if let Some(rest) = line
            .strip_prefix("## ")
            .or_else(|| line.strip_prefix("### "))
        {
            flush(&mut bullets, &mut blocks);
            blocks.push(Block::Heading2(strip_emoji(rest)));
        } else if NUMBERED_BOLD.is_match(line) {
            flush(&mut bullets, &mut blocks);
            blocks.push(Block::Body(line.replace("**", "")));
        } else if let Some(caps) = LABELLED_BULLET.captures(line) {
            flush(&mut bullets, &mut blocks);
            blocks.push(Block::Labelled {
                label: caps[1].to_string(),
                value: caps[2].to_string(),
            });
        } else if let Some(rest) = line.strip_prefix("- ") {
            bullets.push(rest.to_string());
        } else {
            flush(&mut bullets, &mut blocks);
            blocks.push(Block::Body(line.to_string()));
        }
    }
    flush(&mut bullets, &mut blocks);

    ReportDocument { blocks }
}

/// 文档渲染器，具体排版引擎隐藏在该接口之后
pub trait DocumentRenderer: Send + Sync {
    /// 输出文件扩展名
    fn extension(&self) -> &'static str;

    fn render(&self, title: &str, document: &ReportDocument, path: &Path) -> Result<()>;
}

/// A4版式的可打印HTML文档
pub struct HtmlDocumentRenderer {
    heading_color: &'static str,
}

impl Default for HtmlDocumentRenderer {
    fn default() -> Self {
        Self {
            heading_color: "#1F4E79",
        }
    }
}

const PAGE_STYLE: &str = r#"@page { size: A4; margin: 60pt 50pt 40pt 50pt; }
body { font-family: Helvetica, Arial, sans-serif; font-size: 11pt; line-height: 15pt; }
h1 { font-size: 16pt; line-height: 20pt; margin: 0 0 10pt 0; }
h2 { font-size: 13pt; line-height: 18pt; margin: 0 0 6pt 0; }
p { margin: 0; }
ul { margin: 0; padding-left: 15pt; }
.spacer { height: 10pt; }"#;

/// 转义行首的块级标记（编号、列表符、引用、标题），使其按普通文本渲染
fn escape_block_markers(text: &str) -> String {
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && text[digits..].starts_with(['.', ')']) {
        return format!("{}\\{}", &text[..digits], &text[digits..]);
    }
    let block_prefixes = ["* ", "+ ", "- ", ">", "#", "---", "***", "___"];
    if block_prefixes.iter().any(|p| text.starts_with(p)) {
        return format!("\\{}", text);
    }
    text.to_string()
}

/// 将一行正文中的行内markdown（加粗、链接等）渲染为HTML片段
fn inline_html(text: &str) -> String {
    let html = markdown::to_html(&escape_block_markers(text));
    let html = html.trim();
    html.strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .unwrap_or(html)
        .to_string()
}

impl HtmlDocumentRenderer {
    pub fn to_html(&self, title: &str, document: &ReportDocument) -> String {
        let mut html = String::new();
        // 写入String不会失败
        let _ = self.write_html(&mut html, title, document);
        html
    }

    fn write_html(
        &self,
        out: &mut String,
        title: &str,
        document: &ReportDocument,
    ) -> fmt::Result {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", inline_html(title))?;
        writeln!(
            out,
            "<style>\n{}\nh1, h2 {{ color: {}; }}\n</style>",
            PAGE_STYLE, self.heading_color
        )?;
        writeln!(out, "</head>\n<body>")?;

        for block in &document.blocks {
            match block {
                Block::Spacer => writeln!(out, "<div class=\"spacer\"></div>")?,
                Block::Heading1(text) => writeln!(out, "<h1>{}</h1>", inline_html(text))?,
                Block::Heading2(text) => writeln!(out, "<h2>{}</h2>", inline_html(text))?,
                Block::Body(text) => writeln!(out, "<p>{}</p>", inline_html(text))?,
                Block::Labelled { label, value } => writeln!(
                    out,
                    "<p><b>{}:</b> {}</p>",
                    inline_html(label),
                    inline_html(value)
                )?,
                Block::Bullets(items) => {
                    writeln!(out, "<ul>")?;
                    for item in items {
                        writeln!(out, "<li>{}</li>", inline_html(item))?;
                    }
                    writeln!(out, "</ul>")?;
                }
            }
        }

        writeln!(out, "</body>\n</html>")
    }
}

impl DocumentRenderer for HtmlDocumentRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, title: &str, document: &ReportDocument, path: &Path) -> Result<()> {
        fs::write(path, self.to_html(title, document))
            .with_context(|| format!("无法写入文档 {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_headings_strip_emoji() {
        let doc = classify_report("# ✈️ Trip to Hyderabad\n## 🌦️ Weather\n### 🏨 Hotels");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Heading1("Trip to Hyderabad".to_string()),
                Block::Heading2("Weather".to_string()),
                Block::Heading2("Hotels".to_string()),
            ]
        );
    }

    #[test]
    fn test_classify_groups_consecutive_bullets() {
        let doc = classify_report("- Carry an umbrella\n- Book metro cards\nEnjoy!\n- Last tip");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Bullets(vec![
                    "Carry an umbrella".to_string(),
                    "Book metro cards".to_string()
                ]),
                Block::Body("Enjoy!".to_string()),
                Block::Bullets(vec!["Last tip".to_string()]),
            ]
        );
    }

    #[test]
    fn test_classify_numbered_and_labelled_lines() {
        let doc = classify_report(
            "1. **Charminar** - iconic monument\n- **Flight Cost**: ₹5,200\n   \n2. Golconda",
        );
        assert_eq!(
            doc.blocks,
            vec![
                Block::Body("1. Charminar - iconic monument".to_string()),
                Block::Labelled {
                    label: "Flight Cost".to_string(),
                    value: "₹5,200".to_string()
                },
                Block::Spacer,
                Block::Body("2. Golconda".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_line_flushes_bullets_before_spacer() {
        let doc = classify_report("- a\n\n- b");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Bullets(vec!["a".to_string()]),
                Block::Spacer,
                Block::Bullets(vec!["b".to_string()]),
            ]
        );
    }

    #[test]
    fn test_strip_emoji_keeps_text_and_currency() {
        assert_eq!(strip_emoji("💰 Expense Summary (₹)"), "Expense Summary (₹)");
        assert_eq!(strip_emoji("☀️ Sunny days"), "Sunny days");
    }

    #[test]
    fn test_inline_html_renders_bold_without_paragraph() {
        assert_eq!(inline_html("Stay at **Taj Krishna**"), "Stay at <strong>Taj Krishna</strong>");
        assert_eq!(inline_html("1. Charminar"), "1. Charminar");
        assert_eq!(inline_html("Use <b> here"), "Use &lt;b&gt; here");
    }

    #[test]
    fn test_escape_block_markers() {
        assert_eq!(escape_block_markers("3. Day three"), "3\\. Day three");
        assert_eq!(escape_block_markers("> quoted"), "\\> quoted");
        assert_eq!(escape_block_markers("2025 was great"), "2025 was great");
        assert_eq!(escape_block_markers("**bold** start"), "**bold** start");
    }

    #[test]
    fn test_html_document_layout() {
        let doc = classify_report("# Trip\n- **Hotel**: Taj\n- walk\n\nBody text");
        let html = HtmlDocumentRenderer::default().to_html("DEL to HYD", &doc);

        assert!(html.contains("size: A4; margin: 60pt 50pt 40pt 50pt;"));
        assert!(html.contains("color: #1F4E79;"));
        assert!(html.contains("<h1>Trip</h1>"));
        assert!(html.contains("<p><b>Hotel:</b> Taj</p>"));
        assert!(html.contains("<ul>\n<li>walk</li>\n</ul>"));
        assert!(html.contains("<div class=\"spacer\"></div>"));
        assert!(html.contains("<p>Body text</p>"));
    }

    #[test]
    fn test_headings_and_labels_share_inline_escaping() {
        let doc = ReportDocument {
            blocks: vec![
                Block::Heading2("Tips & <tricks>".to_string()),
                Block::Labelled {
                    label: "Cost <approx>".to_string(),
                    value: "₹5,200 & up".to_string(),
                },
            ],
        };
        let html = HtmlDocumentRenderer::default().to_html("DEL to HYD", &doc);

        assert!(html.contains("<title>DEL to HYD</title>"));
        assert!(html.contains("<h2>Tips &amp; &lt;tricks&gt;</h2>"));
        assert!(html.contains("<p><b>Cost &lt;approx&gt;:</b> ₹5,200 &amp; up</p>"));
        assert!(!html.contains("<tricks>"));
    }
}
