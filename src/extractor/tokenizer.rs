use markdown::mdast::Node;
use markdown::ParseOptions;

use super::ExtractionError;
use crate::types::token::Token;

/// Markdown分词能力
///
/// 在构造提取器时注入，分词失败必须以 `ParseFailure` 返回，不能静默产生残缺的token。
pub trait Tokenizer: Send + Sync + std::fmt::Debug {
    /// 分词器名称，用于日志
    fn name(&self) -> &'static str;

    /// 将README全文转换为有序token序列
    fn parse(&self, text: &str) -> Result<Vec<Token>, ExtractionError>;
}

/// 基于 `markdown` crate (mdast) 的分词器
#[derive(Debug, Clone)]
pub struct MarkdownTokenizer {
    gfm: bool,
}

impl MarkdownTokenizer {
    /// 加载分词器
    pub fn load() -> Result<Self, ExtractionError> {
        Ok(Self { gfm: true })
    }

    /// 仅启用CommonMark语法（不含GFM扩展）
    pub fn commonmark() -> Self {
        Self { gfm: false }
    }

    fn options(&self) -> ParseOptions {
        if self.gfm {
            ParseOptions::gfm()
        } else {
            ParseOptions::default()
        }
    }
}

impl Tokenizer for MarkdownTokenizer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn parse(&self, text: &str) -> Result<Vec<Token>, ExtractionError> {
        let root = markdown::to_mdast(text, &self.options())
            .map_err(|e| ExtractionError::ParseFailure(e.to_string()))?;

        let mut tokens = Vec::new();
        emit_tokens(&root, &mut tokens);
        Ok(tokens)
    }
}

/// 按文档顺序遍历块级节点并产生token
///
/// 使用显式栈遍历，嵌套深度不受线程栈大小限制；子节点逆序入栈以保持文档顺序。
fn emit_tokens(root: &Node, tokens: &mut Vec<Token>) {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node {
            Node::Heading(heading) => {
                tokens.push(Token::HeadingOpen {
                    level: heading.depth,
                });
                tokens.push(Token::inline(inline_text(&heading.children)));
            }
            Node::Paragraph(paragraph) => {
                tokens.push(Token::Paragraph);
                tokens.push(Token::inline(inline_text(&paragraph.children)));
            }
            Node::ListItem(item) => {
                tokens.push(Token::ListItemOpen);
                // 列表项的首个段落即为该项的行内内容
                let rest = match item.children.split_first() {
                    Some((Node::Paragraph(paragraph), rest)) => {
                        tokens.push(Token::inline(inline_text(&paragraph.children)));
                        rest
                    }
                    _ => item.children.as_slice(),
                };
                stack.extend(rest.iter().rev());
            }
            Node::Code(_) | Node::Html(_) | Node::Math(_) | Node::Yaml(_) | Node::Toml(_) => {}
            other => {
                if let Some(children) = other.children() {
                    stack.extend(children.iter().rev());
                }
            }
        }
    }
}

/// 拼接行内节点的纯文本
fn inline_text(children: &[Node]) -> String {
    let mut text = String::new();
    let mut stack: Vec<&Node> = children.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node {
            Node::Text(t) => text.push_str(&t.value),
            Node::InlineCode(code) => text.push_str(&code.value),
            Node::InlineMath(math) => text.push_str(&math.value),
            Node::Break(_) => text.push('\n'),
            Node::Html(_) | Node::Image(_) | Node::ImageReference(_) => {}
            other => {
                if let Some(nested) = other.children() {
                    stack.extend(nested.iter().rev());
                }
            }
        }
    }

    text
}
