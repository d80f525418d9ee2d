//! Text extraction from job posting files

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(Self::flatten(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Plain text with one block per line. Headings keep a `#` prefix and
    /// list items a `- ` prefix so section and bullet structure survives.
    pub fn flatten(markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(..)) => text.push_str("# "),
                Event::Start(Tag::Item) => text.push_str("- "),
                Event::Text(content) | Event::Code(content) => text.push_str(&content),
                Event::SoftBreak => text.push(' '),
                Event::HardBreak
                | Event::Rule
                | Event::Start(Tag::List(_))
                | Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != "-" && *line != "#")
            .collect::<Vec<_>>()
            .join("\n")
    }
}
