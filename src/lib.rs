mod block;
mod config;
mod convert;
mod docx;
mod error;
mod html;
mod keyed;
mod lexer;
mod normalize;
mod runs;
mod tabular;
mod token;
pub mod xml;

pub use block::{Block, Cell, Document, HeadingStyle, Run, Section, SectionKind};
pub use config::{Config, CsvConfig, LogConfig, WordConfig};
pub use convert::ConversionKind;
pub use error::{ConvertError, Result};
pub use html::{html_to_markdown, markdown_to_html, plain_text_to_html};
pub use keyed::{json_to_markdown, value_to_markdown};
pub use runs::{runs_text, split_bold_runs};
pub use tabular::{Record, csv_to_markdown, parse_records, records_to_markdown};
pub use token::{ListItem, Token};
pub use xml::xml_to_json;

/// Split markdown text into block tokens.
pub fn lex(markdown: &str) -> Vec<Token> {
    lexer::lex(markdown)
}

/// Map block tokens onto document blocks.
pub fn normalize(tokens: &[Token], config: &Config) -> Vec<Block> {
    normalize::normalize(tokens, &config.word)
}

/// Build the document model for markdown text.
pub fn markdown_to_document(markdown: &str, config: &Config) -> Document {
    let tokens = lex(markdown);
    let blocks = normalize(&tokens, config);
    tracing::debug!(tokens = tokens.len(), blocks = blocks.len(), "normalized markdown");
    Document::assemble(blocks)
}

/// Convert markdown to .docx bytes using default config.
pub fn markdown_to_docx(markdown: &str) -> Result<Vec<u8>> {
    markdown_to_docx_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to .docx bytes with custom config.
pub fn markdown_to_docx_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    if markdown.trim().is_empty() {
        return Err(ConvertError::EmptyInput("Markdown content"));
    }
    let doc = markdown_to_document(markdown, config);
    docx::write_docx(&doc)
}

/// Extract the body of a .docx file as HTML.
pub fn docx_to_html(bytes: &[u8]) -> Result<String> {
    docx::extract_html(bytes)
}

/// Convert a .docx file to markdown.
pub fn docx_to_markdown(bytes: &[u8]) -> Result<String> {
    let html = docx_to_html(bytes)?;
    Ok(html_to_markdown(&html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_to_document_end_to_end() {
        let doc = markdown_to_document(
            "# Title\n\nIntro **kept**.\n\n- **a**: one\n- [x] done\n\n---\n\n> quoted\n",
            &Config::compiled_default(),
        );
        let blocks: Vec<&Block> = doc.blocks().collect();
        assert_eq!(
            blocks,
            [
                &Block::Heading {
                    style: Some(HeadingStyle::Heading1),
                    text: "Title".to_string()
                },
                &Block::Paragraph {
                    text: "Intro **kept**.".to_string()
                },
                &Block::StyledParagraph {
                    runs: vec![Run::bold("a"), Run::plain(": one")],
                    bulleted: true,
                    bullet_level: 0
                },
                &Block::StyledParagraph {
                    runs: vec![Run::plain("done")],
                    bulleted: true,
                    bullet_level: 1
                },
                &Block::Quote {
                    text: "quoted".to_string(),
                    style: "IntenseQuote".to_string()
                },
            ]
        );
    }

    #[test]
    fn empty_markdown_document_is_valid() {
        let doc = markdown_to_document("", &Config::compiled_default());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.blocks().count(), 0);
    }

    #[test]
    fn word_surface_rejects_blank_markdown() {
        assert!(matches!(
            markdown_to_docx(" \n").unwrap_err(),
            ConvertError::EmptyInput(_)
        ));
    }

    #[test]
    fn word_round_trip_keeps_structure() {
        let bytes = markdown_to_docx("## Notes\n\n- **Key**: value\n\nClosing line.").unwrap();
        let html = docx_to_html(&bytes).unwrap();
        assert_eq!(
            html,
            "<h2>Notes</h2><ul><li><strong>Key</strong>: value</li></ul><p>Closing line.</p>"
        );

        let markdown = docx_to_markdown(&bytes).unwrap();
        assert!(markdown.contains("Notes"));
        assert!(markdown.contains("**Key**"));
        assert!(markdown.contains("Closing line."));
    }

    #[test]
    fn garbage_docx_is_parse_failure() {
        assert!(matches!(
            docx_to_markdown(b"not a zip").unwrap_err(),
            ConvertError::ParseFailure { .. }
        ));
    }
}
