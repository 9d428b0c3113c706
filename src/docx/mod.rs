//! WordprocessingML (.docx) packaging.
//!
//! The writer serializes an assembled [`Document`](crate::block::Document)
//! into a minimal package; the reader pulls the body of an existing package
//! back out as HTML.

mod reader;
mod writer;

pub use reader::extract_html;
pub use writer::write_docx;

/// Main document part inside the package
const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph style ids that render as block quotes
const QUOTE_STYLES: &[&str] = &["Quote", "IntenseQuote"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, Cell, Document, HeadingStyle, Run};

    #[test]
    fn written_document_reads_back_as_html() {
        let doc = Document::assemble(vec![
            Block::Heading {
                style: Some(HeadingStyle::Heading2),
                text: "Title".to_string(),
            },
            Block::Paragraph {
                text: "Body & more".to_string(),
            },
            Block::StyledParagraph {
                runs: vec![Run::bold("Key"), Run::plain(": value")],
                bulleted: true,
                bullet_level: 0,
            },
            Block::Quote {
                text: "wise".to_string(),
                style: "IntenseQuote".to_string(),
            },
            Block::Table {
                rows: vec![vec![
                    Cell {
                        text: "a".to_string(),
                    },
                    Cell {
                        text: "b".to_string(),
                    },
                ]],
            },
        ]);

        let bytes = write_docx(&doc).unwrap();
        let html = extract_html(&bytes).unwrap();

        assert_eq!(
            html,
            "<h2>Title</h2>\
             <p>Body &amp; more</p>\
             <ul><li><strong>Key</strong>: value</li></ul>\
             <blockquote><p>wise</p></blockquote>\
             <table><tr><td><p>a</p></td><td><p>b</p></td></tr></table>"
        );
    }
}
