use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::DOCUMENT_PART;
use crate::block::{Block, Cell, Document, Run, SectionKind};
use crate::error::Result;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Bullet numbering instance shared by all list paragraphs
const BULLET_NUM_ID: u32 = 1;

/// Serialize a document to .docx bytes.
pub fn write_docx(doc: &Document) -> Result<Vec<u8>> {
    let document_xml = document_xml(doc);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        (DOCUMENT_PART, document_xml.as_str()),
        ("word/_rels/document.xml.rels", document_rels_xml()),
        ("word/styles.xml", styles_xml()),
        ("word/numbering.xml", numbering_xml()),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    tracing::debug!(bytes = bytes.len(), "packaged word document");
    Ok(bytes)
}

/// Render the main document part
fn document_xml(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str(&format!(r#"<w:document xmlns:w="{WORD_NS}"><w:body>"#));

    let mut last_was_table = false;
    for block in doc.blocks() {
        emit_block(block, &mut out);
        last_was_table = matches!(block, Block::Table { .. });
    }
    // A body must not end on a table
    if last_was_table {
        out.push_str("<w:p/>");
    }

    let kind = doc
        .sections
        .last()
        .map(|section| section.kind)
        .unwrap_or_default();
    out.push_str("<w:sectPr>");
    match kind {
        SectionKind::Continuous => out.push_str(r#"<w:type w:val="continuous"/>"#),
    }
    out.push_str("</w:sectPr>");

    out.push_str("</w:body></w:document>");
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { style, text } => {
            paragraph(out, style.map(|s| s.style_id()), |out| {
                emit_run(out, text, RunProps::default())
            });
        }
        Block::Paragraph { text } => {
            paragraph(out, None, |out| emit_run(out, text, RunProps::default()));
        }
        Block::StyledParagraph {
            runs,
            bulleted,
            bullet_level,
        } => {
            out.push_str("<w:p>");
            if *bulleted {
                out.push_str(&format!(
                    r#"<w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="{bullet_level}"/><w:numId w:val="{BULLET_NUM_ID}"/></w:numPr></w:pPr>"#
                ));
            }
            for Run { text, bold } in runs {
                emit_run(
                    out,
                    text,
                    RunProps {
                        bold: *bold,
                        font: None,
                    },
                );
            }
            out.push_str("</w:p>");
        }
        Block::CodeBlock { text, font } => {
            paragraph(out, None, |out| {
                emit_run(
                    out,
                    text,
                    RunProps {
                        bold: false,
                        font: Some(font.as_str()),
                    },
                )
            });
        }
        Block::Quote { text, style } => {
            paragraph(out, Some(style.as_str()), |out| {
                emit_run(out, text, RunProps::default())
            });
        }
        Block::Table { rows } => emit_table(rows, out),
    }
}

fn paragraph(out: &mut String, style: Option<&str>, body: impl FnOnce(&mut String)) {
    out.push_str("<w:p>");
    if let Some(style) = style {
        out.push_str(&format!(
            r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            escape(style)
        ));
    }
    body(out);
    out.push_str("</w:p>");
}

#[derive(Default, Clone, Copy)]
struct RunProps<'a> {
    bold: bool,
    font: Option<&'a str>,
}

/// Emit one run; embedded newlines become line breaks.
fn emit_run(out: &mut String, text: &str, props: RunProps) {
    out.push_str("<w:r>");
    if props.bold || props.font.is_some() {
        out.push_str("<w:rPr>");
        if let Some(font) = props.font {
            let font = escape(font);
            out.push_str(&format!(
                r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
            ));
        }
        if props.bold {
            out.push_str("<w:b/>");
        }
        out.push_str("</w:rPr>");
    }
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        if !line.is_empty() {
            out.push_str(r#"<w:t xml:space="preserve">"#);
            out.push_str(&escape(line));
            out.push_str("</w:t>");
        }
    }
    out.push_str("</w:r>");
}

fn emit_table(rows: &[Vec<Cell>], out: &mut String) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

    out.push_str(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#);
    out.push_str("<w:tblGrid>");
    for _ in 0..columns {
        out.push_str("<w:gridCol/>");
    }
    out.push_str("</w:tblGrid>");

    for row in rows {
        out.push_str("<w:tr>");
        for cell in row {
            out.push_str("<w:tc>");
            paragraph(out, None, |out| {
                emit_run(out, &cell.text, RunProps::default())
            });
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
</Types>"#
}

fn package_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

fn document_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#
}

fn styles_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="3"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading5"><w:name w:val="heading 5"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="4"/></w:pPr><w:rPr><w:b/><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading6"><w:name w:val="heading 6"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="5"/></w:pPr><w:rPr><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="720" w:right="720"/></w:pPr><w:rPr><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="IntenseQuote"><w:name w:val="Intense Quote"/><w:basedOn w:val="Normal"/><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="4" w:space="4" w:color="4F81BD"/></w:pBdr><w:ind w:left="936" w:right="936"/></w:pPr><w:rPr><w:b/><w:i/><w:color w:val="4F81BD"/></w:rPr></w:style>
  <w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4"/><w:left w:val="single" w:sz="4"/><w:bottom w:val="single" w:sz="4"/><w:right w:val="single" w:sz="4"/><w:insideH w:val="single" w:sz="4"/><w:insideV w:val="single" w:sz="4"/></w:tblBorders></w:tblPr></w:style>
</w:styles>"#
}

fn numbering_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="◦"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="1440" w:hanging="360"/></w:pPr></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::HeadingStyle;

    fn body(blocks: Vec<Block>) -> String {
        let xml = document_xml(&Document::assemble(blocks));
        let start = xml.find("<w:body>").unwrap() + "<w:body>".len();
        let end = xml.find("<w:sectPr>").unwrap();
        xml[start..end].to_string()
    }

    #[test]
    fn empty_document_has_continuous_section() {
        let xml = document_xml(&Document::assemble(Vec::new()));
        assert!(xml.ends_with(
            r#"<w:body><w:sectPr><w:type w:val="continuous"/></w:sectPr></w:body></w:document>"#
        ));
    }

    #[test]
    fn heading_gets_style() {
        assert_eq!(
            body(vec![Block::Heading {
                style: Some(HeadingStyle::Heading1),
                text: "Hi".to_string(),
            }]),
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">Hi</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn unstyled_heading_is_plain_paragraph() {
        assert_eq!(
            body(vec![Block::Heading {
                style: None,
                text: "Hi".to_string(),
            }]),
            r#"<w:p><w:r><w:t xml:space="preserve">Hi</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn bold_run_and_bullet_level() {
        assert_eq!(
            body(vec![Block::StyledParagraph {
                runs: vec![Run::bold("b")],
                bulleted: true,
                bullet_level: 1,
            }]),
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">b</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn code_uses_font_and_line_breaks() {
        assert_eq!(
            body(vec![Block::CodeBlock {
                text: "a<b\nc".to_string(),
                font: "Courier New".to_string(),
            }]),
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Courier New" w:hAnsi="Courier New" w:cs="Courier New"/></w:rPr><w:t xml:space="preserve">a&lt;b</w:t><w:br/><w:t xml:space="preserve">c</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn trailing_table_gets_closing_paragraph() {
        let xml = body(vec![Block::Table {
            rows: vec![vec![Cell {
                text: "x".to_string(),
            }]],
        }]);
        assert!(xml.starts_with("<w:tbl>"));
        assert!(xml.contains("<w:tblGrid><w:gridCol/></w:tblGrid>"));
        assert!(xml.ends_with("</w:tbl><w:p/>"));
    }

    #[test]
    fn package_is_a_zip() {
        let bytes = write_docx(&Document::assemble(Vec::new())).unwrap();
        assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
    }
}
