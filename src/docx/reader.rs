use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use super::{DOCUMENT_PART, QUOTE_STYLES};
use crate::error::{ConvertError, Result};

/// Extract the body of a .docx package as HTML.
///
/// Headings, bulleted or numbered paragraphs, quotes, tables and bold/italic
/// runs are kept; all other formatting is dropped. Empty paragraphs are
/// skipped.
pub fn extract_html(bytes: &[u8]) -> Result<String> {
    let xml = read_document_part(bytes)?;
    let html = document_to_html(&xml)?;
    tracing::debug!(xml = xml.len(), html = html.len(), "extracted word document body");
    Ok(html)
}

fn read_document_part(bytes: &[u8]) -> Result<String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ConvertError::parse("Word document", e))?;
    let mut part = match archive.by_name(DOCUMENT_PART) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => {
            return Err(ConvertError::parse(
                "Word document",
                format!("missing {DOCUMENT_PART}"),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

#[derive(Default)]
struct ParagraphState {
    style: Option<String>,
    numbered: bool,
    html: String,
}

#[derive(Default)]
struct RunState {
    bold: bool,
    italic: bool,
    text: String,
}

#[derive(Default)]
struct ReadState {
    out: String,
    in_list: bool,

    paragraph: Option<ParagraphState>,
    run: Option<RunState>,
    in_text: bool,

    table_depth: usize,
    // HTML of the cell being read, if any
    cell: Option<String>,
}

impl ReadState {
    fn close_list(&mut self) {
        if self.in_list {
            self.out.push_str("</ul>");
            self.in_list = false;
        }
    }

    fn start_property(&mut self, e: &BytesStart) -> Result<()> {
        match e.local_name().as_ref() {
            b"pStyle" => {
                let value = attr_value(e, b"val")?;
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style = value;
                }
            }
            b"numPr" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.numbered = true;
                }
            }
            b"b" => {
                let on = toggle_on(e)?;
                if let Some(run) = self.run.as_mut() {
                    run.bold = on;
                }
            }
            b"i" => {
                let on = toggle_on(e)?;
                if let Some(run) = self.run.as_mut() {
                    run.italic = on;
                }
            }
            b"tab" => self.push_run_text("\t"),
            b"br" => {
                if let Some(run) = self.run.as_mut() {
                    run.text.push_str("<br />");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn push_run_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(&escape(text));
        }
    }

    fn end_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let Some(paragraph) = self.paragraph.as_mut() else {
            return;
        };
        if run.text.is_empty() {
            return;
        }
        let mut html = run.text;
        if run.italic {
            html = format!("<em>{html}</em>");
        }
        if run.bold {
            html = format!("<strong>{html}</strong>");
        }
        paragraph.html.push_str(&html);
    }

    fn end_paragraph(&mut self) {
        let Some(paragraph) = self.paragraph.take() else {
            return;
        };
        if paragraph.html.is_empty() {
            return;
        }

        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(&format!("<p>{}</p>", paragraph.html));
            return;
        }

        let style = paragraph.style.as_deref();
        if paragraph.numbered || style == Some("ListParagraph") {
            if !self.in_list {
                self.out.push_str("<ul>");
                self.in_list = true;
            }
            self.out.push_str(&format!("<li>{}</li>", paragraph.html));
            return;
        }

        self.close_list();
        if let Some(level) = heading_level_from_style(style) {
            self.out
                .push_str(&format!("<h{level}>{}</h{level}>", paragraph.html));
        } else if style.is_some_and(|s| QUOTE_STYLES.contains(&s)) {
            self.out
                .push_str(&format!("<blockquote><p>{}</p></blockquote>", paragraph.html));
        } else {
            self.out.push_str(&format!("<p>{}</p>", paragraph.html));
        }
    }
}

fn document_to_html(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut state = ReadState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    state.paragraph = Some(ParagraphState::default());
                }
                b"r" => {
                    state.run = Some(RunState::default());
                }
                b"t" => state.in_text = true,
                b"tbl" => {
                    state.table_depth += 1;
                    if state.table_depth == 1 {
                        state.close_list();
                        state.out.push_str("<table>");
                    }
                }
                b"tr" if state.table_depth == 1 => state.out.push_str("<tr>"),
                b"tc" if state.table_depth == 1 => state.cell = Some(String::new()),
                _ => state.start_property(&e)?,
            },
            Event::Empty(e) => state.start_property(&e)?,
            Event::Text(e) => {
                if state.in_text {
                    let text = e.unescape()?;
                    state.push_run_text(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => state.in_text = false,
                b"r" => state.end_run(),
                b"p" => state.end_paragraph(),
                b"tc" if state.table_depth == 1 => {
                    let cell = state.cell.take().unwrap_or_default();
                    state.out.push_str(&format!("<td>{cell}</td>"));
                }
                b"tr" if state.table_depth == 1 => state.out.push_str("</tr>"),
                b"tbl" => {
                    if state.table_depth == 1 {
                        state.out.push_str("</table>");
                    }
                    state.table_depth = state.table_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    state.close_list();
    Ok(state.out)
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// `<w:b/>` switches a toggle on, `<w:b w:val="0"/>` or `false` off
fn toggle_on(e: &BytesStart) -> Result<bool> {
    Ok(!matches!(
        attr_value(e, b"val")?.as_deref(),
        Some("0") | Some("false") | Some("none")
    ))
}

fn heading_level_from_style(style: Option<&str>) -> Option<u8> {
    let style = style?.trim().to_lowercase();
    if style == "title" {
        return Some(1);
    }
    let level: u8 = style.strip_prefix("heading")?.trim().parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}
