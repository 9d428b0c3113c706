use clap::ValueEnum;

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::{html, keyed, tabular, xml};

/// Text-to-text conversions, selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConversionKind {
    CsvToMarkdown,
    JsonToMarkdown,
    XmlToJson,
    PlainTextToHtml,
    HtmlToMarkdown,
    MarkdownToHtml,
}

impl ConversionKind {
    pub const ALL: [ConversionKind; 6] = [
        ConversionKind::CsvToMarkdown,
        ConversionKind::JsonToMarkdown,
        ConversionKind::XmlToJson,
        ConversionKind::PlainTextToHtml,
        ConversionKind::HtmlToMarkdown,
        ConversionKind::MarkdownToHtml,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConversionKind::CsvToMarkdown => "CSV to Markdown Table",
            ConversionKind::JsonToMarkdown => "JSON to Markdown",
            ConversionKind::XmlToJson => "XML to JSON",
            ConversionKind::PlainTextToHtml => "Plain Text to HTML",
            ConversionKind::HtmlToMarkdown => "HTML to Markdown",
            ConversionKind::MarkdownToHtml => "Markdown to HTML",
        }
    }

    /// Run the conversion. Blank input is rejected up front; any failure
    /// is returned whole, never with partial output.
    pub fn convert(self, input: &str, config: &Config) -> Result<String> {
        if input.trim().is_empty() {
            return Err(ConvertError::EmptyInput("input"));
        }

        let result = match self {
            ConversionKind::CsvToMarkdown => tabular::csv_to_markdown(input, &config.csv),
            ConversionKind::JsonToMarkdown => keyed::json_to_markdown(input),
            ConversionKind::XmlToJson => xml::xml_to_json(input),
            ConversionKind::PlainTextToHtml => Ok(html::plain_text_to_html(input)),
            ConversionKind::HtmlToMarkdown => Ok(html::html_to_markdown(input)),
            ConversionKind::MarkdownToHtml => Ok(html::markdown_to_html(input)),
        };

        match &result {
            Ok(output) => tracing::info!(
                conversion = self.label(),
                input = input.len(),
                output = output.len(),
                "conversion succeeded"
            ),
            Err(e) => tracing::warn!(conversion = self.label(), error = %e, "conversion failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(kind: ConversionKind, input: &str) -> Result<String> {
        kind.convert(input, &Config::compiled_default())
    }

    #[test]
    fn names_are_kebab_case() {
        let names: Vec<String> = ConversionKind::ALL
            .iter()
            .filter_map(|kind| kind.to_possible_value())
            .map(|value| value.get_name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "csv-to-markdown",
                "json-to-markdown",
                "xml-to-json",
                "plain-text-to-html",
                "html-to-markdown",
                "markdown-to-html",
            ]
        );
    }

    #[test]
    fn blank_input_is_rejected_for_every_kind() {
        for kind in ConversionKind::ALL {
            let err = convert(kind, "  \n").unwrap_err();
            assert!(matches!(err, ConvertError::EmptyInput(_)), "{kind:?}");
        }
    }

    #[test]
    fn dispatches_to_each_transform() {
        assert_eq!(
            convert(ConversionKind::CsvToMarkdown, "a\n1\n").unwrap(),
            "| a |\n| --- |\n| 1 |\n"
        );
        assert_eq!(
            convert(ConversionKind::JsonToMarkdown, r#"{"k":1}"#).unwrap(),
            "- **k**: 1"
        );
        assert_eq!(convert(ConversionKind::XmlToJson, "<a/>").unwrap(), "{}");
        assert_eq!(
            convert(ConversionKind::MarkdownToHtml, "*x*").unwrap(),
            "<p><em>x</em></p>\n"
        );
        assert_eq!(
            convert(ConversionKind::PlainTextToHtml, "hello").unwrap(),
            "<p>hello</p>\n"
        );
    }

    #[test]
    fn failures_are_terminal() {
        assert!(matches!(
            convert(ConversionKind::XmlToJson, "<a>").unwrap_err(),
            ConvertError::ParseFailure { .. }
        ));
        assert!(matches!(
            convert(ConversionKind::CsvToMarkdown, "only,headers\n").unwrap_err(),
            ConvertError::EmptyInput(_)
        ));
    }
}
