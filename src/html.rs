use pulldown_cmark::{Options, Parser, html};

/// Convert HTML to Markdown.
pub fn html_to_markdown(source: &str) -> String {
    let markdown = html2md::parse_html(source);
    tracing::debug!(html = source.len(), markdown = markdown.len(), "HTML converted to markdown");
    markdown
}

/// Convert Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// Convert plain text to HTML. Plain text is read as Markdown, so blank
/// lines separate paragraphs and markup characters keep their meaning.
pub fn plain_text_to_html(text: &str) -> String {
    markdown_to_html(text)
}
