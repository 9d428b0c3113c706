use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::token::{ListItem, Token};

/// Strip YAML frontmatter from the beginning of markdown content.
///
/// Only a block opened by a `---` line directly followed by a non-blank line
/// and closed by a line that is exactly `---` counts; a leading thematic
/// break is left alone.
fn strip_frontmatter(markdown: &str) -> &str {
    let Some(rest) = markdown.strip_prefix("---\n") else {
        return markdown;
    };
    match rest.lines().next() {
        Some(first) if !first.trim().is_empty() => {}
        _ => return markdown,
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return rest[offset + line.len()..].trim_start_matches('\n');
        }
        offset += line.len();
    }
    markdown
}

/// Split markdown text into a flat sequence of block tokens.
///
/// Token texts keep their inline markup in source form (`**bold**`, `*em*`,
/// `` `code` ``) so later stages can apply their own inline rules.
///
/// Nested lists are flattened: `- a\n  - a1` yields two items, `a` and `a1`,
/// rather than one item whose text carries the sub-list.
pub fn lex(markdown: &str) -> Vec<Token> {
    let markdown = strip_frontmatter(markdown);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut tokens = Vec::new();
    let mut state = LexState::default();

    for event in parser {
        process_event(event, &mut state, &mut tokens);
    }

    tokens
}

#[derive(Default)]
struct LexState {
    // Inline source of the block being built
    inline: String,

    heading_depth: Option<u8>,

    in_code_block: bool,
    code_content: String,

    // Open block quotes, lists and list items, innermost last
    containers: Vec<Container>,

    in_table: bool,
    table_rows: Vec<Vec<String>>,
    current_row: Vec<String>,
}

enum Container {
    Quote(Vec<String>),
    List(Vec<ListItem>),
    Item {
        text: String,
        task: bool,
        // Items of lists nested in this one, flattened in order
        nested: Vec<ListItem>,
    },
}

impl LexState {
    /// Hand a finished block's text to the innermost open container.
    /// Returns the text back when no container is open.
    fn absorb(&mut self, text: String) -> Option<String> {
        match self.containers.last_mut() {
            Some(Container::Item { text: item, .. }) => {
                push_line(item, &text);
                None
            }
            Some(Container::Quote(lines)) => {
                lines.push(text);
                None
            }
            Some(Container::List(items)) => {
                items.push(ListItem::new(text, false));
                None
            }
            None => Some(text),
        }
    }

    /// Move loose inline text (tight list items) into the open item.
    fn flush_into_item(&mut self) {
        let pending = std::mem::take(&mut self.inline);
        if pending.is_empty() {
            return;
        }
        if let Some(Container::Item { text, .. }) = self.containers.last_mut() {
            push_line(text, &pending);
        }
    }

    fn at_top_level(&self) -> bool {
        self.containers.is_empty()
    }
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

fn process_event(event: Event, state: &mut LexState, tokens: &mut Vec<Token>) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.flush_into_item();
            state.heading_depth = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(depth) = state.heading_depth.take() {
                let text = std::mem::take(&mut state.inline);
                if let Some(text) = state.absorb(text) {
                    tokens.push(Token::Heading { depth, text });
                }
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {
            if !state.in_table {
                state.flush_into_item();
            }
        }
        Event::End(TagEnd::Paragraph) => {
            let text = std::mem::take(&mut state.inline);
            if !text.is_empty() {
                if let Some(text) = state.absorb(text) {
                    tokens.push(Token::Paragraph { text });
                }
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                state.inline.push_str(&text);
            }
        }
        Event::Code(code) => {
            state.inline.push('`');
            state.inline.push_str(&code);
            state.inline.push('`');
        }
        Event::InlineHtml(html) => {
            state.inline.push_str(&html);
        }

        // Emphasis stays in source form
        Event::Start(Tag::Strong) | Event::End(TagEnd::Strong) => {
            state.inline.push_str("**");
        }
        Event::Start(Tag::Emphasis) | Event::End(TagEnd::Emphasis) => {
            state.inline.push('*');
        }
        Event::Start(Tag::Strikethrough) | Event::End(TagEnd::Strikethrough) => {
            state.inline.push_str("~~");
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(_)) => {
            state.flush_into_item();
            state.in_code_block = true;
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let mut text = std::mem::take(&mut state.code_content);
            if text.ends_with('\n') {
                text.pop();
            }
            if let Some(text) = state.absorb(text) {
                tokens.push(Token::Code { text });
            }
        }

        // Block quotes
        Event::Start(Tag::BlockQuote(_)) => {
            state.flush_into_item();
            state.containers.push(Container::Quote(Vec::new()));
        }
        Event::End(TagEnd::BlockQuote(_)) => {
            if let Some(Container::Quote(lines)) = state.containers.pop() {
                let text = lines.join("\n");
                if let Some(text) = state.absorb(text) {
                    tokens.push(Token::Blockquote { text });
                }
            }
        }

        // Lists
        Event::Start(Tag::List(_)) => {
            state.flush_into_item();
            state.containers.push(Container::List(Vec::new()));
        }
        Event::End(TagEnd::List(_)) => {
            if let Some(Container::List(items)) = state.containers.pop() {
                match state.containers.last_mut() {
                    Some(Container::Item { nested, .. }) => nested.extend(items),
                    Some(Container::Quote(lines)) => {
                        lines.extend(items.into_iter().map(|item| item.text));
                    }
                    Some(Container::List(parent)) => parent.extend(items),
                    None => tokens.push(Token::List { items }),
                }
            }
        }
        Event::Start(Tag::Item) => {
            state.containers.push(Container::Item {
                text: String::new(),
                task: false,
                nested: Vec::new(),
            });
        }
        Event::End(TagEnd::Item) => {
            state.flush_into_item();
            if let Some(Container::Item { text, task, nested }) = state.containers.pop() {
                if let Some(Container::List(items)) = state.containers.last_mut() {
                    items.push(ListItem { text, task });
                    items.extend(nested);
                }
            }
        }
        Event::TaskListMarker(_) => {
            if let Some(Container::Item { task, .. }) = state.containers.last_mut() {
                *task = true;
            }
        }

        // Tables
        Event::Start(Tag::Table(_)) => {
            state.flush_into_item();
            state.in_table = true;
            state.table_rows.clear();
        }
        Event::End(TagEnd::Table) => {
            state.in_table = false;
            let rows = std::mem::take(&mut state.table_rows);
            if state.at_top_level() {
                tokens.push(Token::Table { rows });
            } else {
                for row in rows {
                    state.absorb(row.join(" | "));
                }
            }
        }
        Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {
            state.current_row.clear();
        }
        Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
            let row = std::mem::take(&mut state.current_row);
            state.table_rows.push(row);
        }
        Event::Start(Tag::TableCell) => {
            state.inline.clear();
        }
        Event::End(TagEnd::TableCell) => {
            let cell = std::mem::take(&mut state.inline);
            state.current_row.push(cell);
        }

        // Blocks without a token of their own
        Event::Rule => {
            if state.at_top_level() {
                tokens.push(Token::Other { kind: "hr" });
            }
        }
        Event::End(TagEnd::HtmlBlock) => {
            if state.at_top_level() {
                tokens.push(Token::Other { kind: "html" });
            }
        }

        // Soft/hard breaks
        Event::SoftBreak | Event::HardBreak => {
            state.inline.push('\n');
        }

        // Ignore other events (links and images keep only their text)
        _ => {}
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
