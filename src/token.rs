/// One item of a list token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Literal inline source of the item, emphasis markers included
    pub text: String,
    /// Set for task items (`- [ ]` / `- [x]`)
    pub task: bool,
}

impl ListItem {
    pub fn new(text: impl Into<String>, task: bool) -> Self {
        Self {
            text: text.into(),
            task,
        }
    }
}

/// Block-level Markdown tokens, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Heading { depth: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<ListItem> },
    Code { text: String },
    Blockquote { text: String },
    Table { rows: Vec<Vec<String>> },
    /// Any block kind without a document mapping (rules, raw HTML, ...)
    Other { kind: &'static str },
}

impl Token {
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Heading { .. } => "heading",
            Token::Paragraph { .. } => "paragraph",
            Token::List { .. } => "list",
            Token::Code { .. } => "code",
            Token::Blockquote { .. } => "blockquote",
            Token::Table { .. } => "table",
            Token::Other { kind } => kind,
        }
    }
}
