use crate::block::{Block, Cell, HeadingStyle};
use crate::config::WordConfig;
use crate::runs::split_bold_runs;
use crate::token::Token;

/// Map block tokens onto document blocks, preserving order.
///
/// Only list items get inline run splitting; heading, paragraph and quote
/// text is carried verbatim. Token kinds without a mapping are dropped.
pub fn normalize(tokens: &[Token], word: &WordConfig) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Heading { depth, text } => {
                blocks.push(Block::Heading {
                    style: HeadingStyle::from_depth(*depth),
                    text: text.clone(),
                });
            }
            Token::Paragraph { text } => {
                blocks.push(Block::Paragraph { text: text.clone() });
            }
            Token::List { items } => {
                // Task items sit one bullet level deeper
                blocks.extend(items.iter().map(|item| Block::StyledParagraph {
                    runs: split_bold_runs(&item.text),
                    bulleted: true,
                    bullet_level: if item.task { 1 } else { 0 },
                }));
            }
            Token::Code { text } => {
                blocks.push(Block::CodeBlock {
                    text: text.clone(),
                    font: word.code_font.clone(),
                });
            }
            Token::Blockquote { text } => {
                blocks.push(Block::Quote {
                    text: text.clone(),
                    style: word.quote_style.clone(),
                });
            }
            Token::Table { rows } => {
                let rows = rows
                    .iter()
                    .map(|row| row.iter().map(|cell| Cell { text: cell.clone() }).collect())
                    .collect();
                blocks.push(Block::Table { rows });
            }
            Token::Other { .. } => {
                tracing::trace!(kind = token.kind(), "dropping token without document mapping");
            }
        }
    }

    blocks
}
