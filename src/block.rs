/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Named paragraph style for heading depths 1 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl HeadingStyle {
    /// Depths outside 1..=6 have no style.
    pub fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            1 => Some(HeadingStyle::Heading1),
            2 => Some(HeadingStyle::Heading2),
            3 => Some(HeadingStyle::Heading3),
            4 => Some(HeadingStyle::Heading4),
            5 => Some(HeadingStyle::Heading5),
            6 => Some(HeadingStyle::Heading6),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            HeadingStyle::Heading1 => 1,
            HeadingStyle::Heading2 => 2,
            HeadingStyle::Heading3 => 3,
            HeadingStyle::Heading4 => 4,
            HeadingStyle::Heading5 => 5,
            HeadingStyle::Heading6 => 6,
        }
    }

    /// Style id used in the word processing package
    pub fn style_id(self) -> &'static str {
        match self {
            HeadingStyle::Heading1 => "Heading1",
            HeadingStyle::Heading2 => "Heading2",
            HeadingStyle::Heading3 => "Heading3",
            HeadingStyle::Heading4 => "Heading4",
            HeadingStyle::Heading5 => "Heading5",
            HeadingStyle::Heading6 => "Heading6",
        }
    }
}

/// A table cell holding a single paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
}

/// Block-level elements of the target document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `style` is `None` for depths outside 1..=6, which render as plain paragraphs
    Heading {
        style: Option<HeadingStyle>,
        text: String,
    },
    Paragraph {
        text: String,
    },
    StyledParagraph {
        runs: Vec<Run>,
        bulleted: bool,
        bullet_level: u8,
    },
    CodeBlock {
        text: String,
        font: String,
    },
    Quote {
        text: String,
        style: String,
    },
    Table {
        rows: Vec<Vec<Cell>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionKind {
    #[default]
    Continuous,
}

/// A run of blocks sharing one set of section properties
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub kind: SectionKind,
    pub children: Vec<Block>,
}

/// The document handed to the serializer: a single continuous section
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    /// Wrap blocks into one continuous section. An empty block list gives a
    /// valid, empty document.
    pub fn assemble(blocks: Vec<Block>) -> Self {
        Self {
            sections: vec![Section {
                kind: SectionKind::Continuous,
                children: blocks,
            }],
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|section| section.children.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_style_covers_one_through_six() {
        for depth in 1..=6 {
            let style = HeadingStyle::from_depth(depth).unwrap();
            assert_eq!(style.level(), depth);
            assert_eq!(style.style_id(), format!("Heading{depth}"));
        }
        assert_eq!(HeadingStyle::from_depth(0), None);
        assert_eq!(HeadingStyle::from_depth(7), None);
    }

    #[test]
    fn assemble_makes_one_continuous_section() {
        let doc = Document::assemble(vec![Block::Paragraph {
            text: "x".to_string(),
        }]);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].kind, SectionKind::Continuous);
        assert_eq!(doc.blocks().count(), 1);
    }

    #[test]
    fn empty_document_is_valid() {
        let doc = Document::assemble(Vec::new());
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].children.is_empty());
    }
}
