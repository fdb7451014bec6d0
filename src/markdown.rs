//! Line-oriented Markdown parser for streamed pitches.
//!
//! The parser is re-run on the whole accumulated text every time a fragment
//! arrives, so it is a pure function of its input: no counters, no state
//! carried between calls. It understands just enough Markdown for a pitch:
//! three heading levels, bulleted lists, paragraphs and `**bold**` spans.

/// An inline run of text inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Text rendered as-is.
    Plain(String),
    /// Text that was wrapped in `**...**`.
    Bold(String),
}

impl Inline {
    /// The text of this span without any markers.
    pub fn text(&self) -> &str {
        match self {
            Inline::Plain(text) | Inline::Bold(text) => text,
        }
    }

    /// Whether this span is emphasized.
    pub fn is_bold(&self) -> bool {
        matches!(self, Inline::Bold(_))
    }
}

/// A block-level unit of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `# ` heading.
    Title(Vec<Inline>),
    /// `## ` heading.
    Section(Vec<Inline>),
    /// `### ` heading.
    Subsection(Vec<Inline>),
    /// Any line that is not a heading or list item.
    Paragraph(Vec<Inline>),
    /// A run of consecutive `- ` / `* ` items.
    List(Vec<Vec<Inline>>),
}

impl Block {
    /// Returns true for any of the heading variants.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            Block::Title(_) | Block::Section(_) | Block::Subsection(_)
        )
    }
}

/// Classification of a single trimmed source line.
enum LineKind<'a> {
    Title(&'a str),
    Section(&'a str),
    Subsection(&'a str),
    ListItem(&'a str),
    Paragraph(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("# ") {
        LineKind::Title(rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        LineKind::Section(rest)
    } else if let Some(rest) = line.strip_prefix("### ") {
        LineKind::Subsection(rest)
    } else if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
    {
        LineKind::ListItem(rest)
    } else {
        LineKind::Paragraph(line)
    }
}

/// Parse the full text into blocks.
///
/// Empty lines are dropped, consecutive list items are grouped into one
/// [`Block::List`], and heading levels are taken at face value.
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending_items: Vec<Vec<Inline>> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let kind = classify(line);

        if !matches!(kind, LineKind::ListItem(_)) && !pending_items.is_empty() {
            blocks.push(Block::List(std::mem::take(&mut pending_items)));
        }

        match kind {
            LineKind::Title(rest) => blocks.push(Block::Title(parse_inline(rest))),
            LineKind::Section(rest) => blocks.push(Block::Section(parse_inline(rest))),
            LineKind::Subsection(rest) => blocks.push(Block::Subsection(parse_inline(rest))),
            LineKind::ListItem(rest) => pending_items.push(parse_inline(rest)),
            LineKind::Paragraph(rest) => blocks.push(Block::Paragraph(parse_inline(rest))),
        }
    }

    if !pending_items.is_empty() {
        blocks.push(Block::List(pending_items));
    }

    blocks
}

const BOLD_MARKER: &str = "**";

/// Split a line into plain and bold spans.
///
/// An opening `**` without a closing partner is kept as literal text, along
/// with everything after it. Empty spans are not emitted.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find(BOLD_MARKER) {
        let after_open = &rest[open + BOLD_MARKER.len()..];
        let Some(close) = after_open.find(BOLD_MARKER) else {
            break;
        };

        plain.push_str(&rest[..open]);
        if !plain.is_empty() {
            spans.push(Inline::Plain(std::mem::take(&mut plain)));
        }

        let bold = &after_open[..close];
        if !bold.is_empty() {
            spans.push(Inline::Bold(bold.to_string()));
        }

        rest = &after_open[close + BOLD_MARKER.len()..];
    }

    plain.push_str(rest);
    if !plain.is_empty() {
        spans.push(Inline::Plain(plain));
    }

    spans
}

/// Concatenate the text of a span list, dropping emphasis.
pub fn plain_text(spans: &[Inline]) -> String {
    spans.iter().map(Inline::text).collect()
}
