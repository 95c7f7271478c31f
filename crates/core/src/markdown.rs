//! Block parsing for the analysis narrative.
//!
//! The narrative arrives in a loose markdown-like dialect produced by a text-generation
//! service. It is parsed line by line into headings, list groups and paragraphs; anything
//! unrecognised is prose. Parsing never fails.
//!
//! Dialect accepted:
//! ```markdown
//! # Main heading
//! ## Section heading        (levels 2-4 share one style tier)
//! 1. ordered item
//! - bullet item             (also `*` and `•`)
//! Prose lines are joined into one paragraph until a blank line.
//! ```

use crate::inline::{inline_parse, runs_text, Run};
use crate::sanitize::normalize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Heading markers, longest first so `#### ` is never read as `# `.
const HEADING_MARKERS: [(&str, u8); 4] = [("#### ", 4), ("### ", 3), ("## ", 2), ("# ", 1)];

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.\s+(.+)$").expect("ordered item pattern"));
static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s+(.+)$").expect("bullet item pattern"));

/// One item of a list group. Items are inline-only; they never contain blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub runs: Vec<Run>,
}

impl ListItem {
    pub fn text(&self) -> String {
        runs_text(&self.runs)
    }
}

/// A block-level node of the parsed narrative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, runs: Vec<Run> },
    ListGroup { ordered: bool, items: Vec<ListItem> },
    Paragraph { runs: Vec<Run> },
}

/// Visual tier a renderer applies to a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    MainHeading,
    SubHeading,
    List,
    AnalysisText,
}

impl Block {
    pub fn style(&self) -> BlockStyle {
        match self {
            Block::Heading { level: 1, .. } => BlockStyle::MainHeading,
            Block::Heading { .. } => BlockStyle::SubHeading,
            Block::ListGroup { .. } => BlockStyle::List,
            Block::Paragraph { .. } => BlockStyle::AnalysisText,
        }
    }

    /// Visible text of the block with markup removed; list items are joined by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { runs, .. } | Block::Paragraph { runs } => runs_text(runs),
            Block::ListGroup { items, .. } => items
                .iter()
                .map(ListItem::text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Classification of a single input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    OrderedItem(&'a str),
    BulletItem(&'a str),
    Prose(&'a str),
}

/// Classifies one line. Surrounding whitespace is ignored.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    for (marker, level) in HEADING_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return LineKind::Heading {
                level,
                text: rest.trim(),
            };
        }
    }

    if let Some(item) = ORDERED_ITEM.captures(line).and_then(|c| c.get(2)) {
        return LineKind::OrderedItem(item.as_str());
    }
    if let Some(item) = BULLET_ITEM.captures(line).and_then(|c| c.get(1)) {
        return LineKind::BulletItem(item.as_str());
    }

    LineKind::Prose(line)
}

struct PendingList<'a> {
    ordered: bool,
    items: Vec<&'a str>,
}

#[derive(Default)]
struct BlockBuilder<'a> {
    blocks: Vec<Block>,
    paragraph: Vec<&'a str>,
    list: Option<PendingList<'a>>,
}

impl<'a> BlockBuilder<'a> {
    fn push_line(&mut self, kind: LineKind<'a>) {
        match kind {
            LineKind::Blank => {
                self.flush_list();
                self.flush_paragraph();
            }
            LineKind::Heading { level, text } => {
                self.flush_list();
                self.flush_paragraph();
                self.blocks.push(Block::Heading {
                    level,
                    runs: content_runs(text),
                });
            }
            LineKind::OrderedItem(item) => self.push_item(true, item),
            LineKind::BulletItem(item) => self.push_item(false, item),
            LineKind::Prose(line) => {
                self.flush_list();
                self.paragraph.push(line);
            }
        }
    }

    fn push_item(&mut self, ordered: bool, item: &'a str) {
        self.flush_paragraph();
        if self.list.as_ref().is_some_and(|list| list.ordered != ordered) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| PendingList {
                ordered,
                items: Vec::new(),
            })
            .items
            .push(item);
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let joined = self.paragraph.join(" ");
        self.paragraph.clear();
        let joined = joined.trim();
        if !joined.is_empty() {
            self.blocks.push(Block::Paragraph {
                runs: content_runs(joined),
            });
        }
    }

    fn flush_list(&mut self) {
        let Some(list) = self.list.take() else {
            return;
        };
        if list.items.is_empty() {
            return;
        }
        self.blocks.push(Block::ListGroup {
            ordered: list.ordered,
            items: list
                .items
                .into_iter()
                .map(|item| ListItem {
                    runs: content_runs(item),
                })
                .collect(),
        });
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_list();
        self.flush_paragraph();
        self.blocks
    }
}

/// Parses normalised narrative text into blocks.
///
/// Empty input gives no blocks. Non-empty input that yields no blocks (whitespace only)
/// comes back as a single paragraph holding the text unchanged, so content is never dropped
/// silently.
/// Inline runs for one block's content. A bold span with only whitespace inside would leave
/// the block blank, so such content stays one plain run with its `**` kept.
fn content_runs(text: &str) -> Vec<Run> {
    let runs = inline_parse(text);
    if runs_text(&runs).trim().is_empty() {
        return vec![Run::plain(text)];
    }
    runs
}

pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for line in text.split('\n') {
        builder.push_line(classify_line(line));
    }
    let blocks = builder.finish();

    if blocks.is_empty() && !text.is_empty() {
        tracing::debug!("narrative produced no blocks, falling back to a raw paragraph");
        return vec![Block::Paragraph {
            runs: vec![Run::plain(text)],
        }];
    }

    tracing::debug!("parsed {} narrative blocks", blocks.len());
    blocks
}

/// Sanitises raw narrative text and parses it into blocks.
pub fn parse_analysis(raw: Option<&str>) -> Vec<Block> {
    parse_blocks(&normalize(raw))
}
