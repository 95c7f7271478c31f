//! Inline span parsing for the analysis narrative.
//!
//! The dialect knows one inline style: `**bold**`. The first closing `**` always ends the
//! span, and a `**` without a closing partner stays in the text as literal characters.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold span pattern"));
static UNDERSCORE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.+?)__").expect("underscore span pattern"));
static LEADING_HASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s*").expect("leading hash pattern"));

/// A contiguous span of inline text sharing one style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Run {
    Plain { text: String },
    Bold { text: String },
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Run::Plain { text: text.into() }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Run::Bold { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Run::Plain { text } | Run::Bold { text } => text,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, Run::Bold { .. })
    }
}

/// Splits `text` into plain and bold runs.
///
/// Concatenating the returned run texts gives `text` with the delimiters of every matched
/// bold span removed. Input without a matched span comes back as one plain run, including
/// empty input.
pub fn inline_parse(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut last = 0;

    for captures in BOLD_SPAN.captures_iter(text) {
        let (Some(whole), Some(content)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > last {
            runs.push(Run::plain(&text[last..whole.start()]));
        }
        runs.push(Run::bold(content.as_str()));
        last = whole.end();
    }

    if runs.is_empty() {
        return vec![Run::plain(text)];
    }
    if last < text.len() {
        runs.push(Run::plain(&text[last..]));
    }
    runs
}

/// Concatenates the text of `runs` in order.
pub fn runs_text(runs: &[Run]) -> String {
    runs.iter().map(Run::text).collect()
}

/// Removes markup from text that is shown without run styling.
///
/// Paired `**` and `__` spans are unwrapped (first closing delimiter wins), any delimiters
/// left over are dropped, and leading `#` characters with the whitespace after them go.
pub fn strip_markers(text: &str) -> String {
    let unwrapped = BOLD_SPAN.replace_all(text, "$1");
    let unwrapped = UNDERSCORE_SPAN.replace_all(&unwrapped, "$1");
    let residual = unwrapped.replace("**", "").replace("__", "");
    LEADING_HASHES.replace(residual.trim_start(), "").into_owned()
}
