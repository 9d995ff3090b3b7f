use std::ops::Range;

/// Markdown source plus the current selection, as byte offsets into `text`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextState {
    pub text: String,
    pub selection: Range<usize>,
}

impl TextState {
    pub fn new(text: impl Into<String>, selection: Range<usize>) -> Self {
        let text = text.into();
        let start = floor_char_boundary(&text, selection.start);
        let end = floor_char_boundary(&text, selection.end.max(start));
        Self {
            text,
            selection: start..end,
        }
    }

    fn selected(&self) -> &str {
        &self.text[self.selection.clone()]
    }
}

fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Textarea selection offsets are UTF-16 code units.
pub(crate) fn utf16_to_byte(text: &str, pos: u32) -> usize {
    let mut units = 0u32;
    for (i, c) in text.char_indices() {
        if units >= pos {
            return i;
        }
        units += c.len_utf16() as u32;
    }
    text.len()
}

pub(crate) fn byte_to_utf16(text: &str, byte: usize) -> u32 {
    text[..floor_char_boundary(text, byte)].encode_utf16().count() as u32
}

fn trailing_run(s: &str, c: char) -> usize {
    s.chars().rev().take_while(|x| *x == c).count()
}

fn leading_run(s: &str, c: char) -> usize {
    s.chars().take_while(|x| *x == c).count()
}

/// A run of marker characters closes `marker` when it is the marker itself or,
/// for `*` markers, the `***` run shared by bold and italic.
fn closes(run: usize, marker: &str) -> bool {
    run == marker.len() || (run == 3 && marker.starts_with('*'))
}

/// Wrap the selection in `marker`, or unwrap it when it is already wrapped.
///
/// Both `**x**` with `x` selected and a selection of `**x**` itself count as
/// wrapped. `marker` must be a run of one ASCII character (`*`, `**`, `~~`).
pub(crate) fn toggle_inline(state: &TextState, marker: &str) -> TextState {
    let Some(c) = marker.chars().next() else {
        return state.clone();
    };
    let m = marker.len();
    let sel = state.selection.clone();
    let before = &state.text[..sel.start];
    let after = &state.text[sel.end..];
    let selected = state.selected();

    if closes(trailing_run(before, c), marker) && closes(leading_run(after, c), marker) {
        let text = format!("{}{}{}", &before[..before.len() - m], selected, &after[m..]);
        return TextState {
            text,
            selection: sel.start - m..sel.end - m,
        };
    }

    if selected.len() > 2 * m
        && closes(leading_run(selected, c), marker)
        && closes(trailing_run(selected, c), marker)
    {
        let inner = &selected[m..selected.len() - m];
        let text = format!("{before}{inner}{after}");
        return TextState {
            text,
            selection: sel.start..sel.start + inner.len(),
        };
    }

    TextState {
        text: format!("{before}{marker}{selected}{marker}{after}"),
        selection: sel.start + m..sel.end + m,
    }
}

/// Replace the selection with `[selection](url)`.
///
/// The link text stays selected; with an empty selection the cursor lands
/// between the brackets.
pub(crate) fn insert_link(state: &TextState, url: &str) -> TextState {
    let sel = state.selection.clone();
    let label = state.selected();
    let text = format!(
        "{}[{}]({}){}",
        &state.text[..sel.start],
        label,
        url,
        &state.text[sel.end..]
    );
    let start = sel.start + 1;
    TextState {
        text,
        selection: start..start + label.len(),
    }
}

/// Bounded undo/redo stacks of editor snapshots.
#[derive(Debug)]
pub(crate) struct History {
    undo: Vec<TextState>,
    redo: Vec<TextState>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Remember the state an edit started from. Any redo branch is dropped.
    pub fn record(&mut self, before: TextState) {
        if self.undo.last().map(|s| &s.text) == Some(&before.text) {
            return;
        }
        self.undo.push(before);
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    pub fn undo(&mut self, current: TextState) -> Option<TextState> {
        let prev = self.undo.pop()?;
        self.redo.push(current);
        Some(prev)
    }

    pub fn redo(&mut self, current: TextState) -> Option<TextState> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
