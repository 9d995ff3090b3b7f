mod dom;

pub(crate) use dom::highlight_subtree;

use std::ops::Range;

/// Characters skipped while matching, both in the term and between matched characters.
pub(crate) const IGNORED_PUNCTUATION: &[char] = &[
    ':', ';', '.', ',', '-', '–', '—', '‒', '_', '(', ')', '{', '}', '[', ']', '!', '\'', '"', '+',
    '=',
];

fn is_ignored(c: char) -> bool {
    IGNORED_PUNCTUATION.contains(&c)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Search field value with quote characters removed.
pub(crate) fn normalize_term(raw: &str) -> String {
    raw.chars().filter(|c| *c != '"' && *c != '\'').collect()
}

/// A piece of a text node after highlighting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fragment {
    Text(String),
    Mark(String),
}

/// Case-insensitive matcher for every word of a search term.
#[derive(Clone, Debug, Default)]
pub(crate) struct TermMatcher {
    words: Vec<Vec<char>>,
}

impl TermMatcher {
    pub fn new(term: &str) -> Self {
        let words = normalize_term(term)
            .split_whitespace()
            .map(|w| w.chars().filter(|c| !is_ignored(*c)).map(fold).collect::<Vec<_>>())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Byte ranges of non-overlapping matches, left to right.
    ///
    /// At each position the longest matching word wins.
    pub fn find(&self, text: &str) -> Vec<Range<usize>> {
        if self.words.is_empty() {
            return vec![];
        }

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let byte_at = |i: usize| chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());

        let mut out = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let best = self
                .words
                .iter()
                .filter_map(|w| match_at(&chars, i, w))
                .max();

            match best {
                Some(end) => {
                    out.push(byte_at(i)..byte_at(end));
                    i = end;
                }
                None => i += 1,
            }
        }
        out
    }

    pub fn fragments(&self, text: &str) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut last = 0;
        for r in self.find(text) {
            if r.start > last {
                out.push(Fragment::Text(text[last..r.start].to_string()));
            }
            out.push(Fragment::Mark(text[r.clone()].to_string()));
            last = r.end;
        }
        if last < text.len() {
            out.push(Fragment::Text(text[last..].to_string()));
        }
        out
    }
}

/// End char index when `word` matches at `start`, allowing ignored punctuation between characters.
fn match_at(chars: &[(usize, char)], start: usize, word: &[char]) -> Option<usize> {
    let mut j = start;
    for (k, want) in word.iter().enumerate() {
        if k > 0 {
            while j < chars.len() && is_ignored(chars[j].1) {
                j += 1;
            }
        }
        let (_, got) = chars.get(j)?;
        if fold(*got) != *want {
            return None;
        }
        j += 1;
    }
    Some(j)
}
