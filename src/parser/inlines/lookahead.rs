//! Forward searches over the text an inline scan is working through.
//!
//! A construct that fails to close is retried from every later opener, so
//! each search remembers how far it got. Scans that step over
//! backslash-escaped pairs land on the same offsets whatever opener they
//! started from (an opener is never preceded by a backslash), which is what
//! lets a failure from one offset stand for every later one.

use std::collections::{HashMap, HashSet};

/// Which emphasis scan an entry in `Lookahead::emph_misses` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Emph {
    Single,
    Double,
    Triple,
}

#[derive(Debug)]
pub(crate) struct Lookahead {
    /// Last answer per byte for `next_byte`: from where, and what was found.
    next: Vec<(u8, usize, Option<usize>)>,
    /// Matching `]` for each `[`, filled on the first link attempt.
    brackets: Option<Brackets>,
    /// No `)` ends a link target or `^(…)` at or after this offset.
    pub paren_miss: usize,
    /// No `!<` closes an inline spoiler at or after this offset.
    pub spoiler_miss: usize,
    /// No byte ends an `<scheme:…>` autolink at or after this offset.
    pub angle_miss: usize,
    /// `(length, from)`: no run of `length` backticks closes a code span
    /// started at or after `from`.
    backtick_misses: Vec<(usize, usize)>,
    /// Candidate closers from which an emphasis scan is known to run out.
    emph_misses: HashSet<(Emph, u8, usize)>,
}

impl Default for Lookahead {
    fn default() -> Self {
        Lookahead {
            next: Vec::new(),
            brackets: None,
            paren_miss: usize::MAX,
            spoiler_miss: usize::MAX,
            angle_miss: usize::MAX,
            backtick_misses: Vec::new(),
            emph_misses: HashSet::new(),
        }
    }
}

impl Lookahead {
    /// The first `b` at or after `from`.
    pub fn next_byte(&mut self, text: &[u8], b: u8, from: usize) -> Option<usize> {
        let slot = self.next.iter().position(|&(nb, _, _)| nb == b);
        if let Some(slot) = slot {
            let (_, start, found) = self.next[slot];
            if start <= from && found.map_or(true, |f| from <= f) {
                return found;
            }
        }

        let found = text
            .get(from..)
            .and_then(|rest| rest.iter().position(|&c| c == b))
            .map(|n| from + n);
        match slot {
            Some(slot) => self.next[slot] = (b, from, found),
            None => self.next.push((b, from, found)),
        }
        found
    }

    /// The offset just past the run of `len` backticks closing a code span
    /// whose content starts at `from`. `from` must follow a whole run.
    pub fn backtick_close(&mut self, text: &[u8], from: usize, len: usize) -> Option<usize> {
        if self
            .backtick_misses
            .iter()
            .any(|&(l, f)| l <= len && f <= from)
        {
            return None;
        }

        let mut run = 0;
        let mut longest = 0;
        let mut i = from;
        while i < text.len() && run < len {
            if text[i] == b'`' {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
            i += 1;
        }

        if run < len {
            // Nothing from `from` on is longer than `longest`.
            let len = longest + 1;
            match self.backtick_misses.iter_mut().find(|(l, _)| *l == len) {
                Some(miss) => miss.1 = miss.1.min(from),
                None => self.backtick_misses.push((len, from)),
            }
            return None;
        }
        Some(i)
    }

    /// The `]` closing the `[` at `open`, and whether a newline lies
    /// between the two.
    pub fn bracket_close(&mut self, text: &[u8], open: usize) -> Option<(usize, bool)> {
        let brackets = self.brackets.get_or_insert_with(|| Brackets::new(text));
        let close = *brackets.close.get(&open)?;
        let nl = brackets.newlines.partition_point(|&n| n <= open);
        Some((close, nl < brackets.newlines.len() && brackets.newlines[nl] < close))
    }

    pub fn emph_missed(&self, kind: Emph, c: u8, at: usize) -> bool {
        self.emph_misses.contains(&(kind, c, at))
    }

    pub fn emph_miss(&mut self, kind: Emph, c: u8, rejected: Vec<usize>) {
        self.emph_misses
            .extend(rejected.into_iter().map(|at| (kind, c, at)));
    }
}

/// `[`/`]` pairs as the link scanner counts them: a bracket straight after
/// a backslash is not counted, and such a `[` closes along with whatever
/// counted bracket encloses it (or with the first surplus `]`).
#[derive(Debug)]
struct Brackets {
    close: HashMap<usize, usize>,
    newlines: Vec<usize>,
}

impl Brackets {
    fn new(text: &[u8]) -> Self {
        let mut close = HashMap::new();
        let mut newlines = Vec::new();
        let mut open: Vec<(usize, Vec<usize>)> = Vec::new();
        let mut loose = Vec::new();

        for (i, &c) in text.iter().enumerate() {
            let escaped = i > 0 && text[i - 1] == b'\\';
            match c {
                b'\n' => newlines.push(i),
                b'[' if escaped => match open.last_mut() {
                    Some((_, inner)) => inner.push(i),
                    None => loose.push(i),
                },
                b'[' => open.push((i, Vec::new())),
                b']' if !escaped => match open.pop() {
                    Some((o, inner)) => {
                        close.insert(o, i);
                        close.extend(inner.into_iter().map(|s| (s, i)));
                    }
                    None => close.extend(loose.drain(..).map(|s| (s, i))),
                },
                _ => (),
            }
        }

        Brackets { close, newlines }
    }
}
