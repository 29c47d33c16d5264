//! Query parameter templating
//!
//! Every maximal run of [`PLACEHOLDER`] in a query template is a parameter slot. A slot of
//! width `L` renders the attempt counter modulo `10^L`, zero-padded to `L` digits. All slots in
//! a template render the same counter, so `a=%% and b=%%%%` with counter `7` becomes
//! `a=07 and b=0007`.
use crate::PLACEHOLDER;

/// A maximal run of placeholder characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderRun {
    /// Byte offset of the first placeholder character.
    pub start: usize,
    /// Number of placeholder characters.
    pub len: usize,
}

impl PlaceholderRun {
    fn end(&self) -> usize {
        self.start + self.len * PLACEHOLDER.len_utf8()
    }

    fn render(&self, counter: u64) -> String {
        let value = match modulus(self.len) {
            Some(m) => counter % m,
            None => counter,
        };
        format!("{value:0width$}", width = self.len)
    }
}

/// A parsed query template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
    runs: Vec<PlaceholderRun>,
}

impl QueryTemplate {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = scan_runs(&text);
        Self { text, runs }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[PlaceholderRun] {
        &self.runs
    }

    pub fn has_placeholders(&self) -> bool {
        !self.runs.is_empty()
    }

    /// `10^L` for the longest run `L`, or `1` without placeholders.
    ///
    /// Saturates at `u64::MAX` for runs longer than 19 characters.
    pub fn cardinality(&self) -> u64 {
        match self.runs.iter().map(|r| r.len).max() {
            Some(len) => modulus(len).unwrap_or(u64::MAX),
            None => 1,
        }
    }

    /// Substitute `counter` into every run. The counter is never wrapped here beyond the
    /// per-run modulo.
    pub fn render(&self, counter: u64) -> String {
        if self.runs.is_empty() {
            return self.text.clone();
        }

        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for run in &self.runs {
            out.push_str(&self.text[cursor..run.start]);
            out.push_str(&run.render(counter));
            cursor = run.end();
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

impl From<&str> for QueryTemplate {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for QueryTemplate {
    fn from(text: String) -> Self {
        Self::parse(text)
    }
}

/// Cardinality of the parameter space described by `template`.
pub fn cardinality(template: &str) -> u64 {
    QueryTemplate::parse(template).cardinality()
}

/// Render `template` for `counter`.
pub fn render(template: &str, counter: u64) -> String {
    QueryTemplate::parse(template).render(counter)
}

fn scan_runs(text: &str) -> Vec<PlaceholderRun> {
    let mut runs = vec![];
    let mut current: Option<PlaceholderRun> = None;

    for (idx, ch) in text.char_indices() {
        if ch == PLACEHOLDER {
            match &mut current {
                Some(run) => run.len += 1,
                None => current = Some(PlaceholderRun { start: idx, len: 1 }),
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);

    runs
}

fn modulus(len: usize) -> Option<u64> {
    u32::try_from(len).ok().and_then(|len| 10u64.checked_pow(len))
}
