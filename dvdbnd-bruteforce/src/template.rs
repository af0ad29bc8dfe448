//! Path templates with `{i}` placeholders.
//!
//! A template is literal text with numbered slots, one per generator,
//! substituted in order: `/chr/c{0}{1}.anibnd`. Slots must appear in
//! ascending order without gaps, which lets the search build candidate
//! paths incrementally with O(1) truncation.

use crate::{Result, SearchError};

/// A parsed template: `slots + 1` literal parts with a slot between each
/// consecutive pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<String>,
}

impl Template {
    /// Parse template text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = vec![String::new()];
        let mut rest = text;
        let mut next_slot = 0usize;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            let last = parts.len() - 1;
            parts[last].push_str(literal);

            let close = tail
                .find('}')
                .ok_or_else(|| SearchError::InvalidTemplate(format!("unclosed slot in {text:?}")))?;
            let digits = &tail[1..close];
            let slot: usize = digits.parse().map_err(|_| {
                SearchError::InvalidTemplate(format!("bad slot index {digits:?} in {text:?}"))
            })?;
            if slot != next_slot {
                return Err(SearchError::InvalidTemplate(format!(
                    "slot {{{slot}}} out of order in {text:?}; slots must ascend from 0"
                )));
            }

            next_slot += 1;
            parts.push(String::new());
            rest = &tail[close + 1..];
        }

        if let Some(last) = parts.last_mut() {
            last.push_str(rest);
        }

        Ok(Self { parts })
    }

    /// Number of slots.
    pub fn slots(&self) -> usize {
        self.parts.len() - 1
    }

    /// Literal part `i`, preceding slot `i`.
    pub fn part(&self, i: usize) -> &str {
        &self.parts[i]
    }

    /// Substitute fragments into the slots. Fragment count must match.
    pub fn render(&self, fragments: &[&str]) -> String {
        let mut out = self.parts[0].clone();
        for (fragment, part) in fragments.iter().zip(&self.parts[1..]) {
            out.push_str(fragment);
            out.push_str(part);
        }
        out
    }
}
