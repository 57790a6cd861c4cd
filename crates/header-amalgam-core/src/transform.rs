//! Per-unit content transformation
//!
//! Removes a unit's own include guard and every include line, leaving the
//! substantive content. Running the transformer over its own output is a
//! no-op: once the guard and includes are gone there is nothing left to strip.

use regex::Regex;

use crate::config::AmalgamConfig;
use crate::error::Result;
use crate::extractor::IncludeMatcher;

#[derive(Debug, Clone)]
pub struct ContentTransformer {
    matcher: IncludeMatcher,
    guard_open: Regex,
    guard_define: Regex,
    guard_close: Regex,
}

/// Line positions of a unit's guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GuardLines {
    ifndef: usize,
    define: usize,
    endif: usize,
}

impl ContentTransformer {
    pub fn new(config: &AmalgamConfig) -> Result<Self> {
        let symbol = format!(
            r"({}_[A-Z0-9_]+_{})",
            regex::escape(&config.guard_prefix),
            regex::escape(&config.guard_suffix())
        );

        Ok(Self {
            matcher: IncludeMatcher::new(config)?,
            guard_open: Regex::new(&format!(r"^\s*#\s*ifndef\s+{}\s*$", symbol))?,
            guard_define: Regex::new(&format!(r"^\s*#\s*define\s+{}\s*$", symbol))?,
            guard_close: Regex::new(r"^\s*#\s*endif\b(.*)$")?,
        })
    }

    pub fn matcher(&self) -> &IncludeMatcher {
        &self.matcher
    }

    pub fn transform(&self, lines: &[String]) -> Vec<String> {
        let guard = self.find_guard(lines);

        lines
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                guard.map_or(true, |g| *i != g.ifndef && *i != g.define && *i != g.endif)
            })
            .filter(|(_, line)| !self.matcher.classify(line).is_include())
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Locate `#ifndef SYM` immediately followed by `#define SYM`, and the
    /// last `#endif` of the unit as its close, whatever trails it. A close
    /// whose comment names a different symbol does not belong to this guard,
    /// and no earlier `#endif` is ever taken in its place.
    fn find_guard(&self, lines: &[String]) -> Option<GuardLines> {
        let (ifndef, symbol) = lines.iter().enumerate().find_map(|(i, line)| {
            self.guard_open
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| (i, m.as_str()))
        })?;

        let define = ifndef + 1;
        let defined = self
            .guard_define
            .captures(lines.get(define)?)
            .and_then(|c| c.get(1))?;
        if defined.as_str() != symbol {
            return None;
        }

        let (endif, closed) = lines
            .iter()
            .enumerate()
            .skip(define + 1)
            .filter_map(|(i, line)| {
                self.guard_close
                    .captures(line)
                    .and_then(|c| c.get(1))
                    .map(|rest| (i, rest.as_str()))
            })
            .last()?;
        if close_comment_symbol(closed).is_some_and(|name| name != symbol) {
            return None;
        }

        Some(GuardLines {
            ifndef,
            define,
            endif,
        })
    }
}

/// Symbol named by the comment after `#endif`, as in `// SYM` or `/* SYM */`.
/// Comments that do not start with a guard-like word name no symbol.
fn close_comment_symbol(rest: &str) -> Option<&str> {
    let rest = rest.trim();
    let comment = match rest.strip_prefix("//") {
        Some(comment) => comment,
        None => rest.strip_prefix("/*")?.trim_end().trim_end_matches("*/"),
    };
    comment.split_whitespace().next().filter(|word| {
        word.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    })
}
