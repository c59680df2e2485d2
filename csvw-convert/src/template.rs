//! Placeholder templates
//!
//! Grammar: `{name}` substitutes the cell value of column `name`; `{_row}`
//! substitutes the global row index. A placeholder may carry one integer
//! operation, `{_row + 1}` or `{year - 1900}`, applied when the value parses
//! as an integer. Double braces (`{{_row}}`) are accepted as an alias.
//!
//! Malformed placeholders never fail a row: their text is kept verbatim and
//! a warning is logged.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::row::Row;

/// Name of the synthetic row-index placeholder
pub const ROW_PLACEHOLDER: &str = "_row";

static ARITHMETIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*([-+*/%])\s*(-?\d+)$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl Op {
    fn parse(symbol: &str) -> Option<Op> {
        match symbol {
            "+" => Some(Op::Add),
            "-" => Some(Op::Sub),
            "*" => Some(Op::Mul),
            "/" => Some(Op::Div),
            "%" => Some(Op::Rem),
            _ => None,
        }
    }

    fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            Op::Div => lhs.checked_div(rhs),
            Op::Rem => lhs.checked_rem(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Var(String),
    /// `{name op operand}`; `raw` is the whole placeholder body, which wins
    /// when a column by that exact name exists (e.g. `{birth-1}`)
    Arith {
        raw: String,
        name: String,
        op: Op,
        operand: i64,
        source: String,
    },
    /// Unparseable placeholder text, emitted as-is
    Verbatim(String),
}

/// A parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
    malformed: bool,
}

impl Template {
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut malformed = false;
        let mut text = String::new();
        let mut rest = pattern;

        while let Some(pos) = rest.find(&['{', '}'][..]) {
            text.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with('}') {
                malformed = true;
                text.push('}');
                rest = &tail[1..];
                continue;
            }

            let (open, close) = if tail.starts_with("{{") {
                ("{{", "}}")
            } else {
                ("{", "}")
            };
            let body_start = open.len();
            let Some(end) = tail[body_start..].find(close) else {
                malformed = true;
                text.push_str(tail);
                rest = "";
                break;
            };
            let body = &tail[body_start..body_start + end];
            let whole = &tail[..body_start + end + close.len()];
            rest = &tail[whole.len()..];

            match parse_placeholder(body, whole) {
                Some(segment) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(segment);
                }
                None => {
                    malformed = true;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Verbatim(whole.to_string()));
                }
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        if malformed {
            tracing::warn!(pattern, "malformed placeholder syntax; keeping text verbatim");
        }

        Template {
            segments,
            malformed,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    /// Whether the pattern has no placeholders at all
    pub fn is_constant(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Text(_)))
    }

    pub fn render(&self, row: &Row) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) | Segment::Verbatim(text) => out.push_str(text),
                Segment::Var(name) => match lookup(row, name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        tracing::debug!(row = row.index(), column = %name, "placeholder column absent; rendering empty");
                    }
                },
                Segment::Arith {
                    raw,
                    name,
                    op,
                    operand,
                    source,
                } => {
                    if let Some(value) = row.get(raw) {
                        out.push_str(value);
                        continue;
                    }
                    let computed = lookup(row, name)
                        .and_then(|v| v.trim().parse::<i64>().ok())
                        .and_then(|v| op.apply(v, *operand));
                    match computed {
                        Some(v) => out.push_str(&v.to_string()),
                        None => {
                            tracing::warn!(
                                row = row.index(),
                                placeholder = %source,
                                "cannot evaluate placeholder arithmetic; keeping text verbatim"
                            );
                            out.push_str(source);
                        }
                    }
                }
            }
        }
        out
    }
}

fn parse_placeholder(body: &str, whole: &str) -> Option<Segment> {
    let body = body.trim();
    if body.is_empty() || body.contains(&['{', '}'][..]) {
        return None;
    }
    if let Some(caps) = ARITHMETIC_RE.captures(body) {
        let name = caps[1].trim().to_string();
        let op = Op::parse(&caps[2])?;
        let operand: i64 = caps[3].parse().ok()?;
        if operand == 0 && matches!(op, Op::Div | Op::Rem) {
            return None;
        }
        return Some(Segment::Arith {
            raw: body.to_string(),
            name,
            op,
            operand,
            source: whole.to_string(),
        });
    }
    Some(Segment::Var(body.to_string()))
}

fn lookup<'r>(row: &'r Row, name: &str) -> Option<std::borrow::Cow<'r, str>> {
    if name == ROW_PLACEHOLDER {
        return Some(std::borrow::Cow::Owned(row.index().to_string()));
    }
    row.get(name).map(std::borrow::Cow::Borrowed)
}

/// Memoizing renderer; one per row processor
#[derive(Debug, Default)]
pub struct TemplateRenderer {
    cache: FxHashMap<String, Arc<Template>>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed form of `pattern`, cached after first use
    pub fn template(&mut self, pattern: &str) -> Arc<Template> {
        if let Some(t) = self.cache.get(pattern) {
            return Arc::clone(t);
        }
        let parsed = Arc::new(Template::parse(pattern));
        self.cache.insert(pattern.to_string(), Arc::clone(&parsed));
        parsed
    }

    pub fn render(&mut self, pattern: &str, row: &Row) -> String {
        self.template(pattern).render(row)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
