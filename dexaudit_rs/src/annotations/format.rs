//! Annotation formats.
//!
//! A format is a regex with a fixed capture layout: `key_fields` key
//! captures, then the order capture, then the payload capture. The two
//! conventions used across the resource files ship built in; more can be
//! declared in the config file.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuditError, Result};

pub const POSITIONED: &str = "positioned";
pub const TYPED: &str = "typed";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

/// `@<category>[,] <position>, <name>`. The category runs up to the last
/// separator before an integer position; the name takes the rest of the line.
/// The leading `.*` makes the last workable `@` win, so `me@host` credits
/// earlier on the line are skipped.
pub(crate) fn regex_positioned() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r".*@([^,]+)(?:,\s*|\s+)([+-]?\d+),\s*(.*)$"))
}

/// `@<type> <subtype>[,] <order>, <effect>`. The effect stops at the next
/// comma; anything after it is ignored.
pub(crate) fn regex_typed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r".*@(\S+)\s+([^,]+?)(?:,\s*|\s+)([^,\s]+),\s*([^,]*)"))
}

/// How the order field is keyed and sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKeying {
    /// Must be an integer; grouped and sorted by value (`03` joins `3`).
    #[default]
    Numeric,
    /// Grouped by the raw string, sorted by its integer coercion.
    Text,
}

/// Sort/group key derived from an order field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub label: String,
    pub rank: i64,
}

/// One annotation scraped from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub key: Vec<String>,
    pub order: OrderKey,
    pub payload: String,
}

impl Annotation {
    /// Outer grouping key: key fields joined by a space.
    pub fn group_key(&self) -> String {
        self.key.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationFormat {
    name: String,
    pattern: Regex,
    key_fields: usize,
    order: OrderKeying,
    separate_groups: bool,
}

impl AnnotationFormat {
    /// Compile a custom format. The pattern must have exactly
    /// `key_fields + 2` capture groups.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        key_fields: usize,
        order: OrderKeying,
    ) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| AuditError::Pattern {
            name: name.clone(),
            source,
        })?;
        let found = pattern.captures_len() - 1;
        let expected = key_fields + 2;
        if found != expected {
            return Err(AuditError::FieldCount {
                name,
                expected,
                found,
            });
        }
        Ok(Self {
            name,
            pattern,
            key_fields,
            order,
            separate_groups: false,
        })
    }

    /// Print a blank line after each group in the text report.
    pub fn with_group_separator(mut self, separate: bool) -> Self {
        self.separate_groups = separate;
        self
    }

    /// Category + integer position + name (`// @attack 3, Bite`).
    pub fn positioned() -> Self {
        Self {
            name: POSITIONED.to_string(),
            pattern: regex_positioned().clone(),
            key_fields: 1,
            order: OrderKeying::Numeric,
            separate_groups: false,
        }
    }

    /// Type + subtype + order + effect (`// @status burn 1, damage`).
    pub fn typed() -> Self {
        Self {
            name: TYPED.to_string(),
            pattern: regex_typed().clone(),
            key_fields: 2,
            order: OrderKeying::Text,
            separate_groups: true,
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            POSITIONED => Some(Self::positioned()),
            TYPED => Some(Self::typed()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_fields(&self) -> usize {
        self.key_fields
    }

    pub fn order(&self) -> OrderKeying {
        self.order
    }

    pub fn separate_groups(&self) -> bool {
        self.separate_groups
    }

    /// Apply the pattern to one line. Only the first match counts.
    pub fn extract(&self, line: &str) -> Option<Annotation> {
        let caps = self.pattern.captures(line)?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str().trim());

        let key = (1..=self.key_fields).map(|i| field(i).to_string()).collect();
        let raw_order = field(self.key_fields + 1);
        let order = match self.order {
            OrderKeying::Numeric => match raw_order.parse::<i64>() {
                Ok(rank) => OrderKey {
                    label: rank.to_string(),
                    rank,
                },
                Err(e) => {
                    debug!("{}: order {:?} is not an integer: {}", self.name, raw_order, e);
                    return None;
                }
            },
            OrderKeying::Text => OrderKey {
                label: raw_order.to_string(),
                rank: coerce_order(raw_order),
            },
        };

        Some(Annotation {
            key,
            order,
            payload: field(self.key_fields + 2).to_string(),
        })
    }
}

/// Integer value of the leading `[+-]digits` run, 0 when there is none.
/// Out-of-range values saturate.
pub fn coerce_order(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 0;
    }
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    signed
        .parse()
        .unwrap_or(if negative { i64::MIN } else { i64::MAX })
}
