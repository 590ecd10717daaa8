// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Text query parsing.
//!
//! # Query Language
//!
//! ```text
//! Title:"starship trooper"      - whole field value (phrase anywhere in AnyText)
//! Title:trooper                 - single term
//! trooper                       - term in AnyText
//! Title:null                    - field holds the null sentinel
//! Title:sea*  Title:s?a         - wildcards (* any run, ? one char)
//! Modified:[20090101 TO *]      - inclusive range, * is open
//! Modified:{20090101 TO 20100101} - exclusive range
//! A AND B   A OR B   A NOT B    - boolean operators, NOT is AND-NOT
//! NOT A                         - complement
//! metafile:doc                  - every document
//! ```

use super::QueryError;
use crate::catalog::{ANY_TEXT, DISCRIMINATOR_FIELD, DISCRIMINATOR_VALUE};
use crate::resolver::NULL_VALUE;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "search/lucene.pest"]
struct LuceneParser;

/// Parsed text query.
#[derive(Debug, Clone, PartialEq)]
pub enum TextQuery {
    /// Every document
    MatchAll,
    /// Bare term: consecutive analyzed tokens anywhere in the field
    Match { field: String, text: String },
    /// Quoted phrase: the field's analyzed tokens, all of them
    Phrase { field: String, text: String },
    /// Field stores the null sentinel
    Null { field: String },
    /// `*` / `?` pattern, raw (escapes preserved)
    Wildcard { field: String, pattern: String },
    /// Range over the untokenized value
    Range {
        field: String,
        lower: Bound,
        upper: Bound,
    },
    And(Vec<TextQuery>),
    Or(Vec<TextQuery>),
    /// Left side minus right side
    AndNot(Box<TextQuery>, Box<TextQuery>),
    /// Complement against every document
    Not(Box<TextQuery>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Unbounded,
    Inclusive(String),
    Exclusive(String),
}

/// Parses query text. Blank text is [`TextQuery::MatchAll`].
pub fn parse(input: &str) -> Result<TextQuery, QueryError> {
    if input.trim().is_empty() {
        return Ok(TextQuery::MatchAll);
    }

    let query = LuceneParser::parse(Rule::query, input)
        .map_err(|e| QueryError::Parse(e.to_string()))?
        .next()
        .ok_or_else(|| QueryError::Parse("empty input".into()))?;

    for inner in query.into_inner() {
        match inner.as_rule() {
            Rule::or_expr => return build_or(inner),
            Rule::EOI => {}
            r => return Err(QueryError::Parse(format!("unexpected rule: {r:?}"))),
        }
    }
    Ok(TextQuery::MatchAll)
}

fn build_or(pair: Pair<Rule>) -> Result<TextQuery, QueryError> {
    let mut parts = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::and_expr => parts.push(build_and(inner)?),
            Rule::or_op => {}
            r => return Err(QueryError::Parse(format!("unexpected in OR: {r:?}"))),
        }
    }
    if parts.len() == 1 {
        return Ok(parts.remove(0));
    }
    Ok(TextQuery::Or(parts))
}

fn build_and(pair: Pair<Rule>) -> Result<TextQuery, QueryError> {
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| QueryError::Parse("missing operand".into()))?;
    let mut acc = build_unary(first)?;

    while let Some(op) = inner.next() {
        let rhs = inner
            .next()
            .ok_or_else(|| QueryError::Parse(format!("{} needs a right operand", op.as_str())))?;
        let rhs = build_unary(rhs)?;
        acc = match op.as_rule() {
            Rule::and_op => match acc {
                TextQuery::And(mut parts) => {
                    parts.push(rhs);
                    TextQuery::And(parts)
                }
                other => TextQuery::And(vec![other, rhs]),
            },
            Rule::not_op => TextQuery::AndNot(Box::new(acc), Box::new(rhs)),
            r => return Err(QueryError::Parse(format!("unexpected operator: {r:?}"))),
        };
    }
    Ok(acc)
}

fn build_unary(pair: Pair<Rule>) -> Result<TextQuery, QueryError> {
    let mut negations = 0usize;
    let mut operand = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::not_op => negations += 1,
            Rule::group => {
                let body = inner
                    .into_inner()
                    .next()
                    .ok_or_else(|| QueryError::Parse("empty group".into()))?;
                operand = Some(build_or(body)?);
            }
            Rule::clause => operand = Some(build_clause(inner)?),
            r => return Err(QueryError::Parse(format!("unexpected operand: {r:?}"))),
        }
    }
    let operand = operand.ok_or_else(|| QueryError::Parse("NOT needs an operand".into()))?;
    Ok(if negations % 2 == 1 {
        TextQuery::Not(Box::new(operand))
    } else {
        operand
    })
}

fn build_clause(pair: Pair<Rule>) -> Result<TextQuery, QueryError> {
    let mut field = ANY_TEXT.to_string();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::field => field = inner.as_str().to_string(),
            Rule::phrase => {
                let text = unescape(phrase_text(inner));
                return Ok(match term_query(field, text) {
                    TextQuery::Match { field, text } => TextQuery::Phrase { field, text },
                    other => other,
                });
            }
            Rule::term => {
                let raw = inner.as_str();
                if has_wildcard(raw) {
                    return Ok(TextQuery::Wildcard {
                        field,
                        pattern: raw.to_string(),
                    });
                }
                if raw == NULL_VALUE {
                    return Ok(TextQuery::Null { field });
                }
                return Ok(term_query(field, unescape(raw)));
            }
            Rule::range => return build_range(field, inner),
            r => return Err(QueryError::Parse(format!("unexpected in clause: {r:?}"))),
        }
    }
    Err(QueryError::Parse(format!("{field}: missing value")))
}

fn term_query(field: String, text: String) -> TextQuery {
    if field == DISCRIMINATOR_FIELD && text == DISCRIMINATOR_VALUE {
        TextQuery::MatchAll
    } else {
        TextQuery::Match { field, text }
    }
}

fn build_range(field: String, pair: Pair<Rule>) -> Result<TextQuery, QueryError> {
    let mut inclusive_lower = true;
    let mut inclusive_upper = true;
    let mut bounds = Vec::with_capacity(2);
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::range_open => inclusive_lower = inner.as_str() == "[",
            Rule::range_close => inclusive_upper = inner.as_str() == "]",
            Rule::bound => bounds.push(bound_text(inner)),
            r => return Err(QueryError::Parse(format!("unexpected in range: {r:?}"))),
        }
    }
    let [lower, upper]: [Option<String>; 2] = bounds
        .try_into()
        .map_err(|_| QueryError::Parse(format!("{field}: range needs two bounds")))?;

    let wrap = |value: Option<String>, inclusive: bool| match value {
        None => Bound::Unbounded,
        Some(v) if inclusive => Bound::Inclusive(v),
        Some(v) => Bound::Exclusive(v),
    };
    Ok(TextQuery::Range {
        field,
        lower: wrap(lower, inclusive_lower),
        upper: wrap(upper, inclusive_upper),
    })
}

/// `None` for an open `*` bound.
fn bound_text(pair: Pair<Rule>) -> Option<String> {
    let inner = pair.into_inner().next()?;
    match inner.as_rule() {
        Rule::open_bound => None,
        Rule::phrase => Some(unescape(phrase_text(inner))),
        _ => Some(unescape(inner.as_str())),
    }
}

fn phrase_text(pair: Pair<Rule>) -> &str {
    pair.into_inner().next().map_or("", |inner| inner.as_str())
}

/// `"text"` with `\\` and `"` escaped.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn has_wildcard(raw: &str) -> bool {
    let mut escaped = false;
    for c in raw.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
