// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! FilterNode → SpatialQuery.
//!
//! # Translation Table
//!
//! ```text
//! EqualTo(T, v)             T:"v"
//! NotEqualTo(T, v)          metafile:doc NOT T:"v"
//! GreaterThan(T, v)         T:{v TO *}
//! GreaterThanOrEqualTo(T,v) T:[v TO *]
//! LessThan(T, v)            T:{* TO v}
//! LessThanOrEqualTo(T, v)   T:[* TO v]
//! IsNull(T)                 T:null
//! Like(T, p)                T:p            (markers rewritten to * and ?)
//! Between(T, a, b)          T:[a TO b]
//! And / Or                  (A AND B) / (A OR B), spatial children → chain
//! Not(X)                    X unchanged, combinator = NOT
//! Id(ids) at the top        identifier set, no text
//! Id(ids) nested            (Identifier:"a" OR Identifier:"b")
//! spatial operator          chain entry, text untouched
//! ```
//!
//! Date literals (and text literals that start with an ISO date) are
//! written as `yyyyMMdd`, the form dates are indexed in.

use super::fields::{FieldMapping, FieldTarget};
use super::filter::{ComparisonOp, FilterNode, LikePattern, Literal, LogicalOp, SortBy, SpatialFilter};
use super::lucene::quote;
use super::query::{SortSpec, SpatialQuery};
use super::TranslateError;
use crate::catalog::{DISCRIMINATOR_FIELD, DISCRIMINATOR_VALUE, IDENTIFIER};
use crate::metrics;
use crate::resolver::NULL_VALUE;
use crate::spatial::{SpatialPredicate, SpatialPredicateChain};
use chrono::NaiveDate;
use tracing::debug;

/// Characters with meaning in the query grammar.
const SPECIAL: &str = "\\\"():[]{}*?!&|+-^~";

#[derive(Debug, Default)]
struct Translated {
    text: String,
    chain: Option<SpatialPredicateChain>,
    combinator: Option<LogicalOp>,
}

impl Translated {
    fn text(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterTranslator {
    fields: FieldMapping,
}

impl FilterTranslator {
    pub fn new(fields: FieldMapping) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &FieldMapping {
        &self.fields
    }

    /// Translates an optional filter and sort. No filter matches everything.
    pub fn translate(
        &self,
        filter: Option<&FilterNode>,
        sort: Option<&SortBy>,
    ) -> Result<SpatialQuery, TranslateError> {
        self.translate_inner(filter, sort).inspect_err(|e| {
            debug!(error = %e, "Filter translation failed");
            metrics::record_translate_error(e.reason());
        })
    }

    fn translate_inner(
        &self,
        filter: Option<&FilterNode>,
        sort: Option<&SortBy>,
    ) -> Result<SpatialQuery, TranslateError> {
        let sort = sort.map(|s| self.sort_spec(s)).transpose()?;

        let query = match filter {
            None => SpatialQuery::match_all(),
            Some(FilterNode::Id(ids)) => SpatialQuery::identifiers(ids.clone()),
            Some(node) => {
                let translated = self.node(node)?;
                let query = SpatialQuery::text(translated.text).with_combinator(translated.combinator);
                match translated.chain {
                    Some(chain) => query.with_spatial(chain),
                    None => query,
                }
            }
        };
        let query = query.with_sort(sort);

        debug!(
            text = %query.text_query(),
            spatial = query.spatial_predicate().map_or(0, |c| c.len()),
            combinator = ?query.logical_combinator(),
            "Translated filter"
        );
        Ok(query)
    }

    fn node(&self, node: &FilterNode) -> Result<Translated, TranslateError> {
        match node {
            FilterNode::Comparison {
                property,
                op,
                literal,
            } => self.comparison(property, *op, literal).map(Translated::text),
            FilterNode::IsNull { property } => {
                let field = self.field(property)?;
                Ok(Translated::text(format!("{field}:{NULL_VALUE}")))
            }
            FilterNode::Like { property, pattern } => {
                let field = self.field(property)?;
                Ok(Translated::text(format!("{field}:{}", like_pattern(pattern))))
            }
            FilterNode::Between {
                property,
                lower,
                upper,
            } => {
                let field = self.field(property)?;
                Ok(Translated::text(format!(
                    "{field}:[{} TO {}]",
                    bound(&literal_text(lower)),
                    bound(&literal_text(upper))
                )))
            }
            FilterNode::Spatial(filter) => Ok(Translated {
                chain: Some(SpatialPredicateChain::single(self.predicate(filter)?)),
                ..Translated::default()
            }),
            FilterNode::Id(ids) => Ok(Translated::text(id_clause(ids))),
            FilterNode::Logical(LogicalOp::Not, children) => self.negate(children),
            FilterNode::Logical(op, children) => self.combine(*op, children),
        }
    }

    fn comparison(
        &self,
        property: &str,
        op: ComparisonOp,
        literal: &Literal,
    ) -> Result<String, TranslateError> {
        let field = self.field(property)?;
        let value = literal_text(literal);
        Ok(match op {
            ComparisonOp::EqualTo => format!("{field}:{}", quote(&value)),
            ComparisonOp::NotEqualTo => format!(
                "{DISCRIMINATOR_FIELD}:{DISCRIMINATOR_VALUE} NOT {field}:{}",
                quote(&value)
            ),
            ComparisonOp::GreaterThan => format!("{field}:{{{} TO *}}", bound(&value)),
            ComparisonOp::GreaterThanOrEqualTo => format!("{field}:[{} TO *]", bound(&value)),
            ComparisonOp::LessThan => format!("{field}:{{* TO {}}}", bound(&value)),
            ComparisonOp::LessThanOrEqualTo => format!("{field}:[* TO {}]", bound(&value)),
        })
    }

    /// Spatial children of this operator become chain entries tagged with
    /// `op`. Under AND a negated spatial child becomes a NOT entry, which the
    /// chain applies as AND-NOT; under OR it is rejected. Every other child
    /// contributes text.
    ///
    /// A chain from a nested logical child is propagated as-is and combined
    /// with this node's text using `op`, whatever the child's own operator
    /// was. Only one spatial source per query is supported.
    fn combine(&self, op: LogicalOp, children: &[FilterNode]) -> Result<Translated, TranslateError> {
        if children.is_empty() {
            return Err(TranslateError::UnsupportedFilter(format!("{op} without operands")));
        }

        let mut texts = Vec::with_capacity(children.len());
        let mut chain = SpatialPredicateChain::new();
        let mut nested: Option<SpatialPredicateChain> = None;

        for child in children {
            match child {
                FilterNode::Spatial(filter) => chain.push(self.predicate(filter)?, op),
                FilterNode::Logical(LogicalOp::Not, inner)
                    if op == LogicalOp::And && matches!(inner.as_slice(), [FilterNode::Spatial(_)]) =>
                {
                    if let [FilterNode::Spatial(filter)] = inner.as_slice() {
                        chain.push(self.predicate(filter)?, LogicalOp::Not);
                    }
                }
                other => {
                    let translated = self.node(other)?;
                    let negated = translated.combinator == Some(LogicalOp::Not);
                    if let Some(inner_chain) = translated.chain {
                        if negated {
                            return Err(TranslateError::UnsupportedFilter(format!(
                                "negated spatial expression inside {op}"
                            )));
                        }
                        if nested.replace(inner_chain).is_some() {
                            return Err(TranslateError::MultipleSpatialSources(op));
                        }
                    }
                    if negated {
                        texts.push(negation(&translated.text));
                    } else if !translated.text.is_empty() {
                        texts.push(translated.text);
                    }
                }
            }
        }

        let chain = match (chain.is_empty(), nested) {
            (true, nested) => nested,
            (false, None) => Some(chain),
            (false, Some(_)) => return Err(TranslateError::MultipleSpatialSources(op)),
        };

        let text = match texts.len() {
            0 => String::new(),
            1 => texts.remove(0),
            _ => format!("({})", texts.join(format!(" {op} ").as_str())),
        };
        Ok(Translated {
            text,
            chain,
            combinator: Some(op),
        })
    }

    /// The child's text is kept as-is; negation is carried by the combinator.
    fn negate(&self, children: &[FilterNode]) -> Result<Translated, TranslateError> {
        let [child] = children else {
            return Err(TranslateError::UnsupportedFilter(format!(
                "NOT takes exactly one operand, got {}",
                children.len()
            )));
        };
        let inner = self.node(child)?;
        if inner.combinator == Some(LogicalOp::Or) && inner.chain.is_some() && !inner.text.is_empty() {
            return Err(TranslateError::UnsupportedFilter(
                "NOT over an OR of text and spatial operands".into(),
            ));
        }
        let combinator = match inner.combinator {
            Some(LogicalOp::Not) => None,
            _ => Some(LogicalOp::Not),
        };
        Ok(Translated { combinator, ..inner })
    }

    fn predicate(&self, filter: &SpatialFilter) -> Result<SpatialPredicate, TranslateError> {
        if self.fields.resolve(&filter.property) != Some(&FieldTarget::Spatial) {
            return Err(TranslateError::UnsupportedSpatialProperty(filter.property.clone()));
        }
        let predicate = SpatialPredicate::new(filter.kind, &filter.geometry, &filter.crs)?;
        match (filter.kind.needs_distance(), filter.distance) {
            (true, Some(distance)) => Ok(predicate.with_distance(distance)),
            (true, None) => Err(TranslateError::InvalidLiteral {
                property: filter.property.clone(),
                reason: format!("{} requires a distance", filter.kind),
            }),
            (false, _) => Ok(predicate),
        }
    }

    fn field(&self, property: &str) -> Result<&str, TranslateError> {
        match self.fields.resolve(property) {
            Some(FieldTarget::Field(name)) => Ok(name),
            Some(FieldTarget::Spatial) => Err(TranslateError::UnsupportedFilter(format!(
                "{property} is spatial and needs a spatial operator"
            ))),
            None => Err(TranslateError::UnknownProperty(property.to_string())),
        }
    }

    fn sort_spec(&self, sort: &SortBy) -> Result<SortSpec, TranslateError> {
        let term = self.field(&sort.property)?;
        Ok(SortSpec {
            term: term.to_string(),
            ascending: sort.ascending,
        })
    }
}

fn negation(text: &str) -> String {
    let all = format!("{DISCRIMINATOR_FIELD}:{DISCRIMINATOR_VALUE}");
    if text.is_empty() {
        format!("{all} NOT {all}")
    } else {
        format!("{all} NOT ({text})")
    }
}

fn id_clause(ids: &[String]) -> String {
    let mut clauses: Vec<String> = ids
        .iter()
        .map(|id| format!("{IDENTIFIER}:{}", quote(id)))
        .collect();
    match clauses.len() {
        0 => negation(""),
        1 => clauses.remove(0),
        _ => format!("({})", clauses.join(" OR ")),
    }
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Text(text) => iso_date(text).unwrap_or_else(|| text.clone()),
        Literal::Integer(n) => n.to_string(),
        Literal::Decimal(n) => n.to_string(),
        Literal::Date(date) => date.format("%Y%m%d").to_string(),
        Literal::DateTime(at) => at.format("%Y%m%d").to_string(),
        Literal::Boolean(b) => b.to_string(),
    }
}

/// `2009-03-01`, `2009-03-01T12:00:00Z` → `20090301`.
fn iso_date(text: &str) -> Option<String> {
    let head = text.get(..10)?;
    let rest = &text[10..];
    if !(rest.is_empty() || rest.starts_with(['T', ' ', 'Z', '+'])) {
        return None;
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y%m%d").to_string())
}

/// Range bound, quoted when a bare word would not survive the grammar.
fn bound(value: &str) -> String {
    let bare = !value.is_empty()
        && value != "*"
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '[' | ']' | '{' | '}' | '"' | '\\'));
    if bare {
        value.to_string()
    } else {
        quote(value)
    }
}

fn like_pattern(pattern: &LikePattern) -> String {
    let mut out = String::with_capacity(pattern.pattern.len());
    let mut chars = pattern.pattern.chars();
    while let Some(c) = chars.next() {
        if c == pattern.escape {
            if let Some(next) = chars.next() {
                push_escaped(&mut out, next);
            }
        } else if c == pattern.wildcard {
            out.push('*');
        } else if c == pattern.single_char {
            out.push('?');
        } else {
            push_escaped(&mut out, c);
        }
    }
    match out.as_str() {
        "" => quote(""),
        NULL_VALUE => format!("\\{out}"),
        _ => out,
    }
}

fn push_escaped(out: &mut String, c: char) {
    if c.is_whitespace() || SPECIAL.contains(c) {
        out.push('\\');
    }
    out.push(c);
}
