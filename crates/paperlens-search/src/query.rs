//! Boolean query tree for the arXiv search API and the builder that assembles
//! it from user input.
//!
//! The final query is always
//! `category-clause AND (ti:k1 OR abs:k1) AND ... AND submittedDate:[..]`.

use chrono::NaiveDate;
use std::fmt;

use paperlens_core::types::sanitize_keyword;
use paperlens_core::{Error, Result, Taxonomy};

/// Upper bound on keywords per search; keeps request URLs and upstream query
/// cost bounded.
pub const MAX_KEYWORDS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Abstract,
}

impl Field {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Title => "ti",
            Self::Abstract => "abs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Word(String),
    Phrase(String),
}

impl Term {
    /// Quotes are stripped first. Inner whitespace or a hyphen makes a phrase,
    /// since arXiv splits hyphenated words into separate terms.
    pub fn from_keyword(keyword: &str) -> Self {
        let cleaned = sanitize_keyword(keyword);
        if cleaned.chars().any(|c| c.is_whitespace() || c == '-') {
            Self::Phrase(cleaned)
        } else {
            Self::Word(cleaned)
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Word(t) | Self::Phrase(t) => t,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => f.write_str(w),
            Self::Phrase(p) => write!(f, "\"{}\"", p),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    FieldMatch { field: Field, term: Term },
    CategoryIn(Vec<String>),
    /// Submission date bounds, both inclusive whole days.
    DateRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
}

impl Query {
    pub fn and(self, other: Query) -> Query {
        Query::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Query) -> Query {
        Query::Or(Box::new(self), Box::new(other))
    }

    pub fn field(field: Field, term: Term) -> Query {
        Query::FieldMatch { field, term }
    }

    /// `(ti:k OR abs:k)` for one keyword.
    pub fn keyword(keyword: &str) -> Query {
        let term = Term::from_keyword(keyword);
        Query::field(Field::Title, term.clone()).or(Query::field(Field::Abstract, term))
    }

    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Query {
        Query::DateRange { start, end }
    }

    /// Left-fold clauses with AND. `None` when there are no clauses.
    pub fn all_of<I: IntoIterator<Item = Query>>(clauses: I) -> Option<Query> {
        clauses.into_iter().reduce(Query::and)
    }

    /// Flattened operands of nested ANDs, left to right.
    pub fn conjuncts(&self) -> Vec<&Query> {
        match self {
            Query::And(l, r) => {
                let mut out = l.conjuncts();
                out.extend(r.conjuncts());
                out
            }
            other => vec![other],
        }
    }

    /// Flattened operands of nested ORs, left to right.
    pub fn disjuncts(&self) -> Vec<&Query> {
        match self {
            Query::Or(l, r) => {
                let mut out = l.disjuncts();
                out.extend(r.disjuncts());
                out
            }
            other => vec![other],
        }
    }

    /// Serialize to arXiv `search_query` syntax.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn op(&self) -> Option<Op> {
        match self {
            Query::And(..) => Some(Op::And),
            Query::Or(..) => Some(Op::Or),
            Query::CategoryIn(codes) if codes.len() > 1 => Some(Op::Or),
            _ => None,
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Query::And(l, r) => {
                l.render_operand(Op::And, out);
                out.push_str(" AND ");
                r.render_operand(Op::And, out);
            }
            Query::Or(l, r) => {
                l.render_operand(Op::Or, out);
                out.push_str(" OR ");
                r.render_operand(Op::Or, out);
            }
            Query::FieldMatch { field, term } => {
                out.push_str(field.prefix());
                out.push(':');
                out.push_str(&term.to_string());
            }
            Query::CategoryIn(codes) => {
                let joined = codes.iter().map(|c| format!("cat:{}", c)).collect::<Vec<_>>().join(" OR ");
                out.push_str(&joined);
            }
            Query::DateRange { start, end } => {
                out.push_str(&format!(
                    "submittedDate:[{} TO {}]",
                    start.format("%Y%m%d0000"),
                    end.format("%Y%m%d2359")
                ));
            }
        }
    }

    fn render_operand(&self, parent: Op, out: &mut String) {
        match self.op() {
            Some(op) if op != parent => {
                out.push('(');
                self.render_into(out);
                out.push(')');
            }
            _ => self.render_into(out),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Validate user input and assemble the full search query.
///
/// Checks run in this order: date range, missing keywords, keyword ceiling,
/// category. The category label is matched after trimming. Nothing is sent
/// anywhere.
pub fn build_query(
    keywords: &[String],
    category: &str,
    start: NaiveDate,
    end: NaiveDate,
    taxonomy: &Taxonomy,
) -> Result<Query> {
    if end < start {
        return Err(Error::InvalidDateRange { start, end });
    }

    let terms: Vec<String> = keywords
        .iter()
        .map(|k| sanitize_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();
    if terms.len() > MAX_KEYWORDS {
        return Err(Error::TooManyKeywords { count: terms.len(), max: MAX_KEYWORDS });
    }
    let keyword_clause = Query::all_of(terms.iter().map(|k| Query::keyword(k))).ok_or(Error::MissingKeywords)?;

    let category = category.trim();
    let codes = taxonomy.codes_for(category).ok_or_else(|| Error::InvalidCategory {
        category: category.to_string(),
        available: taxonomy.labels().into_iter().map(str::to_string).collect(),
    })?;
    let category_clause = Query::CategoryIn(codes.into_iter().map(str::to_string).collect());

    Ok(category_clause.and(keyword_clause).and(Query::date_range(start, end)))
}
