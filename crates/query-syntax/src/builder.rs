use crate::{
    ast::{
        literal::{Literal, RawValue},
        node::QueryNode,
        operator::Operator,
    },
    errors::ParseError,
    parser::{QueryParser, Rule},
};
use pest::{Parser, iterators::Pair};
use tracing::trace;

pub type BuildResult<T> = Result<T, ParseError>;

/// Parse query text into a typed tree.
///
/// Returns `Ok(None)` for a blank query.
pub fn parse(input: &str) -> BuildResult<Option<QueryNode>> {
    let mut pairs = QueryParser::parse(Rule::query, input).map_err(ParseError::from_pest_error)?;

    let Some(query) = pairs.next() else {
        return Ok(None);
    };

    let node = query
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::expr)
        .map(build_expr)
        .transpose()?;

    if let Some(node) = &node {
        trace!(query = input, leaves = node.leaf_count(), "Parsed search query");
    }

    Ok(node)
}

fn build_expr(pair: Pair<Rule>) -> BuildResult<QueryNode> {
    let mut acc: Option<QueryNode> = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::and_expr => {
                let right = build_and_expr(inner)?;
                acc = Some(match acc {
                    Some(left) => QueryNode::or(left, right),
                    None => right,
                });
            }
            Rule::or_op => {}
            other => return Err(unexpected(other)),
        }
    }

    acc.ok_or_else(|| unexpected(Rule::expr))
}

fn build_and_expr(pair: Pair<Rule>) -> BuildResult<QueryNode> {
    let mut acc: Option<QueryNode> = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::unary => {
                let right = build_unary(inner)?;
                acc = Some(match acc {
                    Some(left) => QueryNode::and(left, right),
                    None => right,
                });
            }
            Rule::and_op => {}
            other => return Err(unexpected(other)),
        }
    }

    acc.ok_or_else(|| unexpected(Rule::and_expr))
}

fn build_unary(pair: Pair<Rule>) -> BuildResult<QueryNode> {
    let mut negations = 0usize;
    let mut node = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::not_op => negations += 1,
            Rule::group => node = Some(build_group(inner)?),
            Rule::comparison => node = Some(build_comparison(inner)?),
            Rule::term => node = Some(build_term(inner)?),
            other => return Err(unexpected(other)),
        }
    }

    let mut node = node.ok_or_else(|| unexpected(Rule::unary))?;
    for _ in 0..negations {
        node = QueryNode::not(node);
    }
    Ok(node)
}

fn build_group(pair: Pair<Rule>) -> BuildResult<QueryNode> {
    let expr = pair
        .into_inner()
        .next()
        .ok_or_else(|| unexpected(Rule::group))?;
    build_expr(expr)
}

fn build_comparison(pair: Pair<Rule>) -> BuildResult<QueryNode> {
    let mut key = None;
    let mut operator = None;
    let mut value = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::key => key = Some(inner.as_str().to_string()),
            Rule::operator => operator = Some(inner.as_str().parse::<Operator>()?),
            Rule::value => value = Some(build_value(inner)?),
            other => return Err(unexpected(other)),
        }
    }

    match (key, operator, value) {
        (Some(key), Some(operator), Some(value)) => Ok(QueryNode::Comparison {
            key,
            operator,
            value,
        }),
        _ => Err(unexpected(Rule::comparison)),
    }
}

fn build_value(pair: Pair<Rule>) -> BuildResult<RawValue> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| unexpected(Rule::value))?;

    match inner.as_rule() {
        Rule::range => build_range(inner),
        Rule::quoted => Ok(RawValue::Scalar(Literal::String(build_quoted(inner)?))),
        Rule::bare => Ok(RawValue::Scalar(Literal::from_bare(inner.as_str()))),
        other => Err(unexpected(other)),
    }
}

fn build_range(pair: Pair<Rule>) -> BuildResult<RawValue> {
    let mut endpoints = Vec::with_capacity(2);
    let mut end_excluded = false;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::endpoint => endpoints.push(build_endpoint(inner)?),
            Rule::range_op => end_excluded = inner.as_str() == "...",
            other => return Err(unexpected(other)),
        }
    }

    let mut endpoints = endpoints.into_iter();
    match (endpoints.next(), endpoints.next()) {
        (Some(first), Some(last)) => Ok(RawValue::Range {
            first,
            last,
            end_excluded,
        }),
        _ => Err(unexpected(Rule::range)),
    }
}

fn build_endpoint(pair: Pair<Rule>) -> BuildResult<Literal> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| unexpected(Rule::endpoint))?;

    match inner.as_rule() {
        Rule::quoted => Ok(Literal::String(build_quoted(inner)?)),
        Rule::bare_endpoint => Ok(Literal::from_bare(inner.as_str())),
        other => Err(unexpected(other)),
    }
}

fn build_term(pair: Pair<Rule>) -> BuildResult<QueryNode> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| unexpected(Rule::term))?;

    match inner.as_rule() {
        Rule::quoted => Ok(QueryNode::Term(build_quoted(inner)?)),
        Rule::bare => Ok(QueryNode::Term(inner.as_str().to_string())),
        other => Err(unexpected(other)),
    }
}

fn build_quoted(pair: Pair<Rule>) -> BuildResult<String> {
    // quoted -> double_quoted | single_quoted -> dq_inner | sq_inner
    let raw = pair
        .into_inner()
        .next()
        .and_then(|quoted| quoted.into_inner().next())
        .map(|inner| inner.as_str())
        .unwrap_or_default();

    Ok(unescape(raw))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn unexpected(rule: Rule) -> ParseError {
    ParseError::UnexpectedRule(format!("{rule:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(unescape(r"back\\slash"), r"back\slash");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn test_blank_query() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   \t ").unwrap(), None);
    }
}
