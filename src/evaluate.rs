use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::{
    Condition, Conditional, Decision, EvalError, EvaluationReport, Expression, Facts, Outcome,
    Resolved, Rule, RuleDecision, RuleRowDecision, RuleRowScore, RuleScore, RuleSetDecision,
    RuleSetScore, RuleSetTrace, Token, Value, ValueKind,
};

/// Outputs of embedded rules already executed during one evaluation, keyed
/// by the shared rule's address. A rule reached through several tokens runs
/// once per evaluation, so sharing a sub-rule never multiplies the work.
#[derive(Default)]
struct RuleCache {
    outputs: HashMap<*const Rule, Option<Resolved<'static>>>,
}

pub(crate) fn resolve_token<'f>(
    token: &Token,
    facts: &'f Facts,
) -> Result<Option<Resolved<'f>>, EvalError> {
    resolve(token, facts, &mut RuleCache::default())
}

pub(crate) fn eval_expression(expr: &Expression, facts: &Facts) -> Result<bool, EvalError> {
    expression(expr, facts, &mut RuleCache::default())
}

pub(crate) fn eval_conditional(cond: &Conditional, facts: &Facts) -> Result<bool, EvalError> {
    conditional(cond, facts, &mut RuleCache::default())
}

pub(crate) fn first_decision_row<'r>(
    ruleset: &'r RuleSetDecision,
    facts: &Facts,
) -> Result<Option<(usize, &'r RuleRowDecision)>, EvalError> {
    decision_row(ruleset, facts, &mut RuleCache::default())
}

pub(crate) fn first_score_row<'r>(
    ruleset: &'r RuleSetScore,
    facts: &Facts,
) -> Result<Option<(usize, &'r RuleRowScore)>, EvalError> {
    score_row(ruleset, facts, &mut RuleCache::default())
}

pub(crate) fn execute_decision(
    rule: &RuleDecision,
    facts: &Facts,
) -> Result<Option<Decision>, EvalError> {
    run_decision(rule, facts, &mut RuleCache::default())
}

pub(crate) fn execute_score(rule: &RuleScore, facts: &Facts) -> Result<f64, EvalError> {
    run_score(rule, facts, &mut RuleCache::default())
}

pub(crate) fn execute_detailed(rule: &Rule, facts: &Facts) -> Result<EvaluationReport, EvalError> {
    let start = Instant::now();
    let mut cache = RuleCache::default();

    let (outcome, traces) = match rule {
        Rule::Decision(rule) => {
            let matched = decision_row(rule.ruleset(), facts, &mut cache)?;
            let outcome = matched.map_or(Outcome::NoMatch, |(_, row)| {
                Outcome::Decision(row.consequent().clone())
            });
            (outcome, vec![RuleSetTrace::decision(matched.map(|(i, _)| i))])
        }
        Rule::Score(rule) => {
            let mut total = 0.0;
            let mut traces = Vec::with_capacity(rule.rulesets().len());
            for ruleset in rule.rulesets() {
                let matched = score_row(ruleset, facts, &mut cache)?;
                let contribution = matched.map_or(0.0, |(_, row)| row.score() * ruleset.weight());
                total += contribution;
                traces.push(RuleSetTrace::score(
                    matched.map(|(i, _)| i),
                    ruleset.weight(),
                    contribution,
                ));
            }
            (Outcome::Score(total), traces)
        }
    };

    let duration = start.elapsed();
    debug!(outcome = %outcome, ?duration, "rule executed with report");
    Ok(EvaluationReport::new(outcome, traces, duration))
}

fn resolve<'f>(
    token: &Token,
    facts: &'f Facts,
    cache: &mut RuleCache,
) -> Result<Option<Resolved<'f>>, EvalError> {
    let (name, expected) = match token {
        Token::Numeric(name) => (name, ValueKind::Numeric),
        Token::String(name) => (name, ValueKind::String),
        Token::Boolean(name) => (name, ValueKind::Boolean),
        Token::Rule(rt) => {
            let key = Arc::as_ptr(rt.rule());
            if let Some(cached) = cache.outputs.get(&key) {
                trace!(token = rt.name(), value = ?cached, "reused rule token");
                return Ok(cached.clone());
            }
            let resolved = match run_rule(rt.rule(), facts, cache)? {
                Outcome::Score(score) => Some(Resolved::Number(score)),
                Outcome::NoMatch => None,
                Outcome::Decision(decision) => resolve_decision(decision),
            };
            trace!(token = rt.name(), value = ?resolved, "resolved rule token");
            cache.outputs.insert(key, resolved.clone());
            return Ok(resolved);
        }
    };

    let resolved = match facts.get(name) {
        None | Some(Value::Null) => None,
        Some(v @ (Value::Int(_) | Value::Float(_))) if expected == ValueKind::Numeric => {
            v.as_f64().map(Resolved::Number)
        }
        Some(Value::String(s)) if expected == ValueKind::String => {
            Some(Resolved::Text(Cow::Borrowed(s)))
        }
        Some(Value::Bool(b)) if expected == ValueKind::Boolean => Some(Resolved::Bool(*b)),
        Some(other) => {
            return Err(EvalError::TypeMismatch {
                fact: name.clone(),
                expected,
                // Null is handled above, so a kind is always present
                found: other.kind().unwrap_or(expected),
            });
        }
    };
    Ok(resolved)
}

fn resolve_decision(decision: Decision) -> Option<Resolved<'static>> {
    match decision {
        Decision::Number(n) => Some(Resolved::Number(n)),
        Decision::Text(s) => Some(Resolved::Text(Cow::Owned(s))),
        Decision::Bool(b) => Some(Resolved::Bool(b)),
        // embedding rejects rules with structured consequents
        Decision::List(_) | Decision::Map(_) => None,
    }
}

fn expression(expr: &Expression, facts: &Facts, cache: &mut RuleCache) -> Result<bool, EvalError> {
    let value = resolve(expr.token(), facts, cache)?;
    Ok(expr.operator().apply(value.as_ref()))
}

fn conditional(
    cond: &Conditional,
    facts: &Facts,
    cache: &mut RuleCache,
) -> Result<bool, EvalError> {
    match cond {
        Conditional::WhenAll(conditions) => {
            for c in conditions {
                if !condition(c, facts, cache)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Conditional::WhenAny(conditions) => {
            for c in conditions {
                if condition(c, facts, cache)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn condition(cond: &Condition, facts: &Facts, cache: &mut RuleCache) -> Result<bool, EvalError> {
    match cond {
        Condition::Expression(expr) => expression(expr, facts, cache),
        Condition::Conditional(nested) => conditional(nested, facts, cache),
    }
}

/// First row whose antecedent holds. Later rows are never evaluated.
fn decision_row<'r>(
    ruleset: &'r RuleSetDecision,
    facts: &Facts,
    cache: &mut RuleCache,
) -> Result<Option<(usize, &'r RuleRowDecision)>, EvalError> {
    for (i, row) in ruleset.rows().iter().enumerate() {
        if conditional(row.antecedent(), facts, cache)? {
            trace!(row = i, consequent = %row.consequent(), "decision row matched");
            return Ok(Some((i, row)));
        }
    }
    Ok(None)
}

/// First row whose antecedent holds. Later rows are never evaluated.
fn score_row<'r>(
    ruleset: &'r RuleSetScore,
    facts: &Facts,
    cache: &mut RuleCache,
) -> Result<Option<(usize, &'r RuleRowScore)>, EvalError> {
    for (i, row) in ruleset.rows().iter().enumerate() {
        if conditional(row.antecedent(), facts, cache)? {
            trace!(row = i, score = row.score(), weight = ruleset.weight(), "score row matched");
            return Ok(Some((i, row)));
        }
    }
    Ok(None)
}

fn run_rule(rule: &Rule, facts: &Facts, cache: &mut RuleCache) -> Result<Outcome, EvalError> {
    Ok(match rule {
        Rule::Decision(rule) => {
            run_decision(rule, facts, cache)?.map_or(Outcome::NoMatch, Outcome::Decision)
        }
        Rule::Score(rule) => Outcome::Score(run_score(rule, facts, cache)?),
    })
}

fn run_decision(
    rule: &RuleDecision,
    facts: &Facts,
    cache: &mut RuleCache,
) -> Result<Option<Decision>, EvalError> {
    let decision = decision_row(rule.ruleset(), facts, cache)?
        .map(|(_, row)| row.consequent().clone());
    match &decision {
        Some(d) => debug!(decision = %d, "decision rule executed"),
        None => debug!("decision rule executed with no matching row"),
    }
    Ok(decision)
}

fn run_score(rule: &RuleScore, facts: &Facts, cache: &mut RuleCache) -> Result<f64, EvalError> {
    let mut total = 0.0;
    for ruleset in rule.rulesets() {
        total += score_row(ruleset, facts, cache)?
            .map_or(0.0, |(_, row)| row.score() * ruleset.weight());
    }
    debug!(score = total, rulesets = rule.rulesets().len(), "score rule executed");
    Ok(total)
}
