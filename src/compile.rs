use crate::{
    Condition, Conditional, ConfigError, Operator, RequiredTokens, RuleDecision, RuleScore,
    RuleSetDecision, RuleSetScore, Token, ValueKind,
};

/// Allowed distance of a score rule's weight sum from 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

pub(crate) fn compile_decision(ruleset: RuleSetDecision) -> Result<RuleDecision, ConfigError> {
    let mut requirements = RequiredTokens::new();
    let mut depth = 1;
    for row in ruleset.rows() {
        collect_conditional(row.antecedent(), &mut requirements, &mut depth)?;
    }
    Ok(RuleDecision {
        ruleset,
        requirements,
        depth,
    })
}

pub(crate) fn compile_score(rulesets: Vec<RuleSetScore>) -> Result<RuleScore, ConfigError> {
    if rulesets.is_empty() {
        return Err(ConfigError::NoRuleSets);
    }
    for ruleset in &rulesets {
        check_weight(ruleset.weight())?;
    }
    check_weight_sum(&rulesets)?;

    let mut requirements = RequiredTokens::new();
    let mut depth = 1;
    for ruleset in &rulesets {
        for row in ruleset.rows() {
            collect_conditional(row.antecedent(), &mut requirements, &mut depth)?;
        }
    }
    Ok(RuleScore {
        rulesets,
        requirements,
        depth,
    })
}

pub(crate) fn check_expression(token: &Token, operator: &Operator) -> Result<(), ConfigError> {
    operator.validate()?;
    if token.kind() != operator.kind() {
        return Err(ConfigError::KindMismatch {
            token: token.name().to_owned(),
            token_kind: token.kind(),
            operator_kind: operator.kind(),
        });
    }
    Ok(())
}

pub(crate) fn check_weight(weight: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(ConfigError::WeightOutOfRange { weight });
    }
    Ok(())
}

fn check_weight_sum(rulesets: &[RuleSetScore]) -> Result<(), ConfigError> {
    let sum: f64 = rulesets.iter().map(RuleSetScore::weight).sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::WeightSum { sum });
    }
    Ok(())
}

/// Walk a conditional, checking operator baselines and recording fact
/// requirements and the deepest rule token chain. Embedded rules already carry their own requirements and
/// depth, so they are merged rather than walked again.
fn collect_conditional(
    conditional: &Conditional,
    requirements: &mut RequiredTokens,
    depth: &mut usize,
) -> Result<(), ConfigError> {
    for condition in conditional.conditions() {
        match condition {
            Condition::Conditional(nested) => collect_conditional(nested, requirements, depth)?,
            Condition::Expression(expr) => {
                // typed builders skip validation, so baselines are checked here
                expr.operator().validate()?;
                match expr.token() {
                    Token::Numeric(name) => requirements.register(name, ValueKind::Numeric)?,
                    Token::String(name) => requirements.register(name, ValueKind::String)?,
                    Token::Boolean(name) => requirements.register(name, ValueKind::Boolean)?,
                    Token::Rule(rt) => {
                        requirements.merge(rt.rule().required_tokens())?;
                        *depth = (*depth).max(rt.rule().chain_depth() + 1);
                    }
                }
            }
        }
    }
    Ok(())
}

/// The single kind shared by every consequent, if there is one.
pub(crate) fn decision_output_kind(ruleset: &RuleSetDecision) -> Option<ValueKind> {
    let mut kinds = ruleset.rows().iter().map(|row| row.consequent().kind());
    let first = kinds.next()??;
    kinds.all(|k| k == Some(first)).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numeric, string, Expression, Rule, RuleToken};

    fn weighted(weight: f64) -> RuleSetScore {
        RuleSetScore::builder(weight)
            .row(Conditional::all([numeric("x").gte(0)]), 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn weight_sum_point_nine_fails() {
        let result = compile_score(vec![weighted(0.5), weighted(0.4)]);
        assert!(matches!(result, Err(ConfigError::WeightSum { sum }) if (sum - 0.9).abs() < 1e-12));
    }

    #[test]
    fn weight_sum_one_point_one_fails() {
        let result = compile_score(vec![weighted(0.6), weighted(0.5)]);
        assert!(matches!(result, Err(ConfigError::WeightSum { .. })));
    }

    #[test]
    fn weight_sum_exact_one() {
        let rule = compile_score(vec![weighted(0.25), weighted(0.75)]).unwrap();
        assert_eq!(rule.rulesets.len(), 2);
        assert_eq!(rule.depth, 1);
    }

    #[test]
    fn kind_check_reports_token_name() {
        let err =
            check_expression(&Token::boolean("salaried"), &Operator::contains("y")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::KindMismatch {
                token: "salaried".into(),
                token_kind: ValueKind::Boolean,
                operator_kind: ValueKind::String,
            }
        );
    }

    #[test]
    fn requirements_walk_nested_conditionals() {
        let set = RuleSetDecision::builder()
            .row(
                Conditional::all([
                    Condition::from(numeric("age").gte(18)),
                    Condition::from(Conditional::any([
                        string("pet").equals("dog"),
                        string("city").equals("Pune"),
                    ])),
                ]),
                "GO",
            )
            .build();
        let rule = compile_decision(set).unwrap();
        assert_eq!(rule.requirements.len(), 3);
        assert_eq!(rule.requirements.get("city"), Some(ValueKind::String));
    }

    #[test]
    fn requirements_conflict_across_embedded_rule() {
        let inner: Rule = compile_score(vec![weighted(1.0)]).unwrap().into();
        let token = RuleToken::new("inner", inner).unwrap();
        let set = RuleSetDecision::builder()
            .row(
                Conditional::all([
                    Expression::new(token.into(), Operator::gt(0)).unwrap(),
                    string("x").equals("oops"),
                ]),
                "GO",
            )
            .build();
        assert!(matches!(
            compile_decision(set),
            Err(ConfigError::ConflictingTokenKind { name, .. }) if name == "x"
        ));
    }

    #[test]
    fn nan_baseline_from_builder_rejected_at_construction() {
        let set = RuleSetDecision::builder()
            .row(
                Conditional::any([
                    Condition::from(string("pet").equals("dog")),
                    Condition::from(Conditional::all([numeric("x").lt(f64::NAN)])),
                ]),
                "GO",
            )
            .build();
        assert_eq!(
            compile_decision(set),
            Err(ConfigError::NaNBaseline {
                operator: "< NaN".into()
            })
        );

        let set = RuleSetScore::builder(1.0)
            .row(Conditional::all([numeric("x").not_eq(f64::NAN)]), 1.0)
            .build()
            .unwrap();
        assert!(matches!(
            compile_score(vec![set]),
            Err(ConfigError::NaNBaseline { .. })
        ));
    }

    #[test]
    fn output_kind_rules() {
        let uniform = RuleSetDecision::builder()
            .row(Conditional::all([numeric("x").gte(0)]), 1)
            .row(Conditional::all([numeric("x").lt(0)]), 2)
            .build();
        assert_eq!(decision_output_kind(&uniform), Some(ValueKind::Numeric));

        let structured = RuleSetDecision::builder()
            .row(Conditional::all([numeric("x").gte(0)]), vec![crate::Decision::from(1)])
            .build();
        assert_eq!(decision_output_kind(&structured), None);

        assert_eq!(decision_output_kind(&RuleSetDecision::default()), None);
    }
}
