use simple_rule_engine::{
    numeric, string, Conditional, Expression, Facts, Operator, Rule, RuleDecision, RuleScore,
    RuleSetDecision, RuleSetScore, RuleToken,
};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=simple_rule_engine=trace shows every matched row
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cibil = RuleSetScore::builder(1.0)
        .row(Conditional::all([numeric("cibil_score").lt(650)]), 0.0)
        .row(
            Conditional::all([numeric("cibil_score").between(650, 800).expect("valid bounds")]),
            100.0,
        )
        .build()
        .expect("invalid ruleset");
    let cibil_rule: Rule = RuleScore::new(vec![cibil]).expect("invalid rule").into();

    let token = RuleToken::new("cibil_rule", cibil_rule).expect("rule cannot be embedded");
    let gate = Expression::new(token.into(), Operator::gt(0)).expect("kinds must agree");

    let ruleset = RuleSetDecision::builder()
        .row(
            Conditional::all([gate, string("pet").is_in(["dog", "cat"])]),
            "GO",
        )
        .build();
    let rule = RuleDecision::new(ruleset).expect("invalid rule");

    println!("Caller must supply: {:?}", rule.required_tokens().as_map());

    for score in [350, 725] {
        let facts = Facts::new().set("cibil_score", score).set("pet", "dog");
        match rule.execute(&facts) {
            Ok(Some(decision)) => println!("cibil_score {score}: {decision}"),
            Ok(None) => println!("cibil_score {score}: no decision"),
            Err(e) => eprintln!("cibil_score {score}: {e}"),
        }
    }
}
