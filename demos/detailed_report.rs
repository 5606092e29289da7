use simple_rule_engine::{numeric, string, Conditional, Facts, Rule, RuleScore, RuleSetScore};
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let income = RuleSetScore::builder(0.6)
        .row(Conditional::all([numeric("monthly_income").gte(100_000)]), 100.0)
        .row(Conditional::all([numeric("monthly_income").gte(40_000)]), 60.0)
        .row(Conditional::all([numeric("monthly_income").gte(0)]), 20.0)
        .build()
        .expect("invalid ruleset");
    let city = RuleSetScore::builder(0.4)
        .row(Conditional::all([string("city").is_in(["Pune", "Mumbai"])]), 80.0)
        .build()
        .expect("invalid ruleset");

    let rule: Rule = RuleScore::new(vec![income, city])
        .expect("weights must sum to 1")
        .into();

    let facts = Facts::new()
        .set("monthly_income", 55_000)
        .set("city", "Nagpur");

    let report = rule.execute_detailed(&facts).expect("facts have the right kinds");

    println!("{report}");
    println!();
    for (i, trace) in report.rulesets().iter().enumerate() {
        println!(
            "ruleset {i}: row {:?}, weight {:?}, contribution {:?}",
            trace.matched_row(),
            trace.weight(),
            trace.contribution()
        );
    }
    println!("Rulesets with no matching row: {:?}", report.unmatched());
    println!("Duration: {:?}", report.duration());
}
