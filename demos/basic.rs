use simple_rule_engine::{
    boolean, numeric, string, Conditional, Facts, RuleDecision, RuleSetDecision,
};

fn main() {
    // Define a decision rule
    let ruleset = RuleSetDecision::builder()
        .row(Conditional::all([numeric("age").lt(18)]), "REJECT")
        .row(
            Conditional::all([
                boolean("salaried").is(true),
                string("city").is_in(["Pune", "Mumbai", "Bengaluru"]),
            ]),
            "GO",
        )
        .build();
    let rule = RuleDecision::new(ruleset).expect("failed to build rule");

    println!("{}", rule.ruleset());
    println!("Required facts: {:?}", rule.required_tokens().as_map());

    // Execute against facts
    let facts = Facts::new()
        .set("age", 32)
        .set("salaried", true)
        .set("city", "Pune");

    match rule.execute(&facts) {
        Ok(Some(decision)) => println!("Result: {decision}"),
        Ok(None) => println!("No row matched."),
        Err(e) => eprintln!("Evaluation failed: {e}"),
    }
}
