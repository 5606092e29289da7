use simple_rule_engine::{numeric, Conditional, Facts, RuleScore, RuleSetScore};

fn main() {
    let running_loans = RuleSetScore::builder(0.5)
        .row(Conditional::all([numeric("no_of_running_bl_pl").gte(7)]), -100.0)
        .row(Conditional::all([numeric("no_of_running_bl_pl").gte(4)]), -40.0)
        .row(Conditional::all([numeric("no_of_running_bl_pl").gte(2)]), 30.0)
        .row(Conditional::all([numeric("no_of_running_bl_pl").gte(0)]), 100.0)
        .build()
        .expect("invalid ruleset");

    let last_loan_drawn = RuleSetScore::builder(0.5)
        .row(Conditional::all([numeric("last_loan_drawn_in_months").eq(0)]), 30.0)
        .row(Conditional::all([numeric("last_loan_drawn_in_months").lt(3)]), -30.0)
        .row(Conditional::all([numeric("last_loan_drawn_in_months").lte(12)]), 40.0)
        .row(Conditional::all([numeric("last_loan_drawn_in_months").gt(12)]), 100.0)
        .build()
        .expect("invalid ruleset");

    let rule = RuleScore::new(vec![running_loans, last_loan_drawn]).expect("weights must sum to 1");

    let applicants = [
        (
            "two loans, drawn 6 months ago",
            Facts::new()
                .set("no_of_running_bl_pl", 2)
                .set("last_loan_drawn_in_months", 6),
        ),
        (
            "eight loans, drawn last month",
            Facts::new()
                .set("no_of_running_bl_pl", 8)
                .set("last_loan_drawn_in_months", 1),
        ),
        ("no loan history", Facts::new().set("no_of_running_bl_pl", 0)),
    ];

    for (label, facts) in &applicants {
        match rule.execute(facts) {
            Ok(score) => println!("{label}: {score}"),
            Err(e) => eprintln!("{label}: {e}"),
        }
    }

    let missing = rule.required_tokens().missing(&applicants[2].1);
    println!("Facts missing for the last applicant: {missing:?}");
}
