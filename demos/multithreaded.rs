use std::sync::Arc;
use std::thread;

use simple_rule_engine::{
    boolean, numeric, Conditional, Facts, Rule, RuleDecision, RuleSetDecision,
};

fn main() {
    let rule: Arc<Rule> = Arc::new(
        RuleDecision::new(
            RuleSetDecision::builder()
                .row(
                    Conditional::all([numeric("age").gte(18), boolean("kyc_done").is(true)]),
                    "GO",
                )
                .row(Conditional::any([numeric("age").lt(18)]), "MINOR")
                .build(),
        )
        .expect("failed to build rule")
        .into(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let r = Arc::clone(&rule);
            thread::spawn(move || {
                // Each thread brings its own facts; the rule is shared read-only
                let facts = Facts::new()
                    .set("age", 16 + i)
                    .set("kyc_done", i % 2 == 0);

                let result = r.execute(&facts);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
