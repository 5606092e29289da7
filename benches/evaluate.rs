use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simple_rule_engine::{
    numeric, Conditional, Decision, Expression, Facts, Operator, Rule, RuleDecision, RuleScore,
    RuleSetDecision, RuleSetScore, RuleToken,
};

/// Build a score rule with `n` equally weighted rulesets (each scoring a
/// unique fact over four bands) and matching facts.
fn build_score_rule(n: usize) -> (RuleScore, Facts) {
    let weight = 1.0 / n as f64;
    let mut sets = Vec::with_capacity(n);
    let mut facts = Facts::new();

    for i in 0..n {
        let name = format!("f{i}");
        let set = RuleSetScore::builder(weight)
            .row(Conditional::all([numeric(&name).gte(7)]), -100.0)
            .row(Conditional::all([numeric(&name).gte(4)]), -40.0)
            .row(Conditional::all([numeric(&name).gte(2)]), 30.0)
            .row(Conditional::all([numeric(&name).gte(0)]), 100.0)
            .build()
            .unwrap();
        sets.push(set);
        facts = facts.set(&name, 3);
    }

    (RuleScore::new(sets).unwrap(), facts)
}

/// Build a decision rule whose only matching row is the last of `n`.
fn build_decision_rule(n: usize) -> (RuleDecision, Facts) {
    let mut builder = RuleSetDecision::builder();
    for i in 0..n {
        builder = builder.row(Conditional::all([numeric("x").eq(i as f64)]), i as f64);
    }
    let facts = Facts::new().set("x", (n - 1) as f64);
    (RuleDecision::new(builder.build()).unwrap(), facts)
}

/// Wrap a score rule in `depth` layers of rule tokens.
fn build_chain(depth: usize) -> (Rule, Facts) {
    let (inner, facts) = build_score_rule(5);
    let mut rule: Rule = inner.into();
    for i in 0..depth {
        let token = RuleToken::new(&format!("level_{i}"), rule).unwrap();
        let set = RuleSetScore::builder(1.0)
            .row(
                Conditional::all([Expression::new(token.into(), Operator::gte(0)).unwrap()]),
                1.0,
            )
            .build()
            .unwrap();
        rule = RuleScore::new(vec![set]).unwrap().into();
    }
    (rule, facts)
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_rule");

    for &n in &[5, 20, 50] {
        let (rule, facts) = build_score_rule(n);
        group.bench_function(&format!("{n}_rulesets"), |b| {
            b.iter(|| rule.execute(black_box(&facts)));
        });
    }

    group.finish();
}

fn bench_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision_rule");

    for &n in &[5, 20, 50] {
        let (rule, facts) = build_decision_rule(n);
        group.bench_function(&format!("{n}_rows_last_match"), |b| {
            b.iter(|| -> Option<Decision> { rule.execute(black_box(&facts)).unwrap() });
        });
    }

    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_token_chain");

    for &depth in &[1, 8, 24] {
        let (rule, facts) = build_chain(depth);
        group.bench_function(&format!("{depth}_deep"), |b| {
            b.iter(|| rule.execute(black_box(&facts)));
        });
    }

    group.finish();
}

fn bench_detailed(c: &mut Criterion) {
    let (rule, facts) = build_score_rule(20);
    let rule: Rule = rule.into();

    c.bench_function("execute_detailed_20_rulesets", |b| {
        b.iter(|| rule.execute_detailed(black_box(&facts)));
    });
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for &n in &[5, 20, 50] {
        group.bench_function(&format!("{n}_rulesets"), |b| {
            b.iter(|| black_box(build_score_rule(n)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_score,
    bench_decision,
    bench_chain,
    bench_detailed,
    bench_construction
);
criterion_main!(benches);
