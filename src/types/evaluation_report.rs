use std::fmt;
use std::time::Duration;

use super::rule::Outcome;

/// What happened inside one ruleset during a detailed execution.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetTrace {
    matched_row: Option<usize>,
    weight: Option<f64>,
    contribution: Option<f64>,
}

impl RuleSetTrace {
    pub(crate) fn decision(matched_row: Option<usize>) -> Self {
        Self {
            matched_row,
            weight: None,
            contribution: None,
        }
    }

    pub(crate) fn score(matched_row: Option<usize>, weight: f64, contribution: f64) -> Self {
        Self {
            matched_row,
            weight: Some(weight),
            contribution: Some(contribution),
        }
    }

    /// Index of the first row whose antecedent held, if any.
    #[must_use]
    pub fn matched_row(&self) -> Option<usize> {
        self.matched_row
    }

    /// The ruleset weight. `None` for decision rulesets.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Weighted score added to the total. `None` for decision rulesets.
    #[must_use]
    pub fn contribution(&self) -> Option<f64> {
        self.contribution
    }
}

/// Detailed execution report returned by
/// [`Rule::execute_detailed()`](super::rule::Rule::execute_detailed).
///
/// Contains the outcome, a trace per ruleset in declaration order, and the
/// wall-clock duration of the execution.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    outcome: Outcome,
    rulesets: Vec<RuleSetTrace>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(outcome: Outcome, rulesets: Vec<RuleSetTrace>, duration: Duration) -> Self {
        Self {
            outcome,
            rulesets,
            duration,
        }
    }

    /// The outcome, same as [`Rule::execute()`](super::rule::Rule::execute).
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn rulesets(&self) -> &[RuleSetTrace] {
        &self.rulesets
    }

    /// Indices of rulesets where no row matched. For a score rule these are
    /// the rulesets that contributed nothing to the total.
    #[must_use]
    pub fn unmatched(&self) -> Vec<usize> {
        self.rulesets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.matched_row.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Wall-clock duration of the execution.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outcome: {}", self.outcome)?;
        write!(f, ", rows: [")?;
        for (i, trace) in self.rulesets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match trace.matched_row {
                Some(row) => write!(f, "{row}")?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Decision;

    #[test]
    fn report_accessors() {
        let report = EvaluationReport::new(
            Outcome::Score(35.0),
            vec![
                RuleSetTrace::score(Some(2), 0.5, 15.0),
                RuleSetTrace::score(Some(2), 0.5, 20.0),
            ],
            Duration::from_nanos(500),
        );

        assert_eq!(report.outcome(), &Outcome::Score(35.0));
        assert_eq!(report.rulesets().len(), 2);
        assert_eq!(report.rulesets()[0].matched_row(), Some(2));
        assert_eq!(report.rulesets()[1].contribution(), Some(20.0));
        assert_eq!(report.rulesets()[1].weight(), Some(0.5));
        assert!(report.unmatched().is_empty());
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_unmatched() {
        let report = EvaluationReport::new(
            Outcome::Score(15.0),
            vec![
                RuleSetTrace::score(Some(0), 0.5, 15.0),
                RuleSetTrace::score(None, 0.5, 0.0),
            ],
            Duration::from_nanos(100),
        );
        assert_eq!(report.unmatched(), vec![1]);
    }

    #[test]
    fn report_display_with_decision() {
        let report = EvaluationReport::new(
            Outcome::Decision(Decision::from("GO")),
            vec![RuleSetTrace::decision(Some(1))],
            Duration::from_nanos(500),
        );
        let s = report.to_string();
        assert!(s.contains("outcome: decision \"GO\""));
        assert!(s.contains("rows: [1]"));
    }

    #[test]
    fn report_display_no_match() {
        let report = EvaluationReport::new(
            Outcome::NoMatch,
            vec![RuleSetTrace::decision(None)],
            Duration::from_nanos(100),
        );
        let s = report.to_string();
        assert!(s.contains("outcome: no match"));
        assert!(s.contains("rows: [-]"));
    }
}
