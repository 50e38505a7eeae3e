//! IR metrics over held-out labelled query/result pairs.
//!
//! `actual` and `predicted` hold one relevance-ordered docID list per
//! query. Set-based metrics are micro-averaged across queries; rank-based
//! metrics are computed per query and averaged.

use std::collections::HashSet;
use std::fmt;

/// Micro-averaged precision: relevant retrieved / retrieved
pub fn precision(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    let (mut tp, mut total) = (0usize, 0usize);
    for (actual_q, predicted_q) in actual.iter().zip(predicted) {
        let actual_set: HashSet<&String> = actual_q.iter().collect();
        let predicted_set: HashSet<&String> = predicted_q.iter().collect();
        tp += predicted_set.iter().filter(|id| actual_set.contains(*id)).count();
        total += predicted_set.len();
    }
    if total == 0 {
        0.0
    } else {
        tp as f64 / total as f64
    }
}

/// Micro-averaged recall: relevant retrieved / relevant
pub fn recall(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    let (mut tp, mut total) = (0usize, 0usize);
    for (actual_q, predicted_q) in actual.iter().zip(predicted) {
        let actual_set: HashSet<&String> = actual_q.iter().collect();
        let predicted_set: HashSet<&String> = predicted_q.iter().collect();
        tp += predicted_set.iter().filter(|id| actual_set.contains(*id)).count();
        total += actual_set.len();
    }
    if total == 0 {
        0.0
    } else {
        tp as f64 / total as f64
    }
}

/// Harmonic mean of precision and recall; 0 when both are 0
pub fn f1(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    let p = precision(actual, predicted);
    let r = recall(actual, predicted);
    if p == 0.0 && r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// Average precision of one ranked list: mean of precision-at-hit over
/// the hits; 0 when nothing relevant was retrieved
pub fn average_precision(actual: &[String], predicted: &[String]) -> f64 {
    let actual_set: HashSet<&String> = actual.iter().collect();
    let mut tp = 0usize;
    let mut sum = 0.0;
    for (rank, doc_id) in predicted.iter().enumerate() {
        if actual_set.contains(doc_id) {
            tp += 1;
            sum += tp as f64 / (rank + 1) as f64;
        }
    }
    if tp == 0 {
        0.0
    } else {
        sum / tp as f64
    }
}

pub fn mean_average_precision(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    mean_over_queries(actual, predicted, average_precision)
}

/// Graded gain of a hit: its reverse rank in the actual list
fn gain(actual: &[String], doc_id: &String) -> Option<f64> {
    actual
        .iter()
        .position(|id| id == doc_id)
        .map(|rank| (actual.len() - rank) as f64)
}

/// Discounted cumulative gain of one ranked list, natural-log discount
pub fn dcg_query(actual: &[String], predicted: &[String]) -> f64 {
    let mut total = 0.0;
    for (j, doc_id) in predicted.iter().enumerate() {
        if let Some(g) = gain(actual, doc_id) {
            if j == 0 {
                total += g;
            } else {
                total += g / ((j + 1) as f64).ln();
            }
        }
    }
    total
}

pub fn dcg(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    mean_over_queries(actual, predicted, dcg_query)
}

/// DCG normalized against the ideal cumulative gain at each rank
pub fn ndcg_query(actual: &[String], predicted: &[String]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    // ideal cumulative gain: the actual list retrieved in order
    let mut ideal: Vec<f64> = Vec::with_capacity(actual.len());
    for j in 0..actual.len() {
        let g = (actual.len() - j) as f64;
        if j == 0 {
            ideal.push(g);
        } else {
            ideal.push(ideal[j - 1] + g / ((j + 1) as f64).ln());
        }
    }

    let mut total = 0.0;
    for (j, doc_id) in predicted.iter().enumerate() {
        if let Some(g) = gain(actual, doc_id) {
            if j == 0 {
                total += g / actual.len() as f64;
            } else {
                let norm = ideal[j.min(ideal.len() - 1)];
                total += (g / ((j + 1) as f64).ln()) / norm;
            }
        }
    }
    total
}

pub fn ndcg(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    mean_over_queries(actual, predicted, ndcg_query)
}

/// 1 / rank of the first relevant result; 0 when none is relevant
pub fn reciprocal_rank(actual: &[String], predicted: &[String]) -> f64 {
    let actual_set: HashSet<&String> = actual.iter().collect();
    predicted
        .iter()
        .position(|id| actual_set.contains(id))
        .map(|rank| 1.0 / (rank + 1) as f64)
        .unwrap_or(0.0)
}

pub fn mean_reciprocal_rank(actual: &[Vec<String>], predicted: &[Vec<String>]) -> f64 {
    mean_over_queries(actual, predicted, reciprocal_rank)
}

fn mean_over_queries(
    actual: &[Vec<String>],
    predicted: &[Vec<String>],
    metric: fn(&[String], &[String]) -> f64,
) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| metric(a, p))
        .sum();
    sum / predicted.len() as f64
}

/// All metrics of one evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub map: f64,
    pub dcg: f64,
    pub ndcg: f64,
    pub mrr: f64,
}

pub fn evaluate(
    name: impl Into<String>,
    actual: &[Vec<String>],
    predicted: &[Vec<String>],
) -> EvaluationReport {
    EvaluationReport {
        name: name.into(),
        precision: precision(actual, predicted),
        recall: recall(actual, predicted),
        f1: f1(actual, predicted),
        map: mean_average_precision(actual, predicted),
        dcg: dcg(actual, predicted),
        ndcg: ndcg(actual, predicted),
        mrr: mean_reciprocal_rank(actual, predicted),
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "name = {}", self.name)?;
        writeln!(f, "precision = {}", self.precision)?;
        writeln!(f, "recall = {}", self.recall)?;
        writeln!(f, "f1 = {}", self.f1)?;
        writeln!(f, "map = {}", self.map)?;
        writeln!(f, "dcg = {}", self.dcg)?;
        writeln!(f, "ndcg = {}", self.ndcg)?;
        write!(f, "mrr = {}", self.mrr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_precision_recall_f1() {
        let actual = vec![ids(&["a", "b"])];
        let predicted = vec![ids(&["a", "c"])];

        assert_eq!(precision(&actual, &predicted), 0.5);
        assert_eq!(recall(&actual, &predicted), 0.5);
        assert_eq!(f1(&actual, &predicted), 0.5);

        // nothing retrieved
        let none: Vec<Vec<String>> = vec![vec![]];
        assert_eq!(precision(&actual, &none), 0.0);
        assert_eq!(f1(&actual, &none), 0.0);
    }

    #[test]
    fn test_micro_averaging_over_queries() {
        let actual = vec![ids(&["a"]), ids(&["b", "c"])];
        let predicted = vec![ids(&["a"]), ids(&["b", "x", "y"])];

        // tp = 1 + 1, retrieved = 1 + 3, relevant = 1 + 2
        assert!((precision(&actual, &predicted) - 0.5).abs() < 1e-9);
        assert!((recall(&actual, &predicted) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_precision() {
        let actual = ids(&["a", "b"]);
        assert_eq!(average_precision(&actual, &ids(&["a", "x"])), 1.0);
        assert_eq!(average_precision(&actual, &ids(&["x", "a"])), 0.5);
        // hits at ranks 1 and 2: (1/1 + 2/2) / 2
        assert_eq!(average_precision(&actual, &ids(&["a", "b"])), 1.0);
        assert_eq!(average_precision(&actual, &ids(&["x", "y"])), 0.0);
    }

    #[test]
    fn test_map_over_queries() {
        let actual = vec![ids(&["a"]), ids(&["b"])];
        let predicted = vec![ids(&["a"]), ids(&["x", "b"])];
        assert!((mean_average_precision(&actual, &predicted) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_dcg() {
        let actual = ids(&["a", "b"]);
        // first-rank hit on the top actual doc scores its full gain
        assert_eq!(dcg_query(&actual, &ids(&["a"])), 2.0);
        // second-rank hit is discounted by ln(2)
        let expected = 2.0 + 1.0 / 2f64.ln();
        assert!((dcg_query(&actual, &ids(&["a", "b"])) - expected).abs() < 1e-9);
        assert_eq!(dcg_query(&actual, &ids(&["x", "y"])), 0.0);
    }

    #[test]
    fn test_ndcg_prefers_better_ordering() {
        let actual = ids(&["a", "b"]);
        let perfect = ndcg_query(&actual, &ids(&["a", "b"]));
        let reversed = ndcg_query(&actual, &ids(&["b", "a"]));
        let nothing = ndcg_query(&actual, &ids(&["x", "y"]));

        assert!(perfect > reversed);
        assert!(reversed > nothing);
        assert_eq!(nothing, 0.0);
    }

    #[test]
    fn test_reciprocal_rank() {
        let actual = ids(&["a", "b"]);
        assert_eq!(reciprocal_rank(&actual, &ids(&["a"])), 1.0);
        assert_eq!(reciprocal_rank(&actual, &ids(&["x", "b"])), 0.5);
        assert_eq!(reciprocal_rank(&actual, &ids(&["x", "y"])), 0.0);

        let aq = vec![ids(&["a"]), ids(&["b"])];
        let pq = vec![ids(&["a"]), ids(&["x", "b"])];
        assert_eq!(mean_reciprocal_rank(&aq, &pq), 0.75);
    }

    #[test]
    fn test_report_display() {
        let actual = vec![ids(&["a"])];
        let predicted = vec![ids(&["a"])];
        let report = evaluate("baseline", &actual, &predicted);

        assert_eq!(report.precision, 1.0);
        assert_eq!(report.mrr, 1.0);
        let text = report.to_string();
        assert!(text.contains("name = baseline"));
        assert!(text.contains("precision = 1"));
    }
}
