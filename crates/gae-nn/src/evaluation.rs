//! Held-out link prediction metrics.
//!
//! A held-out set is scored as `σ(z_i · z_j)` for every positive and
//! negative pair. Labels are `1` for the positive list and `0` for the
//! negative list as given; they are not looked up in any adjacency.
//!
//! | Metric | Range | Description |
//! |--------|-------|-------------|
//! | ROC-AUC | [0, 1] | Probability a positive outranks a negative (ties count half) |
//! | AP | [0, 1] | Precision averaged over recall steps, `Σ (R_k - R_{k-1}) P_k` |

use crate::decoder::sigmoid;
use crate::{Error, Result};
use candle_core::Tensor;
use gae_core::Edge;

/// ROC-AUC and average precision of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkMetrics {
    pub roc_auc: f64,
    pub average_precision: f64,
}

impl LinkMetrics {
    /// Format as summary string.
    pub fn summary(&self) -> String {
        format!("ROC: {:.5} | AP: {:.5}", self.roc_auc, self.average_precision)
    }
}

/// Sigmoid scores of each pair's embedding inner product.
pub fn edge_scores(embeddings: &Tensor, edges: &[Edge]) -> Result<Vec<f64>> {
    let z = embeddings.to_vec2::<f32>()?;
    edges
        .iter()
        .map(|&(i, j)| {
            let (zi, zj) = match (z.get(i), z.get(j)) {
                (Some(zi), Some(zj)) => (zi, zj),
                _ => {
                    return Err(Error::DimensionMismatch {
                        expected: z.len(),
                        got: i.max(j) + 1,
                    })
                }
            };
            let dot: f64 = zi
                .iter()
                .zip(zj)
                .map(|(&a, &b)| f64::from(a) * f64::from(b))
                .sum();
            Ok(sigmoid(dot))
        })
        .collect()
}

/// Score positive and negative pairs and compute ROC-AUC and AP.
pub fn score(pos_edges: &[Edge], neg_edges: &[Edge], embeddings: &Tensor) -> Result<LinkMetrics> {
    let mut scores = edge_scores(embeddings, pos_edges)?;
    scores.extend(edge_scores(embeddings, neg_edges)?);

    let mut labels = vec![true; pos_edges.len()];
    labels.extend(std::iter::repeat(false).take(neg_edges.len()));

    Ok(LinkMetrics {
        roc_auc: roc_auc(&scores, &labels)?,
        average_precision: average_precision(&scores, &labels)?,
    })
}

/// Cumulative (true positives, false positives) at each distinct
/// threshold, scanning scores from high to low.
fn threshold_counts(scores: &[f64], labels: &[bool]) -> Result<Vec<(f64, f64)>> {
    if scores.len() != labels.len() {
        return Err(Error::DimensionMismatch {
            expected: labels.len(),
            got: scores.len(),
        });
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(Error::NumericalInstability("NaN score".to_string()));
    }
    let positives = labels.iter().filter(|&&l| l).count();
    if positives == 0 || positives == labels.len() {
        return Err(Error::Metric(
            "need at least one positive and one negative".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut counts = Vec::new();
    let (mut tp, mut fp) = (0.0, 0.0);
    for (k, &idx) in order.iter().enumerate() {
        if labels[idx] {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let last_of_tie = order
            .get(k + 1)
            .map_or(true, |&next| scores[next] != scores[idx]);
        if last_of_tie {
            counts.push((tp, fp));
        }
    }
    Ok(counts)
}

/// Area under the ROC curve (trapezoidal over distinct thresholds).
pub fn roc_auc(scores: &[f64], labels: &[bool]) -> Result<f64> {
    let counts = threshold_counts(scores, labels)?;
    let (total_tp, total_fp) = counts[counts.len() - 1];

    let mut area = 0.0;
    let (mut prev_tpr, mut prev_fpr) = (0.0, 0.0);
    for (tp, fp) in counts {
        let (tpr, fpr) = (tp / total_tp, fp / total_fp);
        area += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_tpr = tpr;
        prev_fpr = fpr;
    }
    Ok(area)
}

/// Average precision: `Σ (R_k - R_{k-1}) · P_k` over distinct thresholds.
pub fn average_precision(scores: &[f64], labels: &[bool]) -> Result<f64> {
    let counts = threshold_counts(scores, labels)?;
    let (total_tp, _) = counts[counts.len() - 1];

    let mut ap = 0.0;
    let mut prev_recall = 0.0;
    for (tp, fp) in counts {
        let recall = tp / total_tp;
        let precision = tp / (tp + fp);
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
    }
    Ok(ap)
}
