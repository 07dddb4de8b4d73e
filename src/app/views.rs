//! Presentation-ready rows for the recommendation table

use crate::common::types::LossSequenceRecommendation;

/// Row colouring in the recommendation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Streak long enough to be worth betting on
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRow {
    pub recommendation: LossSequenceRecommendation,
    pub highlight: Highlight,
}

/// Sort by longest streak first and colour rows above `threshold`
pub fn recommendation_rows(
    mut recommendations: Vec<LossSequenceRecommendation>,
    threshold: i32,
) -> Vec<RecommendationRow> {
    recommendations.sort_by(|a, b| b.loss_sequence.cmp(&a.loss_sequence));
    recommendations
        .into_iter()
        .map(|recommendation| {
            let highlight = if recommendation.loss_sequence > threshold {
                Highlight::Green
            } else {
                Highlight::Red
            };
            RecommendationRow {
                recommendation,
                highlight,
            }
        })
        .collect()
}
