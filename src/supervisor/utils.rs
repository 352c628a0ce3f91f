use std::collections::BTreeMap;

use crate::{error::AppError, models::evaluations::VoiceEvaluation, utils::{parse_date_str, round2}};

pub const CRITERIA: [&str; 11] = [
    "Greeting",
    "Tone of Voice",
    "Empathy",
    "Listening",
    "Accuracy",
    "Policy Adherence",
    "Clarity",
    "Confidence",
    "Closing the Call",
    "Language Use",
    "Handling Difficult Situations",
];

/// Checks a score sheet and returns its mean, `None` when nothing was scored.
pub fn score_breakdown(scores: &BTreeMap<String, u8>) -> Result<Option<f64>, AppError> {
    for (criterion, score) in scores {
        if !CRITERIA.contains(&criterion.as_str()) {
            return Err(AppError::validation(format!(
                "Unknown criterion: {}",
                criterion
            )));
        }
        if !(1..=5).contains(score) {
            return Err(AppError::validation("Scores must be between 1 and 5."));
        }
    }

    if scores.is_empty() {
        return Ok(None);
    }
    let sum: u32 = scores.values().map(|&s| u32::from(s)).sum();
    Ok(Some(f64::from(sum) / scores.len() as f64))
}

/// Average over the evaluations that carry a score.
pub fn average_score(evaluations: &[VoiceEvaluation]) -> Option<f64> {
    let scores: Vec<f64> = evaluations.iter().filter_map(|e| e.score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(round2(scores.iter().sum::<f64>() / scores.len() as f64))
}

/// Trims leave dates, drops blanks and rejects anything that is not a date.
pub fn clean_leave_dates(dates: Vec<String>) -> Result<Vec<String>, AppError> {
    dates
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .map(|d| match parse_date_str(&d) {
            Some(_) => Ok(d),
            None => Err(AppError::validation("Invalid date.")),
        })
        .collect()
}
