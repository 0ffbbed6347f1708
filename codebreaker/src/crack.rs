//! Attacks on the classical collaborators

use crate::report::{Dashboard, Severity};
use crate::stats::{letters, LetterCounts, PLAIN_IC_THRESHOLD};
use anyhow::{bail, Result};
use rotorkit::classic::{Caesar, Vigenere};
use rotorkit::{Alphabet, Cipher};
use std::path::Path;

const PREVIEW_LEN: usize = 40;

#[derive(Debug, Clone)]
pub struct ShiftCandidate {
    pub shift: usize,
    pub chi_squared: f64,
    pub preview: String,
}

/// Every Caesar shift, best English fit first
pub fn rank_shifts(text: &str) -> Result<Vec<ShiftCandidate>> {
    let mut candidates = Vec::with_capacity(26);
    for shift in 0..26 {
        let plain = Caesar::new(shift as i64, Alphabet::latin()).decode(text)?;
        candidates.push(ShiftCandidate {
            shift,
            chi_squared: LetterCounts::from_text(&plain).chi_squared(),
            preview: plain.chars().take(PREVIEW_LEN).collect(),
        });
    }
    candidates.sort_by(|a, b| a.chi_squared.total_cmp(&b.chi_squared));
    Ok(candidates)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodScore {
    pub period: usize,
    pub average_ic: f64,
}

/// Average index of coincidence of the columns for each period `1..=max`
pub fn period_scores(letters: &[usize], max: usize) -> Vec<PeriodScore> {
    (1..=max.min(letters.len() / 2))
        .map(|period| {
            let total: f64 = (0..period)
                .map(|offset| {
                    LetterCounts::from_letters(letters.iter().skip(offset).step_by(period))
                        .index_of_coincidence()
                })
                .sum();
            PeriodScore {
                period,
                average_ic: total / period as f64,
            }
        })
        .collect()
}

/// Shortest period whose columns read as plain language, else the best score
pub fn estimate_period(scores: &[PeriodScore]) -> Option<usize> {
    scores
        .iter()
        .find(|s| s.average_ic >= PLAIN_IC_THRESHOLD)
        .or_else(|| scores.iter().max_by(|a, b| a.average_ic.total_cmp(&b.average_ic)))
        .map(|s| s.period)
}

/// Most likely Vigenère key of the given period
pub fn recover_key(letters: &[usize], period: usize) -> String {
    (0..period)
        .map(|offset| {
            let column: Vec<usize> = letters.iter().skip(offset).step_by(period).copied().collect();
            let shift = (0..26)
                .min_by(|&a, &b| {
                    column_chi(&column, a).total_cmp(&column_chi(&column, b))
                })
                .unwrap_or(0);
            (b'A' + shift as u8) as char
        })
        .collect()
}

fn column_chi(column: &[usize], shift: usize) -> f64 {
    let shifted: Vec<usize> = column.iter().map(|&c| (c + 26 - shift) % 26).collect();
    LetterCounts::from_letters(&shifted).chi_squared()
}

fn read_letters(path: &Path) -> Result<(String, Vec<usize>)> {
    let text = std::fs::read_to_string(path)?;
    let letters = letters(&text);
    if letters.len() < 2 {
        bail!("{} holds fewer than 2 letters", path.display());
    }
    Ok((text, letters))
}

pub fn caesar_report(path: &Path, top: usize) -> Result<String> {
    let (text, _) = read_letters(path)?;
    let ranked = rank_shifts(&text)?;

    let mut dashboard = Dashboard::new("Caesar Shift Ranking");
    dashboard.section("Candidates");
    for (rank, candidate) in ranked.iter().take(top.max(1)).enumerate() {
        let severity = if rank == 0 { Severity::Pass } else { Severity::Warn };
        dashboard.metric(
            &format!("#{} shift {}", rank + 1, candidate.shift),
            format!("χ² {:.1}", candidate.chi_squared),
            candidate.preview.clone(),
            severity,
        );
    }

    let mut output = String::new();
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Best shift: {}\n\n", ranked[0].shift));
    output.push_str(&dashboard.render());
    Ok(output)
}

pub fn period_report(path: &Path, max: usize) -> Result<String> {
    let (text, letters) = read_letters(path)?;
    let scores = period_scores(&letters, max);
    let Some(period) = estimate_period(&scores) else {
        bail!("text too short to estimate a period");
    };
    let key = recover_key(&letters, period);
    let plain = Vigenere::new(&key, Alphabet::latin())?.decode(&text)?;

    let mut dashboard = Dashboard::new("Vigenère Period Estimate");
    dashboard.section("Periods");
    for score in &scores {
        let severity = if score.period == period {
            Severity::Pass
        } else if score.average_ic >= PLAIN_IC_THRESHOLD {
            Severity::Warn
        } else {
            Severity::Fail
        };
        dashboard.metric(
            &format!("period {}", score.period),
            format!("{:.4}", score.average_ic),
            "average column IoC",
            severity,
        );
    }

    let mut output = String::new();
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Likely period: {}\n", period));
    output.push_str(&format!("Likely key: {}\n", key));
    output.push_str(&format!(
        "Preview: {}\n\n",
        plain.chars().take(PREVIEW_LEN).collect::<String>()
    ));
    output.push_str(&dashboard.render());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::SAMPLE;

    #[test]
    fn test_caesar_shift_found() {
        let ciphertext = Caesar::new(3, Alphabet::latin()).encode(SAMPLE).unwrap();
        let ranked = rank_shifts(&ciphertext).unwrap();
        assert_eq!(ranked.len(), 26);
        assert_eq!(ranked[0].shift, 3);
        assert!(ranked[0].preview.starts_with("ITWASLATEINTHEAUTUMN"));
        assert!(ranked[0].chi_squared * 10.0 < ranked[1].chi_squared);
    }

    #[test]
    fn test_vigenere_period_and_key() {
        let ciphertext = Vigenere::new("LEMON", Alphabet::latin())
            .unwrap()
            .encode(SAMPLE)
            .unwrap();
        let l = letters(&ciphertext);
        let scores = period_scores(&l, 12);
        assert_eq!(scores.len(), 12);
        assert_eq!(estimate_period(&scores), Some(5));
        assert!(scores[4].average_ic > 0.065);
        assert!(scores[3].average_ic < PLAIN_IC_THRESHOLD);
        assert_eq!(recover_key(&l, 5), "LEMON");
    }

    #[test]
    fn test_period_scores_capped_by_length() {
        let l = letters("ABCDEF");
        assert_eq!(period_scores(&l, 12).len(), 3);
        assert_eq!(estimate_period(&[]), None);
    }
}
