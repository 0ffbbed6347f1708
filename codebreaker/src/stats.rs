use crate::report::{Dashboard, Severity};
use anyhow::{bail, Result};
use rotorkit::text::{tokenize, NonAlphabetic, Token};
use rotorkit::Alphabet;
use std::collections::HashMap;
use std::path::Path;

/// Relative letter frequencies of English text, A to Z
pub const ENGLISH: [f64; 26] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094, 0.06966, 0.00153,
    0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056,
    0.02758, 0.00978, 0.02360, 0.00150, 0.01974, 0.00074,
];

/// Index of coincidence of English text
pub const ENGLISH_IC: f64 = 0.0667;
/// Index of coincidence of uniformly random letters
pub const RANDOM_IC: f64 = 1.0 / 26.0;
/// Above this a column reads as monoalphabetic
pub const PLAIN_IC_THRESHOLD: f64 = 0.055;

/// Letter indices of `text`; everything else is dropped
pub fn letters(text: &str) -> Vec<usize> {
    let alphabet = Alphabet::latin();
    tokenize(text, &alphabet, NonAlphabetic::PassThrough)
        .map(|tokens| {
            tokens
                .into_iter()
                .filter_map(|t| match t {
                    Token::Symbol(i) => Some(i),
                    Token::Literal(_) => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterCounts {
    counts: [u64; 26],
    total: u64,
}

impl LetterCounts {
    pub fn from_letters<'a>(letters: impl IntoIterator<Item = &'a usize>) -> Self {
        let mut counts = [0u64; 26];
        let mut total = 0;
        for &i in letters {
            counts[i % 26] += 1;
            total += 1;
        }
        Self { counts, total }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_letters(&letters(text))
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn index_of_coincidence(&self) -> f64 {
        if self.total < 2 {
            return 0.0;
        }
        let numerator: u64 = self.counts.iter().map(|&c| c * c.saturating_sub(1)).sum();
        numerator as f64 / (self.total * (self.total - 1)) as f64
    }

    /// Chi-squared distance from English letter frequencies
    pub fn chi_squared(&self) -> f64 {
        let n = self.total as f64;
        self.counts
            .iter()
            .zip(ENGLISH.iter())
            .map(|(&observed, &p)| {
                let expected = n * p;
                (observed as f64 - expected).powi(2) / expected
            })
            .sum()
    }

    /// Most frequent letters, ties broken alphabetically
    pub fn most_common(&self, limit: usize) -> Vec<(char, u64)> {
        let mut items: Vec<(char, u64)> = self
            .counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| ((b'A' + i as u8) as char, c))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        items.truncate(limit);
        items
    }
}

pub fn top_ngrams(letters: &[usize], n: usize, limit: usize) -> Vec<(String, usize)> {
    if n == 0 || letters.len() < n {
        return Vec::new();
    }
    let mut map: HashMap<String, usize> = HashMap::new();
    for window in letters.windows(n) {
        let gram: String = window.iter().map(|&i| (b'A' + i as u8) as char).collect();
        *map.entry(gram).or_insert(0) += 1;
    }
    let mut items: Vec<_> = map.into_iter().filter(|(_, c)| *c > 1).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    items.truncate(limit);
    items
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Repeated trigrams and the gcd of their distances
pub fn kasiski(letters: &[usize]) -> Option<(usize, usize)> {
    let mut positions: HashMap<&[usize], Vec<usize>> = HashMap::new();
    for (i, window) in letters.windows(3).enumerate() {
        positions.entry(window).or_default().push(i);
    }
    let mut divisor = 0;
    let mut repeated = 0;
    for pos in positions.values().filter(|p| p.len() > 1) {
        repeated += 1;
        for pair in pos.windows(2) {
            divisor = gcd(divisor, pair[1] - pair[0]);
        }
    }
    (repeated > 0).then_some((repeated, divisor))
}

fn severity_ic(ic: f64) -> Severity {
    if ic >= 0.060 {
        Severity::Pass
    } else if ic >= 0.045 {
        Severity::Warn
    } else {
        Severity::Fail
    }
}

fn severity_chi(chi: f64, total: u64) -> Severity {
    // Scale with length; short samples are noisy
    let per_letter = chi / total.max(1) as f64;
    if per_letter < 0.3 {
        Severity::Pass
    } else if per_letter < 1.0 {
        Severity::Warn
    } else {
        Severity::Fail
    }
}

fn format_grams(grams: &[(String, usize)]) -> String {
    if grams.is_empty() {
        return "none repeated".into();
    }
    grams
        .iter()
        .map(|(g, c)| format!("{} ({})", g, c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Letter statistics report for a text file
pub fn run(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    let letters = letters(&text);
    if letters.len() < 2 {
        bail!("{} holds fewer than 2 letters", path.display());
    }
    let counts = LetterCounts::from_letters(&letters);
    let ic = counts.index_of_coincidence();
    let chi = counts.chi_squared();

    let mut dashboard = Dashboard::new("Letter Statistics");
    dashboard
        .section("Frequency")
        .metric("Letters", counts.total().to_string(), "A-Z after case folding", Severity::Pass)
        .metric(
            "Most Common",
            counts
                .most_common(6)
                .iter()
                .map(|(c, n)| format!("{}:{}", c, n))
                .collect::<Vec<_>>()
                .join(" "),
            "English leads with E T A O I N",
            Severity::Pass,
        )
        .metric(
            "Index of Coincidence",
            format!("{:.4}", ic),
            format!("English ≈ {:.4}, random ≈ {:.4}", ENGLISH_IC, RANDOM_IC),
            severity_ic(ic),
        )
        .metric(
            "Chi-squared vs English",
            format!("{:.1}", chi),
            "Lower is closer to English",
            severity_chi(chi, counts.total()),
        );

    let kasiski_value = match kasiski(&letters) {
        Some((repeats, divisor)) => format!("{} repeats, gcd distance {}", repeats, divisor),
        None => "no repeated trigrams".into(),
    };
    dashboard
        .section("Structure")
        .metric(
            "Top Bigrams",
            format_grams(&top_ngrams(&letters, 2, 4)),
            "Repeated letter pairs",
            Severity::Pass,
        )
        .metric(
            "Top Trigrams",
            format_grams(&top_ngrams(&letters, 3, 4)),
            "Repeated letter triples",
            Severity::Pass,
        )
        .metric("Kasiski", kasiski_value, "Hints at a periodic key", Severity::Pass);

    let mut output = String::new();
    output.push_str("Codebreaker Letter Analysis\n");
    output.push_str("===========================\n\n");
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Verdict: {}\n\n", dashboard.status()));
    output.push_str(&dashboard.render());
    Ok(output)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) const SAMPLE: &str = "It was late in the autumn when the signal station on the \
        northern ridge received the first of the new rotor machines. The operators had trained \
        for weeks on paper tables and hand ciphers, and most of them believed the machine would \
        be slower than a skilled clerk with a pencil. Within a month they had changed their \
        minds. Messages that once took an hour to prepare were ready in minutes, and the \
        officers at the headquarters stopped complaining about delays. Still, the senior \
        sergeant insisted that every operator keep practicing the old methods, because a \
        machine can be lost or broken, while a trained mind travels with the soldier wherever \
        he goes.";

    #[test]
    fn test_letters_skip_everything_else() {
        assert_eq!(letters("a-B c1"), vec![0, 1, 2]);
        assert!(letters("1234 !?").is_empty());
    }

    #[test]
    fn test_english_frequencies_sum_to_one() {
        let sum: f64 = ENGLISH.iter().sum();
        assert!((sum - 1.0).abs() < 0.001, "sum {}", sum);
    }

    #[test]
    fn test_sample_reads_as_english() {
        let counts = LetterCounts::from_text(SAMPLE);
        assert_eq!(counts.total(), 531);
        assert!(counts.index_of_coincidence() > 0.065);
        assert!(counts.chi_squared() < 40.0);
        assert_eq!(counts.most_common(1)[0].0, 'E');
    }

    #[test]
    fn test_uniform_text_is_flat() {
        let text: String = "ABCDEFGHIJKLMNOPQRSTUVWXYZ".repeat(4);
        let counts = LetterCounts::from_text(&text);
        assert!((counts.index_of_coincidence() - 3.0 / 103.0).abs() < 1e-9);
        assert_eq!(severity_ic(counts.index_of_coincidence()), Severity::Fail);
    }

    #[test]
    fn test_ngrams_and_kasiski() {
        let l = letters("THEXTHEYTHEZ");
        assert_eq!(top_ngrams(&l, 3, 2), vec![("THE".to_string(), 3)]);
        assert_eq!(kasiski(&l), Some((1, 4)));
        assert_eq!(kasiski(&letters("ABCDEFG")), None);
    }

    #[test]
    fn test_report_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let report = run(&path).unwrap();
        assert!(report.contains("Codebreaker Letter Analysis"));
        assert!(report.contains("Index of Coincidence"));
        assert!(report.contains("| 531 "));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "1234").unwrap();
        assert!(run(&empty).is_err());
    }
}
