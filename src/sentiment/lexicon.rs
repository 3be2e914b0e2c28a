use std::collections::HashMap;
use std::sync::LazyLock;

use crate::sentiment::{PolarityScorer, Score, ScoreError};

/// Multiplier applied to a sentiment word preceded by a negator
const NEGATION_FACTOR: f64 = -0.5;

/// How many tokens back a negator still applies
const NEGATION_WINDOW: usize = 3;

/// (word, polarity, subjectivity)
const WORDS: &[(&str, f64, f64)] = &[
    // positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("wonderful", 1.0, 1.0),
    ("perfect", 1.0, 1.0),
    ("perfectly", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("loves", 0.5, 0.6),
    ("like", 0.2, 0.4),
    ("liked", 0.4, 0.5),
    ("nice", 0.6, 1.0),
    ("happy", 0.8, 1.0),
    ("pleased", 0.5, 0.7),
    ("satisfied", 0.5, 0.7),
    ("impressed", 0.7, 0.8),
    ("impressive", 1.0, 1.0),
    ("recommend", 0.4, 0.5),
    ("recommended", 0.4, 0.5),
    ("worth", 0.3, 0.1),
    ("comfortable", 0.4, 0.7),
    ("comfy", 0.5, 0.8),
    ("clear", 0.1, 0.4),
    ("crisp", 0.4, 0.6),
    ("clean", 0.4, 0.7),
    ("easy", 0.4, 0.8),
    ("easily", 0.4, 0.8),
    ("fast", 0.2, 0.6),
    ("quick", 0.3, 0.5),
    ("quickly", 0.3, 0.5),
    ("seamless", 0.5, 0.7),
    ("solid", 0.2, 0.5),
    ("sturdy", 0.4, 0.6),
    ("reliable", 0.4, 0.5),
    ("beautiful", 0.85, 1.0),
    ("sleek", 0.5, 0.8),
    ("stylish", 0.5, 0.8),
    ("fine", 0.4, 0.5),
    ("decent", 0.2, 0.5),
    ("superb", 1.0, 1.0),
    ("outstanding", 0.5, 0.7),
    ("brilliant", 0.9, 1.0),
    ("incredible", 0.9, 0.9),
    ("fabulous", 0.4, 0.9),
    ("favorite", 0.5, 1.0),
    ("favourite", 0.5, 1.0),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.4, 0.5),
    ("glad", 0.5, 1.0),
    ("smooth", 0.4, 0.6),
    ("convenient", 0.4, 0.6),
    ("helpful", 0.5, 0.5),
    ("useful", 0.3, 0.0),
    ("affordable", 0.3, 0.5),
    ("cheap", 0.4, 0.7),
    ("valuable", 0.5, 0.6),
    ("quality", 0.1, 0.3),
    ("premium", 0.3, 0.5),
    ("rich", 0.4, 0.6),
    ("loud", 0.1, 0.5),
    ("powerful", 0.3, 1.0),
    ("strong", 0.4, 0.7),
    ("lightweight", 0.3, 0.5),
    ("portable", 0.2, 0.4),
    ("fun", 0.3, 0.2),
    ("cool", 0.35, 0.65),
    ("exceptional", 0.7, 0.8),
    ("flawless", 0.8, 0.9),
    ("pleasant", 0.7, 0.8),
    ("positive", 0.2, 0.5),
    ("right", 0.3, 0.5),
    ("correct", 0.3, 0.4),
    ("well", 0.2, 0.3),
    ("wow", 0.1, 1.0),
    ("thanks", 0.2, 0.2),
    // negative
    ("bad", -0.7, 0.7),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("poorly", -0.4, 0.6),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("disappointment", -0.6, 0.7),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("useless", -0.5, 0.2),
    ("broken", -0.4, 0.4),
    ("broke", -0.4, 0.4),
    ("cheaply", -0.3, 0.6),
    ("flimsy", -0.4, 0.7),
    ("uncomfortable", -0.5, 1.0),
    ("painful", -0.7, 0.9),
    ("annoying", -0.8, 0.9),
    ("frustrating", -0.4, 0.7),
    ("frustrated", -0.7, 0.4),
    ("defective", -0.5, 0.5),
    ("faulty", -0.5, 0.5),
    ("muffled", -0.3, 0.6),
    ("weak", -0.375, 0.625),
    ("slow", -0.3, 0.4),
    ("expensive", -0.5, 0.7),
    ("overpriced", -0.5, 0.7),
    ("waste", -0.2, 0.0),
    ("wasted", -0.2, 0.1),
    ("junk", -0.5, 0.6),
    ("garbage", -0.6, 0.7),
    ("problem", -0.2, 0.3),
    ("problems", -0.2, 0.3),
    ("issue", -0.1, 0.2),
    ("issues", -0.1, 0.2),
    ("wrong", -0.5, 0.9),
    ("fail", -0.5, 0.3),
    ("failed", -0.5, 0.3),
    ("fails", -0.5, 0.3),
    ("dead", -0.2, 0.4),
    ("died", -0.3, 0.4),
    ("dies", -0.3, 0.4),
    ("lost", -0.2, 0.3),
    ("loose", -0.2, 0.4),
    ("sad", -0.5, 1.0),
    ("unhappy", -0.6, 0.9),
    ("unfortunately", -0.5, 1.0),
    ("mediocre", -0.3, 0.6),
    ("average", -0.15, 0.4),
    ("difficult", -0.5, 1.0),
    ("hard", -0.3, 0.5),
    ("noisy", -0.3, 0.6),
    ("scratched", -0.2, 0.3),
    ("scratches", -0.2, 0.3),
    ("return", -0.1, 0.2),
    ("returned", -0.2, 0.2),
    ("refund", -0.2, 0.2),
    ("ugly", -0.7, 1.0),
    ("stupid", -0.8, 1.0),
    ("ridiculous", -0.3, 0.9),
    ("unreliable", -0.5, 0.6),
    ("unusable", -0.6, 0.6),
    ("negative", -0.3, 0.4),
    ("sucks", -0.7, 0.8),
    ("meh", -0.2, 0.6),
    ("okay", 0.05, 0.5),
    ("ok", 0.05, 0.5),
];

/// (word, multiplier) for words that strengthen or soften the next sentiment word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("super", 1.4),
    ("so", 1.3),
    ("too", 1.2),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.3),
    ("highly", 1.4),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("fairly", 0.9),
    ("somewhat", 0.8),
    ("slightly", 0.6),
    ("bit", 0.7),
    ("little", 0.7),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "neither", "nor", "without", "dont", "didnt",
    "doesnt", "isnt", "wasnt", "arent", "werent", "cant", "cannot", "couldnt", "wont",
    "wouldnt", "shouldnt", "havent", "hasnt", "hardly",
];

static LEXICON: LazyLock<HashMap<&'static str, (f64, f64)>> =
    LazyLock::new(|| WORDS.iter().map(|&(w, p, s)| (w, (p, s))).collect());

static INTENSITY: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| INTENSIFIERS.iter().copied().collect());

/// Word-list polarity scorer.
///
/// Each sentiment word contributes one assessment. An intensifier right
/// before it scales polarity and subjectivity; a negator up to three tokens
/// back flips and halves polarity. The score is the mean over assessments,
/// or zero when the text contains no sentiment words.
#[derive(Debug, Default, Clone)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    fn assessments(text: &str) -> Vec<(f64, f64)> {
        let mut found = Vec::new();
        let mut last_negator: Option<usize> = None;
        let mut intensity: Option<f64> = None;

        for (i, token) in text.split_whitespace().enumerate() {
            if NEGATORS.contains(&token) {
                last_negator = Some(i);
                intensity = None;
                continue;
            }

            if let Some(&factor) = INTENSITY.get(token) {
                intensity = Some(intensity.unwrap_or(1.0) * factor);
                continue;
            }

            let Some(&(polarity, subjectivity)) = LEXICON.get(token) else {
                intensity = None;
                continue;
            };

            let factor = intensity.take().unwrap_or(1.0);
            let mut polarity = (polarity * factor).clamp(-1.0, 1.0);
            let subjectivity = (subjectivity * factor).clamp(0.0, 1.0);

            if last_negator.is_some_and(|n| i - n <= NEGATION_WINDOW) {
                polarity *= NEGATION_FACTOR;
            }

            found.push((polarity, subjectivity));
        }

        found
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<Score, ScoreError> {
        let assessments = Self::assessments(text);
        if assessments.is_empty() {
            return Ok(Score {
                polarity: 0.0,
                subjectivity: 0.0,
            });
        }

        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|(_, s)| s).sum::<f64>() / n;

        Ok(Score {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> Score {
        LexiconScorer::new().score(text).unwrap()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(score("great").polarity, 0.8);
        assert_eq!(score("terrible").polarity, -1.0);
        assert!(score("this is great").polarity > 0.1);
    }

    #[test]
    fn test_no_sentiment_words_is_zero() {
        let s = score("the box arrived tuesday");
        assert_eq!(s.polarity, 0.0);
        assert_eq!(s.subjectivity, 0.0);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let s = score("not good");
        assert!((s.polarity - (-0.35)).abs() < 1e-9);
        assert!(score("dont like it").polarity < 0.0);
        assert!(score("never had a bad day").polarity > 0.0);
    }

    #[test]
    fn test_negation_window_is_bounded() {
        // "not" sits four tokens before "great"
        assert_eq!(score("not that it is great").polarity, 0.8);
    }

    #[test]
    fn test_intensifier_scales_next_word() {
        let plain = score("good").polarity;
        let strong = score("very good").polarity;
        assert!(strong > plain);
        assert!((strong - 0.91).abs() < 1e-9);
        // intensifier separated by a neutral word has no effect
        let mixed = score("very nice looking good").polarity;
        assert!((mixed - (0.78 + 0.7) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_over_assessments() {
        let s = score("great but terrible");
        assert!((s.polarity - (-0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let s = score("extremely absolutely incredibly perfect excellent awesome");
        assert!(s.polarity <= 1.0 && s.polarity >= -1.0);
        assert!(s.subjectivity <= 1.0 && s.subjectivity >= 0.0);
        let s = score("extremely terrible awful worst");
        assert!(s.polarity >= -1.0);
    }
}
