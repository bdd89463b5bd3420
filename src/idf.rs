//! # IDF Builder
//!
//! Builds an inverse-document-frequency map over the run's corpus (headline
//! titles plus every candidate title observed in the run), with Laplace-style
//! smoothing and a distinguished default for unseen tokens.

use std::collections::HashMap;

/// Per-run token → weight map, plus the default used for unseen tokens.
#[derive(Debug, Clone, Default)]
pub struct IdfMap {
    weights: HashMap<String, f32>,
    default: f32,
}

impl IdfMap {
    /// `idf(t) ≥ 0` for all t; unseen tokens fall back to the max observed
    /// weight, or `1.0` if that default is absent or zero.
    pub fn get(&self, token: &str) -> f32 {
        if let Some(&w) = self.weights.get(token) {
            return w;
        }
        if self.default > 0.0 {
            self.default
        } else {
            1.0
        }
    }
}

/// Build an IDF map from a corpus of token sequences (one per document).
///
/// `idf(t) = log(1 + N / (1 + df(t)))` where `N` is the document count and
/// `df(t)` the number of documents containing `t` at least once.
pub fn build_idf<'a, I, D>(documents: I) -> IdfMap
where
    I: IntoIterator<Item = D>,
    D: IntoIterator<Item = &'a str>,
{
    let mut df: HashMap<String, u32> = HashMap::new();
    let mut n: u32 = 0;

    for doc in documents {
        n += 1;
        let mut seen = std::collections::HashSet::new();
        for tok in doc {
            if seen.insert(tok.to_string()) {
                *df.entry(tok.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut weights = HashMap::with_capacity(df.len());
    let mut max_w = 0.0f32;
    for (tok, count) in df {
        let w = (1.0 + (n as f32) / (1.0 + count as f32)).ln();
        max_w = max_w.max(w);
        weights.insert(tok, w);
    }

    IdfMap { weights, default: max_w }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negativity_and_rarity_smoothing() {
        let corpus = vec![
            vec!["carbon", "price", "eua"],
            vec!["carbon", "market"],
            vec!["carbon", "eua", "price"],
        ];
        let idf = build_idf(corpus);
        assert!(idf.get("carbon") >= 0.0);
        assert!(idf.get("eua") >= 0.0);
        // "carbon" appears in every document; "eua" in 2/3.
        assert!(idf.get("carbon") < idf.get("eua"));
    }

    #[test]
    fn unseen_token_uses_max_default() {
        let corpus = vec![vec!["carbon"], vec!["carbon", "price"]];
        let idf = build_idf(corpus);
        let max = idf.get("carbon").max(idf.get("price"));
        assert_eq!(idf.get("never-seen-token"), max);
    }

    #[test]
    fn empty_corpus_yields_default_one() {
        let idf = build_idf(Vec::<Vec<&str>>::new());
        assert_eq!(idf.get("anything"), 1.0);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let corpus = || vec![vec!["a", "b"], vec!["b", "c"]];
        let i1 = build_idf(corpus());
        let i2 = build_idf(corpus());
        assert_eq!(i1.get("a"), i2.get("a"));
        assert_eq!(i1.get("b"), i2.get("b"));
        assert_eq!(i1.get("c"), i2.get("c"));
    }
}
