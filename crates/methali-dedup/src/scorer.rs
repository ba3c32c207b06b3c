//! Block-matching similarity in the Ratcliff/Obershelp style.
//!
//! `ratio = 2 * M / T`, where `M` is the total length of the matching blocks
//! found by recursively taking the longest common substring, and `T` is the
//! combined length of both strings. Lengths are counted in chars.

use std::collections::HashMap;

/// Second sequences at least this long drop their most frequent chars from
/// the block index (they still match when a block is extended over them).
const AUTOJUNK_MIN_LEN: usize = 200;

fn block_ratio(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / total as f64
}

/// Lookup tables over the second sequence, reusable across many first sequences.
struct BlockMatcher {
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
    counts: HashMap<char, usize>,
}

impl BlockMatcher {
    fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        let mut counts: HashMap<char, usize> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
            *counts.entry(c).or_insert(0) += 1;
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let popular = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= popular);
        }
        Self { b, b2j, counts }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given ranges; earliest `i`, then earliest `j`, wins ties.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { run_ending_at.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_ending_at = next;
        }

        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi && best_j + best_k < bhi && a[best_i + best_k] == b[best_j + best_k] {
            best_k += 1;
        }
        (best_i, best_j, best_k)
    }

    /// Total length of all matching blocks between `a` and the stored sequence.
    fn matched_len(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    fn ratio(&self, a: &[char]) -> f64 {
        block_ratio(self.matched_len(a), a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from shared char multiset.
    fn quick_ratio(&self, a: &[char]) -> f64 {
        let mut remaining = self.counts.clone();
        let mut matches = 0;
        for c in a {
            if let Some(n) = remaining.get_mut(c) {
                if *n > 0 {
                    *n -= 1;
                    matches += 1;
                }
            }
        }
        block_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from lengths alone.
    fn real_quick_ratio(&self, a: &[char]) -> f64 {
        block_ratio(a.len().min(self.b.len()), a.len() + self.b.len())
    }
}

/// Similarity of `a` to `b` in `[0, 1]`. Two empty strings score 1.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    BlockMatcher::new(b).ratio(&a)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'k> {
    pub key: &'k str,
    pub ratio: f64,
}

/// Picks the closest candidate that clears the acceptance cutoff.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityScorer {
    cutoff: f64,
}

impl SimilarityScorer {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff: cutoff.clamp(0.0, 1.0) }
    }

    pub fn score(&self, a: &str, b: &str) -> f64 {
        ratio(a, b)
    }

    /// Highest scoring candidate with a ratio of at least the cutoff.
    ///
    /// Candidates are screened against the query with the cheap length and
    /// multiset bounds before the full ratio. Equal ratios go to the
    /// lexicographically greater key. The returned ratio is `ratio(query, key)`.
    pub fn best_match<'k>(&self, query: &str, candidates: &[&'k str]) -> Option<BestMatch<'k>> {
        if query.is_empty() || candidates.is_empty() {
            return None;
        }
        let matcher = BlockMatcher::new(query);
        let mut best: Option<(f64, &'k str)> = None;
        for &candidate in candidates {
            let a: Vec<char> = candidate.chars().collect();
            if matcher.real_quick_ratio(&a) < self.cutoff || matcher.quick_ratio(&a) < self.cutoff {
                continue;
            }
            let r = matcher.ratio(&a);
            if r < self.cutoff {
                continue;
            }
            if best.map_or(true, |current| (r, candidate) > current) {
                best = Some((r, candidate));
            }
        }
        best.map(|(_, key)| BestMatch { key, ratio: ratio(query, key) })
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(0.75)
    }
}
