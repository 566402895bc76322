//! Ratcliff/Obershelp string similarity for fuzzy city resolution.
//!
//! The score is `2·M / (|a| + |b|)` where `M` is the number of characters in
//! the matching blocks found by repeatedly taking the longest common
//! substring and recursing on the pieces either side of it. Long candidate
//! strings (200+ chars) skip very frequent characters when indexing, as the
//! classic gestalt matcher does.

use std::collections::HashMap;

/// Sequences this long or longer drop "popular" characters from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity in `[0, 1]`; two empty strings score `1.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = Matcher::new(&a, &b).matching_characters();
    2.0 * matches as f64 / total as f64
}

/// Best candidate scoring at least `cutoff` against `word`.
///
/// Ties on score go to the lexicographically greatest candidate.
pub fn best_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(f64, &'a str)> = None;
    for candidate in candidates {
        let score = ratio(candidate, word);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_name)) => {
                score > best_score || (score == best_score && candidate > best_name)
            }
        };
        if better {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, name)| name)
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Total size of all matching blocks.
    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows,
    /// earliest in `a` (then in `b`) among equally long blocks.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            let Some(positions) = self.a.get(i).and_then(|ch| self.b2j.get(ch)) else {
                j2len = next;
                continue;
            };
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
            j2len = next;
        }

        // Characters pruned from the index can still extend a block.
        while best_i > alo && best_j > blo && self.a.get(best_i - 1) == self.b.get(best_j - 1) {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi
            && best_j + best_k < bhi
            && self.a.get(best_i + best_k) == self.b.get(best_j + best_k)
        {
            best_k += 1;
        }
        (best_i, best_j, best_k)
    }
}
