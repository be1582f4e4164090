//! Sign-change scan over a sampled difference sequence `d[i] = A(x_i) − B(x_i)`.

/// A located root candidate, by sample index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Bracket {
    /// `d[i]` is zero within ε; the root is the sample itself.
    Exact(usize),
    /// `d[i]` and `d[i + 1]` are non-zero with opposite signs.
    Straddle(usize),
}

#[inline]
pub(crate) fn is_zero(v: f64, eps: f64) -> bool {
    v == 0.0 || v.abs() < eps
}

/// Brackets in ascending sample order. A run of consecutive zero samples
/// yields one `Exact` at its smallest `|d|` (lowest index on ties).
pub(crate) fn scan(d: &[f64], eps: f64) -> Vec<Bracket> {
    let n = d.len();
    let mut out = Vec::new();
    let mut i = 0;
    while i < n {
        if is_zero(d[i], eps) {
            let mut best = i;
            while i + 1 < n && is_zero(d[i + 1], eps) {
                i += 1;
                if d[i].abs() < d[best].abs() {
                    best = i;
                }
            }
            out.push(Bracket::Exact(best));
        } else if i + 1 < n && !is_zero(d[i + 1], eps) && (d[i] < 0.0) != (d[i + 1] < 0.0) {
            out.push(Bracket::Straddle(i));
        }
        i += 1;
    }
    out
}

/// Every sample is zero within ε.
pub(crate) fn all_zero(d: &[f64], eps: f64) -> bool {
    d.iter().all(|&v| is_zero(v, eps))
}
