//! Successor primitives for integer sequences, permutations, and partitions.
//!
//! Every function here advances a caller-owned slice to its successor in a
//! well-defined total order, in place. The return value says whether a
//! successor existed: on `false` the slice is left untouched, which is the
//! uniform exhaustion signal used by the schedule spaces in [`crate::space`].
//!
//! The enumerators rely on pointwise agreement with these orders — each
//! function must produce *the* successor, not merely *a* valid next value —
//! so the orders are spelled out precisely in the doc comments, with the
//! worked examples the test module pins down.
//!
//! # Reference
//! Knuth, "The Art of Computer Programming", Vol. 4A, §7.2.1 (generating
//! all tuples, permutations, and compositions)

/// Advances `a`, with digits in `0..b`, to the next sequence in
/// lexicographic order where index 0 has lowest order (changes most
/// frequently).
///
/// Example: with `b = 4` and `a = [2,2,3,0]`, one call yields `[3,2,3,0]`
/// and the next yields `[0,3,3,0]`. Returns `false` (leaving `a`
/// unmodified) once `a` is all `b-1`. An empty alphabet (`b == 0`) has no
/// successor.
pub fn next_lex_lo(b: u32, a: &mut [u32]) -> bool {
    if b == 0 {
        return false;
    }
    let n = a.len();
    let mut i = 0;
    while i < n {
        if a[i] != b - 1 {
            break;
        }
        i += 1;
    }
    if i >= n {
        return false;
    }
    a[i] += 1;
    for d in a[..i].iter_mut() {
        *d = 0;
    }
    true
}

/// Same order as [`next_lex_lo`] except index `n-1` has lowest order,
/// i.e. the sequence reads as a conventional big-endian counter.
pub fn next_lex_hi(b: u32, a: &mut [u32]) -> bool {
    if b == 0 {
        return false;
    }
    let n = a.len();
    let mut i = n;
    while i > 0 {
        if a[i - 1] != b - 1 {
            break;
        }
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    a[i - 1] += 1;
    for d in a[i..].iter_mut() {
        *d = 0;
    }
    true
}

/// Compares two equal-length digit rows in the low-order-first sense:
/// index `n-1` is the most significant digit.
pub fn compare_lo(a1: &[u32], a2: &[u32]) -> std::cmp::Ordering {
    assert_eq!(a1.len(), a2.len());
    for i in (0..a1.len()).rev() {
        match a1[i].cmp(&a2[i]) {
            std::cmp::Ordering::Equal => {}
            ord => return ord,
        }
    }
    std::cmp::Ordering::Equal
}

/// Whether every entry of `a` equals `val`.
pub fn is_const(a: &[u32], val: u32) -> bool {
    a.iter().all(|&x| x == val)
}

/// [`next_lex_lo`] lifted to a jagged 2-D structure: the rows, flattened
/// row 0 first, form one mixed-radix sequence with digits in `0..b`.
pub fn next_lex_lo_2d(b: u32, a: &mut [Vec<u32>]) -> bool {
    if b == 0 {
        return false;
    }
    let n = a.len();
    let mut i = 0;
    while i < n {
        if !is_const(&a[i], b - 1) {
            break;
        }
        i += 1;
    }
    if i >= n {
        return false;
    }
    next_lex_lo(b, &mut a[i]);
    for row in a[..i].iter_mut() {
        row.fill(0);
    }
    true
}

/// Symmetry-reduced variant of [`next_lex_lo_2d`].
///
/// `alike[i]` declares rows `i` and `i+1` to belong to the same symmetric
/// group (they must then have equal length). A row `i` with `alike[i]` set
/// is only allowed to advance while it is strictly below row `i+1` in the
/// [`compare_lo`] order, so adjacent alike rows stay sorted non-decreasingly.
/// That is the canonical-representative condition for the equivalence
/// induced by swapping two symmetric rows: the reduced order visits exactly
/// one member of each equivalence class visited by the plain order.
pub fn next_lex_lo_2d_sym(b: u32, a: &mut [Vec<u32>], alike: &[bool]) -> bool {
    assert_eq!(a.len(), 1 + alike.len());
    if b == 0 {
        return false;
    }
    let n = a.len();
    let mut i = 0;
    while i < n {
        if i < n - 1 && alike[i] {
            if compare_lo(&a[i], &a[i + 1]) == std::cmp::Ordering::Less {
                break;
            }
        } else if !is_const(&a[i], b - 1) {
            break;
        }
        i += 1;
    }
    if i >= n {
        return false;
    }
    next_lex_lo(b, &mut a[i]);
    for row in a[..i].iter_mut() {
        row.fill(0);
    }
    true
}

/// Advances a permutation of `0..n` to its successor in increasing
/// lexicographic order with index 0 lowest-order.
///
/// Example: `[1,2,3,0]` advances to `[3,2,0,1]`. Returns `false` at the
/// maximum `[0,1,…,n-1]` — note the orientation: the *identity* is last.
pub fn next_perm_lo(a: &mut [u32]) -> bool {
    let n = a.len();
    if n < 2 {
        return false;
    }
    // pivot: first index whose left neighbor exceeds it
    let mut i = 1;
    while i < n {
        if a[i] < a[i - 1] {
            break;
        }
        i += 1;
    }
    if i >= n {
        return false;
    }
    let p = a[i];
    let mut j = 0;
    while a[j] < p {
        j += 1;
    }
    debug_assert!(j < i);
    a[i] = a[j];
    a[j] = p;
    // prefix 0..i is sorted ascending; reverse it to the low-order minimum
    a[..i].sort_unstable();
    a[..i].reverse();
    true
}

/// [`next_perm_lo`] with index 0 highest-order: the classic textbook
/// next-permutation. Returns `false` at the reversal `[n-1,…,1,0]`.
pub fn next_perm_hi(a: &mut [u32]) -> bool {
    let n = a.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 {
        if a[i - 1] < a[i] {
            break;
        }
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let i = i - 1;
    let p = a[i];
    let mut j = n - 1;
    while a[j] < p {
        j -= 1;
    }
    debug_assert!(j > i);
    a[i] = a[j];
    a[j] = p;
    a[i + 1..].sort_unstable();
    true
}

/// [`next_perm_lo`] over a jagged 2-D structure holding one permutation
/// flattened across its rows. The rows are spliced back only when a
/// successor exists.
pub fn next_perm_lo_2d(a: &mut [Vec<u32>]) -> bool {
    let mut flat: Vec<u32> = a.iter().flatten().copied().collect();
    if !next_perm_lo(&mut flat) {
        return false;
    }
    let mut it = flat.into_iter();
    for row in a.iter_mut() {
        for (x, v) in row.iter_mut().zip(&mut it) {
            *x = v;
        }
    }
    true
}

/// Advances a composition of a fixed sum into `a.len()` positive parts to
/// its lexicographic successor, index 0 lowest-order.
///
/// Scanning from index 1 upward, the first entry whose left neighbor
/// exceeds 1 is incremented; entries below it reset to 1 except index 0,
/// which absorbs the remainder so the sum is preserved. The 4-part
/// compositions of 6 thus run `[3,1,1,1]`, `[2,2,1,1]`, `[1,3,1,1]`,
/// `[2,1,2,1]`, …, ending at `[1,1,1,3]`.
pub fn next_partition_lo(a: &mut [usize]) -> bool {
    let k = a.len();
    let mut idx = 1;
    let mut sum = a[0];
    while idx < k {
        sum += a[idx];
        if a[idx - 1] > 1 {
            break;
        }
        idx += 1;
    }
    if idx == k {
        return false;
    }
    a[idx] += 1;
    for e in a[1..idx].iter_mut() {
        *e = 1;
    }
    a[0] = 1 + sum - a[idx] - idx;
    true
}

/// [`next_partition_lo`] with index `k-1` lowest-order.
pub fn next_partition_hi(a: &mut [usize]) -> bool {
    let k = a.len();
    let mut idx = 1;
    let mut sum = a[k - 1];
    while idx < k {
        sum += a[k - idx - 1];
        if a[k - idx] > 1 {
            break;
        }
        idx += 1;
    }
    if idx == k {
        return false;
    }
    a[k - idx - 1] += 1;
    for i in 1..idx {
        a[k - i - 1] = 1;
    }
    a[k - 1] = 1 + sum - a[k - idx - 1] - idx;
    true
}

/// Advances a *representative* partition (non-increasing parts) to the next
/// representative under the equivalence induced by permuting parts.
///
/// An increment at `idx` is accepted only if stuttering the incremented
/// value all the way to index 0 keeps the running sum feasible, i.e.
/// `(idx+1) * (a[idx]+1) <= sum`; entries left of `idx` become copies of
/// the new value except index 0, which absorbs the remainder. The
/// representative 4-partitions of 10 run `[7,1,1,1]`, `[6,2,1,1]`,
/// `[5,3,1,1]`, `[4,4,1,1]`, `[5,2,2,1]`, `[4,3,2,1]`, `[3,3,3,1]`,
/// `[4,2,2,2]`, `[3,3,2,2]`.
pub fn next_partition_sym_lo(a: &mut [usize]) -> bool {
    let k = a.len();
    let mut idx = 1;
    let mut sum = a[0];
    while idx < k {
        sum += a[idx];
        if (idx + 1) * (a[idx] + 1) <= sum {
            break;
        }
        idx += 1;
    }
    if idx == k {
        return false;
    }
    a[idx] += 1;
    let v = a[idx];
    for e in a[1..idx].iter_mut() {
        *e = v;
    }
    a[0] = sum - idx * v;
    debug_assert!(a[0] >= v);
    true
}

/// [`next_partition_sym_lo`] with index `k-1` lowest-order (parts
/// non-decreasing left to right).
pub fn next_partition_sym_hi(a: &mut [usize]) -> bool {
    let k = a.len();
    let mut idx = 1;
    let mut sum = a[k - 1];
    while idx < k {
        sum += a[k - idx - 1];
        if (idx + 1) * (a[k - idx - 1] + 1) <= sum {
            break;
        }
        idx += 1;
    }
    if idx == k {
        return false;
    }
    a[k - idx - 1] += 1;
    let v = a[k - idx - 1];
    for i in 1..idx {
        a[k - i - 1] = v;
    }
    a[k - 1] = sum - idx * v;
    debug_assert!(a[k - 1] >= v);
    true
}
