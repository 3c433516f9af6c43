/// [Szudzik pairing function][szudzik-pairing], wrapping on overflow.
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub fn pairing2(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Hash of a node's structure, used to pick its bucket in a
/// [`StrashTable`][crate::table::StrashTable].
pub trait NodeHash {
    fn node_hash(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_pairing2_small_grid() {
        // a\b  0  1  2
        // ------------
        // 0    0  1  4
        // 1    2  3  5
        // 2    6  7  8
        let expected = [[0, 1, 4], [2, 3, 5], [6, 7, 8]];
        for a in 0..3 {
            for b in 0..3 {
                assert_eq!(pairing2(a, b), expected[a as usize][b as usize]);
            }
        }
    }

    #[test]
    fn test_pairing_wraps() {
        assert_ne!(pairing2(u64::MAX, u64::MAX - 1), pairing2(u64::MAX - 1, u64::MAX));
        assert_ne!(pairing3(1, 2, 3), pairing3(3, 2, 1));
    }
}
