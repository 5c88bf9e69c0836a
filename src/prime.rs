//! Prime helpers used to size the slot array.

/// Result of a primality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primality {
    /// The number is prime.
    Prime,
    /// The number has a divisor other than 1 and itself.
    Composite,
    /// Primality is not defined for numbers below 2.
    Undefined,
}

/// Checks whether `n` is prime by trial division up to `√n`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> Primality {
    if n < 2 {
        return Primality::Undefined;
    }
    if n < 4 {
        return Primality::Prime;
    }
    if n % 2 == 0 {
        return Primality::Composite;
    }

    let mut divisor: usize = 3;
    while divisor.saturating_mul(divisor) <= n {
        if n % divisor == 0 {
            return Primality::Composite;
        }
        divisor = divisor.saturating_add(2);
    }
    Primality::Prime
}

/// Returns the smallest prime that is greater than or equal to `n`.
///
/// Inputs below 2 yield 2.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while is_prime(candidate) != Primality::Prime {
        candidate = candidate.saturating_add(1);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime_small_numbers() {
        assert_eq!(is_prime(0), Primality::Undefined);
        assert_eq!(is_prime(1), Primality::Undefined);
        assert_eq!(is_prime(2), Primality::Prime);
        assert_eq!(is_prime(3), Primality::Prime);
        assert_eq!(is_prime(4), Primality::Composite);
        assert_eq!(is_prime(9), Primality::Composite);
        assert_eq!(is_prime(53), Primality::Prime);
        assert_eq!(is_prime(100), Primality::Composite);
    }

    #[test]
    fn test_is_prime_squares_of_primes() {
        // The trial bound must include √n itself.
        for p in [3_usize, 5, 7, 11, 13, 101] {
            assert_eq!(is_prime(p * p), Primality::Composite, "{p}^2");
        }
    }

    #[test]
    fn test_is_prime_matches_sieve() {
        let limit = 2_000;
        let mut sieve = vec![true; limit];
        sieve[0] = false;
        sieve[1] = false;
        for i in 2..limit {
            if sieve[i] {
                for multiple in (i * i..limit).step_by(i) {
                    sieve[multiple] = false;
                }
            }
        }

        for (n, &prime) in sieve.iter().enumerate().skip(2) {
            let expected = if prime { Primality::Prime } else { Primality::Composite };
            assert_eq!(is_prime(n), expected, "n = {n}");
        }
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(25), 29);
        assert_eq!(next_prime(50), 53);
        assert_eq!(next_prime(53), 53);
        assert_eq!(next_prime(100), 101);
        assert_eq!(next_prime(200), 211);
    }
}
