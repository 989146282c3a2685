//! Globally unique site names

use rand::Rng;

/// Suffixes are drawn uniformly from `0..SUFFIX_BOUND`
pub const SUFFIX_BOUND: u32 = 1_000_000;

/// Append a random numeric suffix to `prefix`
///
/// Site hostnames share one global namespace, so a fixed name would collide
/// across runs and across users.
pub fn site_name<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let suffix = rng.gen_range(0..SUFFIX_BOUND);
    format!("{}{}", prefix, suffix)
}

/// Recover the numeric suffix of a name produced by [`site_name`]
pub fn parse_suffix(prefix: &str, name: &str) -> Option<u32> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n < SUFFIX_BOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PREFIX: &str = "sample-site-name-";

    #[test]
    fn test_site_name_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let name = site_name(PREFIX, &mut rng);
            let suffix = parse_suffix(PREFIX, &name).expect("suffix");
            assert!(suffix < SUFFIX_BOUND);
        }
    }

    #[test]
    fn test_same_seed_same_name() {
        let a = site_name(PREFIX, &mut StdRng::seed_from_u64(42));
        let b = site_name(PREFIX, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_works_through_dyn_rng() {
        let mut rng = StdRng::seed_from_u64(1);
        let dyn_rng: &mut dyn rand::RngCore = &mut rng;
        let name = site_name(PREFIX, dyn_rng);
        assert!(name.starts_with(PREFIX));
    }

    #[test]
    fn test_parse_suffix_rejects_garbage() {
        assert_eq!(parse_suffix(PREFIX, "sample-site-name-42"), Some(42));
        assert_eq!(parse_suffix(PREFIX, "sample-site-name-"), None);
        assert_eq!(parse_suffix(PREFIX, "sample-site-name-4x2"), None);
        assert_eq!(parse_suffix(PREFIX, "sample-site-name-1000000"), None);
        assert_eq!(parse_suffix(PREFIX, "other-42"), None);
    }
}
