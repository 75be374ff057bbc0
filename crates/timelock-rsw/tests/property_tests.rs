use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rug::Integer;
use rug::integer::Order;
use timelock_rsw::{
    CancellationToken, MaskMode, PuzzleRsw, SecretPrimes, SequentialSolver, TimelockConfig,
    TimelockRsw,
};

const PRIME_PAIRS: [(u64, u64); 4] = [
    (61, 53),
    (1009, 1013),
    (65537, 65539),
    (4294967291, 4294967279),
];

fn mode_strategy() -> impl Strategy<Value = MaskMode> {
    prop_oneof![Just(MaskMode::Xor), Just(MaskMode::Add)]
}

fn timelock_for(pair: usize, key: &[u8], base: u64, mode: MaskMode) -> TimelockRsw {
    let (p, q) = PRIME_PAIRS[pair];
    let primes = SecretPrimes::from_primes(Integer::from(p), Integer::from(q)).unwrap();
    TimelockRsw::from_primes(primes, key, base, mode)
}

fn modulus_of(pair: usize) -> Integer {
    let (p, q) = PRIME_PAIRS[pair];
    Integer::from(p) * Integer::from(q)
}

/// Canonical key bytes for some integer below the modulus.
fn key_below(pair: usize, seed: u64) -> Vec<u8> {
    let value = Integer::from(seed) % modulus_of(pair);
    value.to_digits::<u8>(Order::MsfBe)
}

fn coprime(base: u64, pair: usize) -> bool {
    Integer::from(Integer::from(base).gcd_ref(&modulus_of(pair))) == 1
}

proptest! {
    /// Property test: solving a freshly issued puzzle returns the locked key
    #[test]
    fn prop_roundtrip(
        pair in 0usize..PRIME_PAIRS.len(),
        key_seed in any::<u64>(),
        base in 2u64..1000,
        duration in 0u64..2000,
        mode in mode_strategy()
    ) {
        prop_assume!(coprime(base, pair));
        let key = key_below(pair, key_seed);

        let mut timelock = timelock_for(pair, &key, base, mode);
        let (puzzle, answer) = timelock.setup(duration).unwrap();

        prop_assert_eq!(&answer, &key);
        prop_assert_eq!(puzzle.solve().unwrap(), key);
    }

    /// Property test: the trapdoor shortcut and literal squaring agree
    #[test]
    fn prop_fast_path_matches_slow_path(
        pair in 0usize..PRIME_PAIRS.len(),
        base in 2u64..100000,
        duration in 0u64..3000
    ) {
        prop_assume!(coprime(base, pair));

        let mut timelock = timelock_for(pair, &[], base, MaskMode::Xor);
        timelock.set_duration(duration);
        let fast = timelock.trapdoor().locked_value().unwrap();

        let (puzzle, _) = timelock.setup(duration).unwrap();
        let slow = SequentialSolver::new(&puzzle)
            .square(&CancellationToken::new())
            .unwrap();

        prop_assert_eq!(fast, slow.value);
        prop_assert_eq!(slow.steps, duration);
    }

    /// Property test: work grows linearly with duration
    #[test]
    fn prop_step_count_doubles(
        pair in 0usize..PRIME_PAIRS.len(),
        duration in 0u64..1500
    ) {
        let token = CancellationToken::new();
        let short = PuzzleRsw::new(modulus_of(pair), Integer::from(2), duration, Integer::new(), MaskMode::Xor);
        let long = PuzzleRsw::new(modulus_of(pair), Integer::from(2), duration * 2, Integer::new(), MaskMode::Xor);

        let short_steps = SequentialSolver::new(&short).square(&token).unwrap().steps;
        let long_steps = SequentialSolver::new(&long).square(&token).unwrap().steps;

        prop_assert_eq!(short_steps, duration);
        prop_assert_eq!(long_steps, 2 * short_steps);
    }

    /// Property test: the wire record preserves every public field
    #[test]
    fn prop_record_roundtrip(
        pair in 0usize..PRIME_PAIRS.len(),
        key_seed in any::<u64>(),
        duration in any::<u64>(),
        mode in mode_strategy()
    ) {
        let key = key_below(pair, key_seed);
        let mut timelock = timelock_for(pair, &key, 2, mode);
        let (puzzle, _) = timelock.setup(duration).unwrap();

        let decoded = PuzzleRsw::from_bytes(&puzzle.to_bytes()).unwrap();
        prop_assert_eq!(decoded, puzzle);
    }

    /// Property test: keys at or above the modulus never produce a puzzle
    #[test]
    fn prop_oversized_key_rejected(
        pair in 0usize..PRIME_PAIRS.len(),
        excess in 0u64..1000000,
        mode in mode_strategy()
    ) {
        let key_value = modulus_of(pair) + excess;
        let key = key_value.to_digits::<u8>(Order::MsfBe);

        let mut timelock = timelock_for(pair, &key, 2, mode);
        prop_assert!(timelock.setup(5).is_err());
        prop_assert_eq!(timelock.issued(), 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property test: generated moduli have the requested size and round-trip
    #[test]
    fn prop_generated_modulus_roundtrip(
        seed in any::<u64>(),
        duration in 0u64..300,
        key in prop::collection::vec(1u8..=255, 1..=7),
        mode in mode_strategy()
    ) {
        let config = TimelockConfig {
            modulus_bits: 64,
            min_modulus_bits: 64,
            mask_mode: mode,
            ..TimelockConfig::get_default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut timelock = TimelockRsw::with_config_and_rng(&key, 2, &config, &mut rng).unwrap();

        prop_assert_eq!(timelock.modulus().unwrap().significant_bits(), 64);

        let (puzzle, answer) = timelock.setup(duration).unwrap();
        prop_assert_eq!(&answer, &key);
        prop_assert_eq!(puzzle.solve().unwrap(), key);
    }
}
