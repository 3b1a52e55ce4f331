use cotacao::models::LiquidityStatus;
use cotacao::schema::SyntheticVolumeRecord;
use cotacao::volume::{
    liquidity_for, synthesize, FixedRandomSource, RandomSource, SeededRandomSource,
    ThreadRandomSource, HIGH_LIQUIDITY_THRESHOLD, VOLUME_MAX, VOLUME_MIN,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, .. ProptestConfig::default() })]

    #[test]
    fn seeded_volumes_stay_in_range(seed in any::<u64>()) {
        let source = SeededRandomSource::new(seed);
        for _ in 0..64 {
            let record = SyntheticVolumeRecord::from_payload(&synthesize(&source))
                .expect("synthesized volume always validates");
            prop_assert!((VOLUME_MIN..=VOLUME_MAX).contains(&record.volume_24h));
        }
    }

    #[test]
    fn liquidity_matches_threshold(volume in VOLUME_MIN..=VOLUME_MAX) {
        let source = FixedRandomSource::new([volume]);
        let record = SyntheticVolumeRecord::from_payload(&synthesize(&source))
            .expect("synthesized volume always validates");

        prop_assert_eq!(record.volume_24h, volume);
        let expected = if volume > HIGH_LIQUIDITY_THRESHOLD {
            LiquidityStatus::High
        } else {
            LiquidityStatus::Medium
        };
        prop_assert_eq!(record.liquidity_status, expected);
        prop_assert_eq!(liquidity_for(volume), expected);
    }
}

#[test]
fn thread_source_many_samples_in_range() {
    let source = ThreadRandomSource;
    for _ in 0..10_000 {
        let volume = source.draw(VOLUME_MIN..=VOLUME_MAX);
        assert!((VOLUME_MIN..=VOLUME_MAX).contains(&volume), "{volume}");
    }
}

#[test]
fn exact_threshold_is_media() {
    let source = FixedRandomSource::new([HIGH_LIQUIDITY_THRESHOLD]);
    let record = SyntheticVolumeRecord::from_payload(&synthesize(&source)).unwrap();
    assert_eq!(record.liquidity_status, LiquidityStatus::Medium);
    assert_eq!(record.liquidity_status.to_string(), "Média");
}
