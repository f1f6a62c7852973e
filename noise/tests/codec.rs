use noise::{DecodeErr, Fingerprint, NoiseRange, NoiseStore, decode_png, encode};
use rand::{SeedableRng, rngs::StdRng};

const MODEL: &str = "anime-v2";

fn drawn_noise(len: usize, seed: u64) -> Vec<f64> {
    let mut store = NoiseStore::new(len, None);
    store.randomize(&mut StdRng::seed_from_u64(seed));
    store.values().to_vec()
}

#[test]
fn png_round_trip_within_tolerance() {
    let range = NoiseRange::default();

    for len in [1, 4, 100, 128, 513] {
        let fingerprint = Fingerprint::new(MODEL, len);
        let values: Vec<f64> = drawn_noise(len, len as u64)
            .into_iter()
            .map(|v| v.clamp(range.min(), range.max()))
            .collect();

        let png = encode(&values, fingerprint, range).unwrap().to_png().unwrap();
        let decoded = decode_png(&png, fingerprint, range).unwrap();

        assert_eq!(decoded.len(), len);
        for (i, (a, b)) in values.iter().zip(&decoded).enumerate() {
            assert!((a - b).abs() <= range.tolerance(), "len {len}, value {i}: {a} vs {b}");
        }
    }
}

#[test]
fn narrow_range_round_trip() {
    let range = NoiseRange::symmetric(1.).unwrap();
    let fingerprint = Fingerprint::new(MODEL, 5);
    let values = [-1., -0.5, 0., 0.5, 1.];

    let png = encode(&values, fingerprint, range).unwrap().to_png().unwrap();
    let decoded = decode_png(&png, fingerprint, range).unwrap();

    for (a, b) in values.iter().zip(&decoded) {
        assert!((a - b).abs() <= range.tolerance());
    }
}

#[test]
fn png_is_deterministic() {
    let range = NoiseRange::default();
    let fingerprint = Fingerprint::new(MODEL, 64);
    let values = drawn_noise(64, 7);

    let a = encode(&values, fingerprint, range).unwrap().to_png().unwrap();
    let b = encode(&values, fingerprint, range).unwrap().to_png().unwrap();
    assert_eq!(a, b);
}

#[test]
fn image_from_another_model() {
    let range = NoiseRange::default();
    let values = drawn_noise(64, 1);

    let png = encode(&values, Fingerprint::new("anime-v1", 64), range)
        .unwrap()
        .to_png()
        .unwrap();

    let err = decode_png(&png, Fingerprint::new(MODEL, 64), range).unwrap_err();
    assert!(matches!(err, DecodeErr::ModelMismatch { .. }));
}

#[test]
fn image_with_another_length() {
    let range = NoiseRange::default();
    let values = drawn_noise(64, 1);

    let png = encode(&values, Fingerprint::new(MODEL, 64), range)
        .unwrap()
        .to_png()
        .unwrap();

    for len in [32, 128] {
        let err = decode_png(&png, Fingerprint::new(MODEL, len), range).unwrap_err();
        assert!(
            matches!(err, DecodeErr::ModelMismatch { .. } | DecodeErr::LengthMismatch { .. }),
            "{err}"
        );
    }
}
