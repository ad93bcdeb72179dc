use bc_core::{BinaryRecord, Enigma, EnigmaError, SaveCursor, Stage};

fn sample_stage(id: i32) -> Stage {
    Stage {
        level: 3,
        stage_id: 25000 + id,
        decoding_status: 2,
        start_time: 1_700_000_000.0,
    }
}

fn sample_enigma(stage_count: usize) -> Enigma {
    Enigma {
        energy_since_1: 410,
        energy_since_2: 12,
        enigma_level: 4,
        unknown_1: 7,
        unknown_2: true,
        stages: (0..stage_count).map(|i| sample_stage(i as i32)).collect(),
    }
}

fn encode(enigma: &Enigma) -> Vec<u8> {
    let mut cur = SaveCursor::empty();
    enigma.write(&mut cur).expect("failed to encode enigma");
    cur.into_inner()
}

#[test]
fn enigma_value_round_trip() {
    let enigma = sample_enigma(3);
    let bytes = encode(&enigma);
    let decoded = Enigma::read(&mut SaveCursor::new(bytes)).expect("failed to decode enigma");
    assert_eq!(decoded, enigma);
}

#[test]
fn enigma_byte_round_trip() {
    let bytes = encode(&sample_enigma(2));
    let decoded = Enigma::read(&mut SaveCursor::new(bytes.clone())).unwrap();
    assert_eq!(encode(&decoded), bytes);
}

#[test]
fn zero_stage_count_decodes_to_empty() {
    let bytes = encode(&sample_enigma(0));
    let decoded = Enigma::read(&mut SaveCursor::new(bytes)).unwrap();
    assert!(decoded.stages.is_empty());
}

#[test]
fn truncated_buffer_fails_to_decode() {
    let mut bytes = encode(&sample_enigma(2));
    bytes.truncate(bytes.len() - 4);
    let result = Enigma::read(&mut SaveCursor::new(bytes));
    assert!(result.is_err());
}

#[test]
fn decode_leaves_trailing_bytes_unconsumed() {
    let mut bytes = encode(&sample_enigma(1));
    let expected_len = bytes.len();
    bytes.extend_from_slice(&[0xAA, 0xBB]);
    let mut cur = SaveCursor::new(bytes);
    Enigma::read(&mut cur).unwrap();
    assert_eq!(cur.position(), expected_len);
    assert_eq!(cur.remaining(), 2);
}

#[test]
fn full_capacity_encodes_with_count_byte_255() {
    let enigma = sample_enigma(255);
    let bytes = encode(&enigma);
    // count byte sits after two i32s, two u8s and one bool
    assert_eq!(bytes[11], 255);
    let decoded = Enigma::read(&mut SaveCursor::new(bytes)).unwrap();
    assert_eq!(decoded.stages.len(), 255);
}

#[test]
fn overfull_enigma_refuses_to_encode() {
    let mut enigma = sample_enigma(255);
    enigma.stages.push(sample_stage(999));
    let mut cur = SaveCursor::empty();
    assert!(enigma.write(&mut cur).is_err());
}

#[test]
fn add_stage_rejects_the_256th() {
    let mut enigma = sample_enigma(255);
    let err = enigma.add_stage(sample_stage(999)).unwrap_err();
    assert_eq!(err, EnigmaError::StageCapacity);
    assert_eq!(enigma.stages.len(), 255);
}

#[test]
fn init_is_zero_valued() {
    let enigma = Enigma::init();
    assert_eq!(enigma.energy_since_1, 0);
    assert_eq!(enigma.energy_since_2, 0);
    assert_eq!(enigma.enigma_level, 0);
    assert_eq!(enigma.unknown_1, 0);
    assert!(!enigma.unknown_2);
    assert!(enigma.stages.is_empty());
    assert_eq!(Stage::init().start_time, 0.0);
}

#[test]
fn structural_round_trip() {
    let enigma = sample_enigma(2);
    let value = enigma.serialize();
    assert_eq!(Enigma::deserialize(&value), enigma);
}

#[test]
fn deserialize_defaults_missing_fields() {
    let decoded = Enigma::deserialize(&serde_json::json!({}));
    assert_eq!(decoded, Enigma::init());

    let partial = serde_json::json!({ "enigma_level": 9 });
    let decoded = Enigma::deserialize(&partial);
    assert_eq!(decoded.enigma_level, 9);
    assert!(decoded.stages.is_empty());
}

#[test]
fn deserialize_defaults_out_of_range_numbers() {
    // a value the field cannot hold falls back to zero, never wraps
    let value = serde_json::json!({
        "enigma_level": 300,
        "energy_since_1": 9_000_000_000_i64,
    });
    let decoded = Enigma::deserialize(&value);
    assert_eq!(decoded.enigma_level, 0);
    assert_eq!(decoded.energy_since_1, 0);
}

#[test]
fn stage_name_index_offsets_by_base() {
    let stage = sample_stage(17);
    assert_eq!(stage.name_index(), Some(17));

    let below_base = Stage {
        stage_id: 4,
        ..Stage::init()
    };
    assert_eq!(below_base.name_index(), None);
}
