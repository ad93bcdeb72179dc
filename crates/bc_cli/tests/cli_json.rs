use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use bc_core::{BinaryRecord, Enigma, SaveCursor, Stage};
use serde_json::Value;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_bc-se"))
        .args(args)
        .output()
        .expect("failed to run bc-se CLI")
}

fn temp_chunk_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.bin", std::process::id(), nanos))
}

fn write_sample_chunk(path: &PathBuf) {
    let enigma = Enigma {
        energy_since_1: 100,
        energy_since_2: 0,
        enigma_level: 5,
        unknown_1: 1,
        unknown_2: false,
        stages: vec![Stage {
            level: 3,
            stage_id: 25004,
            decoding_status: 2,
            start_time: 1_700_000_000.0,
        }],
    };
    let mut cur = SaveCursor::empty();
    enigma.write(&mut cur).expect("failed to encode fixture");
    fs::write(path, cur.into_inner()).expect("failed to write fixture");
}

#[test]
fn json_dump_includes_expected_fields() {
    let path = temp_chunk_path("bc_se_json");
    write_sample_chunk(&path);

    let output = run_cli(&["--json", &path.to_string_lossy()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["energy_since_1"], 100);
    assert_eq!(json["enigma_level"], 5);
    assert_eq!(json["stages"][0]["stage_id"], 25004);

    let _ = fs::remove_file(&path);
}

#[test]
fn unreadable_chunk_exits_nonzero() {
    let output = run_cli(&["--json", "/nonexistent/enigma.bin"]);
    assert!(!output.status.success());
}

#[test]
fn truncated_chunk_is_a_decode_error() {
    let path = temp_chunk_path("bc_se_trunc");
    write_sample_chunk(&path);
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let output = run_cli(&["--json", &path.to_string_lossy()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error decoding"));

    let _ = fs::remove_file(&path);
}
