use std::io;

use serde_json::Value;

use crate::cursor::SaveCursor;

/// One fixed-layout chunk of the save stream.
///
/// The binary side is a contract with the game's own serializer: `read`
/// consumes primitives in a fully determined order and must fail when the
/// cursor runs dry, and `write` emits the exact inverse sequence so that
/// `write(read(bytes)) == bytes`. The structural side is an internal cache
/// format and is deliberately tolerant: `deserialize` defaults every
/// missing field instead of erroring, so older dumps keep loading as
/// fields are added.
pub trait BinaryRecord: Sized {
    /// Deterministic zero-valued instance, used when no prior state exists.
    fn init() -> Self;

    fn read(cur: &mut SaveCursor) -> io::Result<Self>;

    fn write(&self, cur: &mut SaveCursor) -> io::Result<()>;

    fn serialize(&self) -> Value;

    fn deserialize(value: &Value) -> Self;
}

pub(crate) fn field_i32(value: &Value, key: &str) -> i32 {
    value
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}

pub(crate) fn field_u8(value: &Value, key: &str) -> u8 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .unwrap_or(0)
}

pub(crate) fn field_bool(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn field_f64(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
