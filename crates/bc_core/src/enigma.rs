use std::io::{self, ErrorKind};

use serde_json::{Value, json};

use crate::cursor::SaveCursor;
use crate::record::{BinaryRecord, field_bool, field_f64, field_i32, field_u8};

/// Offset between a `Stage::stage_id` and its zero-based index into the
/// enigma stage name table.
pub const STAGE_ID_BASE: i32 = 25000;

/// The stage count is length-prefixed by a single byte on the wire.
pub const MAX_STAGES: usize = 255;

/// One in-progress enigma stage decoding attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub level: i32,
    pub stage_id: i32,
    pub decoding_status: u8,
    pub start_time: f64,
}

impl Stage {
    /// Zero-based index into the stage name table, or `None` for ids below
    /// the base offset.
    pub fn name_index(&self) -> Option<u32> {
        let index = self.stage_id - STAGE_ID_BASE;
        u32::try_from(index).ok()
    }
}

impl BinaryRecord for Stage {
    fn init() -> Self {
        Self {
            level: 0,
            stage_id: 0,
            decoding_status: 0,
            start_time: 0.0,
        }
    }

    fn read(cur: &mut SaveCursor) -> io::Result<Self> {
        let level = cur.read_i32()?;
        let stage_id = cur.read_i32()?;
        let decoding_status = cur.read_u8()?;
        let start_time = cur.read_f64()?;
        Ok(Self {
            level,
            stage_id,
            decoding_status,
            start_time,
        })
    }

    fn write(&self, cur: &mut SaveCursor) -> io::Result<()> {
        cur.write_i32(self.level);
        cur.write_i32(self.stage_id);
        cur.write_u8(self.decoding_status);
        cur.write_f64(self.start_time);
        Ok(())
    }

    fn serialize(&self) -> Value {
        json!({
            "level": self.level,
            "stage_id": self.stage_id,
            "decoding_status": self.decoding_status,
            "start_time": self.start_time,
        })
    }

    fn deserialize(value: &Value) -> Self {
        Self {
            level: field_i32(value, "level"),
            stage_id: field_i32(value, "stage_id"),
            decoding_status: field_u8(value, "decoding_status"),
            start_time: field_f64(value, "start_time"),
        }
    }
}

/// Persisted state of the enigma stage feature.
///
/// `unknown_1` and `unknown_2` have no known game semantics; they are
/// carried through decode/encode untouched and never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Enigma {
    pub energy_since_1: i32,
    pub energy_since_2: i32,
    pub enigma_level: u8,
    pub unknown_1: u8,
    pub unknown_2: bool,
    pub stages: Vec<Stage>,
}

impl Enigma {
    /// Append a stage, refusing to grow past what the single count byte can
    /// represent. The game's own serializer would silently wrap the count;
    /// rejecting up front means an unencodable state is never constructed.
    pub fn add_stage(&mut self, stage: Stage) -> Result<(), EnigmaError> {
        if self.stages.len() >= MAX_STAGES {
            return Err(EnigmaError::StageCapacity);
        }
        self.stages.push(stage);
        Ok(())
    }
}

impl BinaryRecord for Enigma {
    fn init() -> Self {
        Self {
            energy_since_1: 0,
            energy_since_2: 0,
            enigma_level: 0,
            unknown_1: 0,
            unknown_2: false,
            stages: Vec::new(),
        }
    }

    fn read(cur: &mut SaveCursor) -> io::Result<Self> {
        let energy_since_1 = cur.read_i32()?;
        let energy_since_2 = cur.read_i32()?;
        let enigma_level = cur.read_u8()?;
        let unknown_1 = cur.read_u8()?;
        let unknown_2 = cur.read_bool()?;
        let count = cur.read_u8()? as usize;
        let mut stages = Vec::with_capacity(count);
        for _ in 0..count {
            stages.push(Stage::read(cur)?);
        }
        Ok(Self {
            energy_since_1,
            energy_since_2,
            enigma_level,
            unknown_1,
            unknown_2,
            stages,
        })
    }

    fn write(&self, cur: &mut SaveCursor) -> io::Result<()> {
        let count = u8::try_from(self.stages.len()).map_err(|_| {
            io::Error::new(
                ErrorKind::InvalidData,
                format!("{} stages exceed the one-byte count limit", self.stages.len()),
            )
        })?;
        cur.write_i32(self.energy_since_1);
        cur.write_i32(self.energy_since_2);
        cur.write_u8(self.enigma_level);
        cur.write_u8(self.unknown_1);
        cur.write_bool(self.unknown_2);
        cur.write_u8(count);
        for stage in &self.stages {
            stage.write(cur)?;
        }
        Ok(())
    }

    fn serialize(&self) -> Value {
        json!({
            "energy_since_1": self.energy_since_1,
            "energy_since_2": self.energy_since_2,
            "enigma_level": self.enigma_level,
            "unknown_1": self.unknown_1,
            "unknown_2": self.unknown_2,
            "stages": self.stages.iter().map(Stage::serialize).collect::<Vec<_>>(),
        })
    }

    fn deserialize(value: &Value) -> Self {
        let stages = value
            .get("stages")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Stage::deserialize).collect())
            .unwrap_or_default();
        Self {
            energy_since_1: field_i32(value, "energy_since_1"),
            energy_since_2: field_i32(value, "energy_since_2"),
            enigma_level: field_u8(value, "enigma_level"),
            unknown_1: field_u8(value, "unknown_1"),
            unknown_2: field_bool(value, "unknown_2"),
            stages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnigmaError {
    StageCapacity,
}

impl std::fmt::Display for EnigmaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StageCapacity => {
                write!(f, "enigma already holds {MAX_STAGES} stages")
            }
        }
    }
}

impl std::error::Error for EnigmaError {}
