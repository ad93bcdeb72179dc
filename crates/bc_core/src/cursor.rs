use std::io::{self, ErrorKind};

/// Sequential little-endian reader/writer over an owned byte buffer.
///
/// The Battle Cats serializer stores every multi-byte primitive
/// little-endian; reads fail with `UnexpectedEof` rather than padding when
/// the buffer runs out mid-record.
pub struct SaveCursor {
    buf: Vec<u8>,
    pos: usize,
}

impl SaveCursor {
    pub fn new(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    fn take(&mut self, n: usize) -> io::Result<&[u8]> {
        if self.remaining() < n {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "cursor exhausted: need {n} bytes at offset {}, {} left",
                    self.pos,
                    self.remaining()
                ),
            ));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> io::Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(i32::from_le_bytes(bytes))
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_f64(&mut self) -> io::Result<f64> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(f64::from_le_bytes(bytes))
    }

    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    pub fn write_u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    pub fn write_i32(&mut self, value: i32) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }
}
