//! Program dump image codec.
//!
//! On the wire an image is `F0`, 432 payload bytes, `F7`. The payload starts
//! with an 8 byte header (manufacturer id, product, opcode and three
//! location bytes); the remaining 424 bytes form a 7-bit-per-byte stream
//! holding every parameter at its catalog field.

use arrayref::array_ref;
use log::*;
use crate::catalog::ParameterCatalog;
use crate::error::FormatError;
use crate::util::*;

pub const SYSEX_START: u8 = 0xf0;
pub const SYSEX_END: u8 = 0xf7;

pub const MESSAGE_SIZE: usize = 434;
pub const PAYLOAD_SIZE: usize = 432;
pub const HEADER_SIZE: usize = 8;
pub const DATA_SIZE: usize = PAYLOAD_SIZE - HEADER_SIZE;
pub const DATA_BITS: usize = DATA_SIZE * 7;

pub const MANUFACTURER_ID: [u8; 3] = [0x00, 0x00, 0x0e];
pub const PROGRAM_DATA: u8 = 0x41;

pub struct SysexCodec {
    product: u8,
    /// Payload of the last decoded image. Location bytes and bits not
    /// covered by any field are carried into the next encode as-is.
    carried: Box<[u8]>,
}

impl SysexCodec {
    pub fn new(product: u8) -> Self {
        let mut carried = vec![0u8; PAYLOAD_SIZE].into_boxed_slice();
        carried[0 .. 3].copy_from_slice(&MANUFACTURER_ID);
        carried[3] = product;
        carried[4] = PROGRAM_DATA;

        SysexCodec { product, carried }
    }

    fn validate(&self, payload: &[u8]) -> Result<(), FormatError> {
        if payload.len() != PAYLOAD_SIZE {
            return Err(FormatError::BadLength { expected: PAYLOAD_SIZE, actual: payload.len() });
        }
        if array_ref!(payload, 0, 3) != &MANUFACTURER_ID {
            return Err(FormatError::BadFraming("unknown manufacturer id"));
        }
        if payload[3] != self.product {
            return Err(FormatError::BadFraming("unknown product"));
        }
        if payload[4] != PROGRAM_DATA {
            return Err(FormatError::BadFraming("not a program dump"));
        }
        if payload.iter().any(|b| b & 0x80 != 0) {
            return Err(FormatError::BadFraming("data byte with high bit set"));
        }
        Ok(())
    }

    /// Decode a 432-byte payload into the catalog. Nothing is written
    /// unless the whole payload is valid.
    pub fn decode(&mut self, catalog: &mut ParameterCatalog, payload: &[u8]) -> Result<(), FormatError> {
        self.validate(payload)?;

        let data = &payload[HEADER_SIZE ..];
        for slot in 0 .. catalog.len() {
            let field = catalog.field(slot);
            let raw = read_bits(data, field.offset, field.width);
            let value = if field.signed { sign_extend(raw, field.width) } else { raw as i32 };
            let stored = catalog.set(slot, value);
            if stored != value {
                debug!("image value {} for {:?} clamped to {}",
                       value, catalog.definition(slot).name, stored);
            }
        }
        self.carried.copy_from_slice(payload);

        Ok(())
    }

    /// Decode a complete `F0 .. F7` message.
    pub fn decode_message(&mut self, catalog: &mut ParameterCatalog, bytes: &[u8]) -> Result<(), FormatError> {
        if bytes.len() != MESSAGE_SIZE {
            return Err(FormatError::BadLength { expected: MESSAGE_SIZE, actual: bytes.len() });
        }
        if bytes[0] != SYSEX_START || bytes[MESSAGE_SIZE - 1] != SYSEX_END {
            return Err(FormatError::BadFraming("missing sysex start/end"));
        }
        self.decode(catalog, &bytes[1 .. MESSAGE_SIZE - 1])
    }

    /// Encode current catalog values into a fresh 432-byte payload.
    pub fn encode(&self, catalog: &ParameterCatalog) -> Vec<u8> {
        let mut payload = self.carried.to_vec();
        let data = &mut payload[HEADER_SIZE ..];
        for slot in 0 .. catalog.len() {
            let field = catalog.field(slot);
            let raw = truncate(catalog.get(slot), field.width);
            write_bits(data, field.offset, field.width, raw);
        }
        payload
    }

    /// Encode current catalog values into a complete `F0 .. F7` message.
    pub fn encode_message(&self, catalog: &ParameterCatalog) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(MESSAGE_SIZE);
        bytes.push(SYSEX_START);
        bytes.extend(self.encode(catalog));
        bytes.push(SYSEX_END);
        bytes
    }
}
