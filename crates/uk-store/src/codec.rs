use thiserror::Error;
use uk_types::Record;

/// Magic bytes opening every record file.
pub const MAGIC: [u8; 4] = *b"UKR1";

/// Header size: 4 bytes magic + 4 bytes length + 4 bytes CRC.
pub const HEADER_SIZE: usize = 12;

/// Reasons a byte stream is not a valid record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("too short: have {have} bytes, need at least 12")]
    TooShort { have: usize },

    #[error("bad magic {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("length mismatch: header says {declared} payload bytes, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    Checksum { expected: u32, computed: u32 },

    #[error("payload too large: {0} bytes")]
    TooLarge(usize),

    #[error("malformed payload: {0}")]
    Payload(String),
}

/// Codec for record files.
///
/// On-disk format:
/// ```text
/// [4 bytes: magic "UKR1"]
/// [4 bytes: payload length (big-endian u32)]
/// [4 bytes: CRC32 of payload (big-endian u32)]
/// [N bytes: payload (bincode-serialized Record)]
/// ```
///
/// The frame must account for every byte in the file; a truncated or
/// extended file fails to decode.
pub struct RecordCodec;

impl RecordCodec {
    /// Encode a record into its framed file form.
    pub fn encode(record: &Record) -> Result<Vec<u8>, CodecError> {
        let payload = bincode::serialize(record).map_err(|e| CodecError::Payload(e.to_string()))?;
        let len = u32::try_from(payload.len()).map_err(|_| CodecError::TooLarge(payload.len()))?;
        let crc = crc32fast::hash(&payload);

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(&crc.to_be_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Decode a framed record.
    pub fn decode(data: &[u8]) -> Result<Record, CodecError> {
        if data.len() < HEADER_SIZE {
            return Err(CodecError::TooShort { have: data.len() });
        }
        let magic = [data[0], data[1], data[2], data[3]];
        if magic != MAGIC {
            return Err(CodecError::BadMagic(magic));
        }
        let declared = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;
        let expected = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);

        let payload = &data[HEADER_SIZE..];
        if payload.len() != declared {
            return Err(CodecError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        let computed = crc32fast::hash(payload);
        if computed != expected {
            return Err(CodecError::Checksum { expected, computed });
        }

        bincode::deserialize(payload).map_err(|e| CodecError::Payload(e.to_string()))
    }
}
