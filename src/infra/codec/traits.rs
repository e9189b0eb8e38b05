//! Serialization seams shared by every wire record (CAN header, transmit
//! message, receive frame). Records write into caller buffers so the crate
//! never allocates.

//==================================================================================TO_PAYLOAD
/// Serialize a record into a sequence of bytes.
pub trait ToPayload {
    type Error;

    /// Serialize into `buffer` and return the number of bytes written.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Exact serialized length of this record.
    fn payload_len(&self) -> usize;
}

//==================================================================================FROM_PAYLOAD
/// Deserialize a sequence of bytes into a record.
pub trait FromPayload: Sized {
    type Error;

    fn from_payload(bytes: &[u8]) -> Result<Self, Self::Error>;
}
