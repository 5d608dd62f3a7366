use jio_hashes::HasherBase;

pub mod header;
pub mod tx;

/// Little-endian field writers shared by every consensus hashing routine.
pub trait HasherExtensions {
    fn write_bool(&mut self, element: bool) -> &mut Self;

    fn write_u8(&mut self, element: u8) -> &mut Self;

    fn write_u16(&mut self, element: u16) -> &mut Self;

    fn write_u32(&mut self, element: u32) -> &mut Self;

    fn write_u64(&mut self, element: u64) -> &mut Self;

    /// Writes a collection length as a u64
    fn write_len(&mut self, len: usize) -> &mut Self;

    /// Writes the length of `bytes` followed by `bytes` itself
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self;
}

impl<T: HasherBase> HasherExtensions for T {
    #[inline(always)]
    fn write_bool(&mut self, element: bool) -> &mut Self {
        self.update(if element { [1u8] } else { [0u8] })
    }

    #[inline(always)]
    fn write_u8(&mut self, element: u8) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_u16(&mut self, element: u16) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_u32(&mut self, element: u32) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_u64(&mut self, element: u64) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_len(&mut self, len: usize) -> &mut Self {
        self.write_u64(len as u64)
    }

    #[inline(always)]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_len(bytes.len()).update(bytes)
    }
}
