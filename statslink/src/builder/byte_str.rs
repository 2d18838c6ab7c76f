use std::fmt;

/// A fixed size byte string buffer.
///
/// A write that doesn't fit is rejected with `fmt::Error`. Nothing is
/// ever truncated.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteStr<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> ByteStr<N> {
    pub fn new() -> Self {
        ByteStr { bytes: [0; N], len: 0 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str` values are ever copied in, so this can't fail.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn try_extend(&mut self, s: &str) -> Result<(), fmt::Error> {
        let bytes = s.as_bytes();
        let end = self.len + bytes.len();
        if end > N {
            return Err(fmt::Error);
        }

        self.bytes[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<const N: usize> fmt::Write for ByteStr<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_extend(s)
    }
}
