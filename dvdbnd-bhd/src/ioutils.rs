//! Internal stream helpers.

use std::io::{Seek, SeekFrom};

use crate::Result;

/// Marker for streams the index reader can both read and seek.
pub trait ReadSeek: std::io::Read + Seek {}

impl<T: std::io::Read + Seek> ReadSeek for T {}

/// Run `f` with the cursor moved to `offset`, restoring the original
/// position on every exit path.
///
/// The bucket directory and its side records interleave in one stream, so
/// every nested read must leave the caller's cursor where it found it.
pub fn with_position<R, T, F>(reader: &mut R, offset: u64, f: F) -> Result<T>
where
    R: ReadSeek + ?Sized,
    F: FnOnce(&mut R) -> Result<T>,
{
    let saved = reader.stream_position()?;
    reader.seek(SeekFrom::Start(offset))?;

    let result = f(reader);
    let restored = reader.seek(SeekFrom::Start(saved));

    match (result, restored) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e.into()),
        (Ok(value), Ok(_)) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BhdError;
    use std::io::{Cursor, Read};

    #[test]
    fn test_position_restored_on_success() {
        let mut cursor = Cursor::new(vec![0u8, 1, 2, 3, 4, 5, 6, 7]);
        cursor.set_position(2);

        let byte = with_position(&mut cursor, 6, |r| {
            let mut b = [0u8; 1];
            r.read_exact(&mut b)?;
            Ok(b[0])
        })
        .unwrap();

        assert_eq!(byte, 6);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_position_restored_on_error() {
        let mut cursor = Cursor::new(vec![0u8; 8]);
        cursor.set_position(3);

        let result: Result<()> =
            with_position(&mut cursor, 5, |_| Err(BhdError::UnsupportedVersion(9)));

        assert!(result.is_err());
        assert_eq!(cursor.position(), 3);
    }
}
