//! # Encoding Module
//!
//! Turns the raw bytes of one serial line into the reading text.

use log::error;

use crate::error::{Result, SerialOllamaError};

/// Decodes one serial line as UTF-8 and strips surrounding whitespace.
///
/// The line terminator (`\n` or `\r\n`) counts as whitespace. No other
/// transformation is applied.
///
/// # Examples
///
/// ```
/// use serial_ollama::serial::encoding::decode_line;
///
/// assert_eq!(decode_line(b" 23.5\r\n").unwrap(), "23.5");
/// assert!(decode_line(&[0xFF, 0xFE, b'\n']).is_err());
/// ```
pub fn decode_line(source_data: &[u8]) -> Result<String> {
    match std::str::from_utf8(source_data) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(err) => {
            let valid = err.valid_up_to();
            let bad_end = err
                .error_len()
                .map_or(source_data.len(), |len| valid + len);
            let bad = hex::encode(&source_data[valid..bad_end]);
            error!("Serial line is not valid UTF-8 at byte {valid}: 0x{bad}");
            Err(SerialOllamaError::encoding(format!(
                "invalid UTF-8 at byte {valid} (0x{bad}) in serial line 0x{}",
                hex::encode(source_data)
            )))
        }
    }
}
