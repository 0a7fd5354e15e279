//! Rendering of a finished submission into the text shown to the user

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use playground_client::ExecutionResult;

use crate::errors::PlaygroundError;

pub const NO_OUTPUT_MESSAGE: &str = "No output generated.";
pub const STDERR_PREFIX: &str = "Error: ";
pub const COMPILE_OUTPUT_PREFIX: &str = "Compilation Error: ";

/// Standard alphabet, padding optional. The service may also wrap long payloads
/// across lines; whitespace is removed before decoding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn decode_field(encoded: &str) -> Result<String, PlaygroundError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| PlaygroundError::Decode(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// stdout as-is, else stderr, else compiler output, else a fixed notice
pub fn render_result(result: &ExecutionResult) -> Result<String, PlaygroundError> {
    if let Some(stdout) = present(&result.stdout) {
        return decode_field(stdout);
    }
    if let Some(stderr) = present(&result.stderr) {
        return Ok(format!("{}{}", STDERR_PREFIX, decode_field(stderr)?));
    }
    if let Some(compile_output) = present(&result.compile_output) {
        return Ok(format!("{}{}", COMPILE_OUTPUT_PREFIX, decode_field(compile_output)?));
    }
    Ok(NO_OUTPUT_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_test_mocks::{encode, finished};

    #[test]
    fn test_stdout_wins() {
        let result = finished(Some("Hello"), Some("ignored"), Some("ignored"));
        assert_eq!(render_result(&result).unwrap(), "Hello");
    }

    #[test]
    fn test_stderr_prefixed() {
        let result = finished(None, Some("boom"), None);
        assert_eq!(render_result(&result).unwrap(), "Error: boom");
    }

    #[test]
    fn test_compile_output_prefixed() {
        let result = finished(None, None, Some("syntax error"));
        assert_eq!(render_result(&result).unwrap(), "Compilation Error: syntax error");
    }

    #[test]
    fn test_no_output() {
        let result = finished(None, None, None);
        assert_eq!(render_result(&result).unwrap(), NO_OUTPUT_MESSAGE);
    }

    #[test]
    fn test_empty_stdout_falls_through() {
        let mut result = finished(None, Some("boom"), None);
        result.stdout = Some(String::new());
        assert_eq!(render_result(&result).unwrap(), "Error: boom");
    }

    #[test]
    fn test_wrapped_and_unpadded_payloads() {
        let long = "a fairly long line of program output that exceeds sixty characters";
        let wrapped: String = encode(long)
            .as_bytes()
            .chunks(60)
            .map(|chunk| format!("{}\n", std::str::from_utf8(chunk).unwrap()))
            .collect();
        assert_eq!(decode_field(&wrapped).unwrap(), long);

        assert_eq!(decode_field("SGk").unwrap(), "Hi");
    }

    #[test]
    fn test_malformed_base64_is_decode_error() {
        let mut result = finished(None, None, None);
        result.stdout = Some("not*base64".to_string());
        assert!(matches!(render_result(&result), Err(PlaygroundError::Decode(_))));
    }

    #[test]
    fn test_multibyte_output() {
        assert_eq!(decode_field(&encode("héllo ✓")).unwrap(), "héllo ✓");
    }
}
