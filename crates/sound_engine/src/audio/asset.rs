//! Audio asset types
//!
//! An [`AudioAsset`] keeps the encoded file bytes; backends decode them when
//! they build a native resource.

use std::path::Path;

use super::AudioError;

/// Encoded audio file held in memory
///
/// Supports WAV, OGG, MP3, and FLAC formats.
#[derive(Clone)]
pub struct AudioAsset {
    /// Raw audio file data (encoded format)
    data: Vec<u8>,
    format: AudioFormat,
}

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
    /// Unknown format
    Unknown,
}

impl AudioAsset {
    /// Create a new audio asset from raw bytes and a known format
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Validate raw file bytes and sniff their format
    ///
    /// # Errors
    /// `InvalidData` for empty input or unrecognised magic bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::InvalidData("Empty audio file".to_string()));
        }

        let format = Self::detect_format(bytes);
        if format == AudioFormat::Unknown {
            return Err(AudioError::InvalidData("Unknown audio format".to_string()));
        }

        // Decoding is left to the backend
        Ok(Self::new(bytes.to_vec(), format))
    }

    /// Read and validate an audio file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`AudioAsset::from_bytes`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Detected file format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Detect audio format from magic bytes
    fn detect_format(bytes: &[u8]) -> AudioFormat {
        if bytes.len() < 4 {
            return AudioFormat::Unknown;
        }

        match &bytes[0..4] {
            b"RIFF" => AudioFormat::Wav,
            b"OggS" => AudioFormat::Ogg,
            b"fLaC" => AudioFormat::Flac,
            // MP3 can start with ID3 tag or frame sync
            [0xFF, 0xFB | 0xFA | 0xF3 | 0xF2, _, _] | [b'I', b'D', b'3', _] => AudioFormat::Mp3,
            _ => AudioFormat::Unknown,
        }
    }
}

impl std::fmt::Debug for AudioAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAsset")
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        // WAV format
        let wav_bytes = b"RIFF....WAVE";
        assert_eq!(AudioAsset::detect_format(wav_bytes), AudioFormat::Wav);

        // OGG format
        let ogg_bytes = b"OggS....";
        assert_eq!(AudioAsset::detect_format(ogg_bytes), AudioFormat::Ogg);

        // FLAC format
        let flac_bytes = b"fLaC....";
        assert_eq!(AudioAsset::detect_format(flac_bytes), AudioFormat::Flac);

        // MP3 with ID3 tag and bare frame sync
        assert_eq!(AudioAsset::detect_format(b"ID3\x04...."), AudioFormat::Mp3);
        assert_eq!(AudioAsset::detect_format(&[0xFF, 0xFB, 0x90, 0x00]), AudioFormat::Mp3);

        // Unknown format
        let unknown = b"ABCD";
        assert_eq!(AudioAsset::detect_format(unknown), AudioFormat::Unknown);
        assert_eq!(AudioAsset::detect_format(b"RI"), AudioFormat::Unknown);
    }

    #[test]
    fn test_empty_data_fails() {
        let result = AudioAsset::from_bytes(&[]);
        assert!(matches!(result, Err(AudioError::InvalidData(_))));
    }

    #[test]
    fn test_unknown_data_fails() {
        let result = AudioAsset::from_bytes(b"not audio");
        assert!(matches!(result, Err(AudioError::InvalidData(_))));
    }

    #[test]
    fn test_from_bytes_keeps_data() {
        let asset = AudioAsset::from_bytes(b"OggS rest of stream").unwrap();
        assert_eq!(asset.format(), AudioFormat::Ogg);
        assert_eq!(asset.data(), b"OggS rest of stream");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AudioAsset::from_file("definitely/not/here.wav");
        assert!(matches!(result, Err(AudioError::Io(_))));
    }
}
