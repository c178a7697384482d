//! IKNP configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::iknp::code::CODE_BITS;

/// Maximum number of choice bits `l`. Each instance carries `2^l` candidates.
pub const MAX_CHOICE_BITS: usize = 24;
/// Maximum payload width, in bits.
pub const MAX_PAYLOAD_BITS: usize = 64;

const DEFAULT_CODE_KEY_LABEL: &[u8] = b"mpz-ot-core/iknp/code-key";

/// The block cipher key of the correlation-robust code.
///
/// This key is public, but both parties must use the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeKey([u8; 16]);

impl CodeKey {
    /// Creates a new code key.
    pub fn new(key: [u8; 16]) -> Self {
        Self(key)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl Default for CodeKey {
    fn default() -> Self {
        let digest = Sha256::digest(DEFAULT_CODE_KEY_LABEL);
        let mut key = [0u8; 16];
        key.copy_from_slice(&digest[..16]);
        Self(key)
    }
}

/// IKNP configuration, shared by the sender and the receiver.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct IknpConfig {
    /// The number of OT instances, `m`.
    #[builder(default = "256")]
    count: usize,
    /// The width of the extension matrices, `k`.
    #[builder(default = "32")]
    width: usize,
    /// The number of choice bits, `l`.
    #[builder(default = "16")]
    choice_bits: usize,
    /// The payload width. Defaults to the number of choice bits.
    #[builder(default, setter(strip_option))]
    payload_bits: Option<usize>,
    /// The key of the correlation-robust code.
    #[builder(default)]
    code_key: CodeKey,
}

impl IknpConfig {
    /// Creates a new builder for the configuration.
    pub fn builder() -> IknpConfigBuilder {
        IknpConfigBuilder::default()
    }

    /// Creates a builder whose matrix width is `4 * security_bits`.
    ///
    /// The width of the extension matrices must satisfy `3s <= k <= 4s` for `s` bits of security.
    pub fn for_security(security_bits: usize) -> IknpConfigBuilder {
        IknpConfigBuilder::default()
            .width(4 * security_bits)
            .to_owned()
    }

    /// Returns the number of OT instances, `m`.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the width of the extension matrices, `k`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of choice bits, `l`.
    pub fn choice_bits(&self) -> usize {
        self.choice_bits
    }

    /// Returns the number of candidates per instance, `2^l`.
    pub fn candidates(&self) -> usize {
        1 << self.choice_bits
    }

    /// Returns the payload width.
    pub fn payload_bits(&self) -> usize {
        self.payload_bits.unwrap_or(self.choice_bits)
    }

    /// Returns the key of the correlation-robust code.
    pub fn code_key(&self) -> &CodeKey {
        &self.code_key
    }
}

impl IknpConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.count == Some(0) {
            return Err("count must be positive".to_string());
        }

        if let Some(width) = self.width {
            if width == 0 || width > CODE_BITS {
                return Err(format!("width must be in 1..={CODE_BITS}, got {width}"));
            }
        }

        if let Some(choice_bits) = self.choice_bits {
            if choice_bits == 0 || choice_bits > MAX_CHOICE_BITS {
                return Err(format!(
                    "choice bits must be in 1..={MAX_CHOICE_BITS}, got {choice_bits}"
                ));
            }
        }

        if let Some(Some(payload_bits)) = self.payload_bits {
            if payload_bits == 0 || payload_bits > MAX_PAYLOAD_BITS {
                return Err(format!(
                    "payload bits must be in 1..={MAX_PAYLOAD_BITS}, got {payload_bits}"
                ));
            }
        }

        Ok(())
    }
}

impl Default for IknpConfig {
    fn default() -> Self {
        IknpConfigBuilder::default()
            .build()
            .expect("default config is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IknpConfig::default();

        assert_eq!(config.count(), 256);
        assert_eq!(config.width(), 32);
        assert_eq!(config.choice_bits(), 16);
        assert_eq!(config.candidates(), 1 << 16);
        assert_eq!(config.payload_bits(), 16);
        assert_eq!(config.code_key(), &CodeKey::default());
    }

    #[test]
    fn test_payload_bits_override() {
        let config = IknpConfig::builder()
            .choice_bits(2)
            .payload_bits(8)
            .build()
            .unwrap();

        assert_eq!(config.candidates(), 4);
        assert_eq!(config.payload_bits(), 8);
    }

    #[test]
    fn test_for_security() {
        let config = IknpConfig::for_security(8).build().unwrap();
        assert_eq!(config.width(), 32);

        assert!(IknpConfig::for_security(129).build().is_err());
    }

    #[test]
    fn test_invalid_config() {
        assert!(IknpConfig::builder().count(0).build().is_err());
        assert!(IknpConfig::builder().width(0).build().is_err());
        assert!(IknpConfig::builder().width(513).build().is_err());
        assert!(IknpConfig::builder().choice_bits(0).build().is_err());
        assert!(IknpConfig::builder().choice_bits(25).build().is_err());
        assert!(IknpConfig::builder().payload_bits(65).build().is_err());
    }

    #[test]
    fn test_code_key_is_fixed() {
        assert_eq!(CodeKey::default(), CodeKey::default());
        assert_ne!(CodeKey::default(), CodeKey::new([0u8; 16]));
    }
}
