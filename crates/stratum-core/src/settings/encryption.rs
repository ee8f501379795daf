//! Encryption of setting values at rest
//!
//! Values are encrypted with AES-256-CBC and PKCS#7 padding under a key
//! derived from a pass phrase with PBKDF2-HMAC-SHA1 (1000 rounds). The IV is
//! fixed, so encryption is deterministic: the same plaintext always yields the
//! same base64 ciphertext.

use aes::Aes256;
use base64::{Engine, engine::general_purpose::STANDARD};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use serde::Deserialize;

use crate::prelude::*;

use super::types::SettingDefinition;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const KEY_DERIVATION_ROUNDS: u32 = 1000;
const IV_LENGTH: usize = 16;

pub const DEFAULT_PASS_PHRASE: &str = "gsKnGZ041HLL4IM8";
pub const DEFAULT_SALT: &str = "hgt!16kl";
pub const DEFAULT_INIT_VECTOR: &str = "jkE49230Tf093b42";

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncryptionConfig {
	pub pass_phrase: Box<str>,
	pub salt: Box<str>,
	/// Must be exactly 16 bytes
	pub init_vector: Box<str>,
}

impl Default for EncryptionConfig {
	fn default() -> Self {
		Self {
			pass_phrase: DEFAULT_PASS_PHRASE.into(),
			salt: DEFAULT_SALT.into(),
			init_vector: DEFAULT_INIT_VECTOR.into(),
		}
	}
}

impl std::fmt::Debug for EncryptionConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EncryptionConfig")
			.field("pass_phrase", &"<redacted>")
			.field("salt", &"<redacted>")
			.field("init_vector", &"<redacted>")
			.finish()
	}
}

/// Encrypts and decrypts values of settings flagged as encrypted
pub struct SettingEncryptionService {
	key: [u8; 32],
	iv: [u8; IV_LENGTH],
}

impl SettingEncryptionService {
	pub fn new(config: &EncryptionConfig) -> StResult<Self> {
		let iv: [u8; IV_LENGTH] = config.init_vector.as_bytes().try_into().map_err(|_| {
			Error::ConfigError(format!("Encryption IV must be {} bytes long", IV_LENGTH))
		})?;
		let key = pbkdf2::pbkdf2_hmac_array::<sha1::Sha1, 32>(
			config.pass_phrase.as_bytes(),
			config.salt.as_bytes(),
			KEY_DERIVATION_ROUNDS,
		);

		Ok(Self { key, iv })
	}

	/// Encrypt a plaintext value. Pass-through for settings that are not encrypted.
	pub fn encrypt(&self, def: &SettingDefinition, plain: &str) -> StResult<String> {
		if !def.is_encrypted {
			return Ok(plain.to_string());
		}

		let cipher = Aes256CbcEnc::new_from_slices(&self.key, &self.iv)
			.map_err(|_| Error::ConfigError("Invalid encryption key".into()))?;
		let encrypted = cipher.encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes());
		Ok(STANDARD.encode(encrypted))
	}

	/// Decrypt a stored value. Pass-through for settings that are not encrypted.
	pub fn decrypt(&self, def: &SettingDefinition, stored: &str) -> StResult<String> {
		if !def.is_encrypted {
			return Ok(stored.to_string());
		}

		let fail = || {
			warn!("Cannot decrypt stored value of setting '{}'", def.name);
			Error::Decryption(def.name.clone())
		};

		let bytes = STANDARD.decode(stored).map_err(|_| fail())?;
		let cipher = Aes256CbcDec::new_from_slices(&self.key, &self.iv)
			.map_err(|_| Error::ConfigError("Invalid encryption key".into()))?;
		let plain = cipher.decrypt_padded_vec_mut::<Pkcs7>(&bytes).map_err(|_| fail())?;
		String::from_utf8(plain).map_err(|_| fail())
	}
}

impl std::fmt::Debug for SettingEncryptionService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingEncryptionService").finish_non_exhaustive()
	}
}


// vim: ts=4
