//! Encryption of product payment URLs.
//!
//! Payment URLs are stored and handed out as opaque tokens: `base64url(nonce || ciphertext)`,
//! AES-256-GCM with a key derived from the configured passphrase via SHA-256.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use url::Url;

use super::{CryptError, CryptResult};

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct PaymentUrlCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for PaymentUrlCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PaymentUrlCipher { .. }")
    }
}

impl PaymentUrlCipher {
    pub fn new(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(digest.as_slice());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    pub fn encrypt(&self, url: &str) -> CryptResult<String> {
        let parsed = Url::parse(url).map_err(|_| CryptError::InvalidPaymentUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CryptError::InvalidPaymentUrl);
        }

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self.cipher.encrypt(&nonce, url.as_bytes())?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(nonce.as_slice());
        out.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    pub fn decrypt(&self, token: &str) -> CryptResult<String> {
        let raw = URL_SAFE_NO_PAD.decode(token.trim())?;
        if raw.len() <= NONCE_LEN {
            return Err(CryptError::MalformedCiphertext);
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)?;
        String::from_utf8(plain).map_err(|_| CryptError::MalformedCiphertext)
    }
}

pub fn encrypt_payment_url(url: &str, passphrase: &str) -> CryptResult<String> {
    PaymentUrlCipher::new(passphrase).encrypt(url)
}

pub fn decrypt_payment_url(token: &str, passphrase: &str) -> CryptResult<String> {
    PaymentUrlCipher::new(passphrase).decrypt(token)
}

#[cfg(test)]
mod test {
    use super::*;

    const URL: &str = "https://pay.example.com/checkout?sku=42&ref=reseller-7";

    #[test]
    fn decrypts_what_it_encrypted() {
        let cipher = PaymentUrlCipher::new("passphrase");
        let token = cipher.encrypt(URL).unwrap();
        assert!(!token.contains("example.com"));
        assert_eq!(cipher.decrypt(&token).unwrap(), URL);
    }

    #[test]
    fn nonce_makes_tokens_unique() {
        let a = encrypt_payment_url(URL, "k").unwrap();
        let b = encrypt_payment_url(URL, "k").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let token = encrypt_payment_url(URL, "right").unwrap();
        assert!(matches!(
            decrypt_payment_url(&token, "wrong"),
            Err(CryptError::AeadError(_))
        ));
    }

    #[test]
    fn tampered_token_fails() {
        let token = encrypt_payment_url(URL, "k").unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(raw);
        assert!(decrypt_payment_url(&tampered, "k").is_err());
    }

    #[test]
    fn short_or_garbage_input_is_malformed() {
        assert!(matches!(
            decrypt_payment_url("AAAA", "k"),
            Err(CryptError::MalformedCiphertext)
        ));
        assert!(matches!(
            decrypt_payment_url("not base64 !!", "k"),
            Err(CryptError::Base64Error(_))
        ));
    }

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(matches!(
            encrypt_payment_url("javascript:alert(1)", "k"),
            Err(CryptError::InvalidPaymentUrl)
        ));
        assert!(matches!(
            encrypt_payment_url("not a url", "k"),
            Err(CryptError::InvalidPaymentUrl)
        ));
    }
}
