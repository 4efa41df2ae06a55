use thiserror::Error;

pub type CryptResult<T> = std::result::Result<T, CryptError>;

#[derive(Debug, Error)]
pub enum CryptError {
    #[error("argon2 error: {0}")]
    Argon2Error(#[from] argon2::password_hash::Error),
    #[error("jwt error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error("base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),
    #[error("aes-gcm error: {0}")]
    AeadError(aes_gcm::Error),
    #[error("payment url is not a valid http(s) url")]
    InvalidPaymentUrl,
    #[error("encrypted payment url is malformed")]
    MalformedCiphertext,
}

impl From<aes_gcm::Error> for CryptError {
    fn from(value: aes_gcm::Error) -> Self {
        Self::AeadError(value)
    }
}
