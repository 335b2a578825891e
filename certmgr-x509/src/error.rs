use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PEM decode error: {0}")]
    Pem(String),
    #[error("unexpected PEM block type: {0}")]
    UnexpectedBlock(String),
    #[error("X509 parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CertError>;
