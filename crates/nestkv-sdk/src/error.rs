use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("namespace error: {0}")]
    Namespace(#[from] nestkv_namespace::NamespaceError),

    #[error("codec error: {0}")]
    Codec(#[from] nestkv_codec::CodecError),

    #[error("substrate error: {0}")]
    Substrate(#[from] nestkv_substrate::SubstrateError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
