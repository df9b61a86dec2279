#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Error in http transport layer")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
    #[error("Remote user source responded with status {0}")]
    Status(u16),
    #[error("Remote user source returned a malformed body")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Error in sled storage layer")]
    Sled {
        #[from]
        source: sled::Error,
    },
    #[error("Stored value under {0:?} is not valid UTF-8")]
    NotUtf8(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewModelError {
    #[error("View model event loop is no longer running")]
    Stopped,
}
