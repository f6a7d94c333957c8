use thiserror::Error;
use voyage_directory::DirectoryError;

#[derive(Error, Debug)]
pub enum FetchError {
    /// A newer fetch superseded this one. Not a failure.
    #[error("Fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
