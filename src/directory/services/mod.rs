//! Application services for the user directory.

mod directory;

pub use directory::{
    DirectoryService, DirectoryServiceError, DirectoryServiceResult, MAX_LEADER_CHAIN_DEPTH,
    RegisterUserRequest,
};
