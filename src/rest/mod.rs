//! Endpoint wrappers built on the transport in [`crate::clients`].
//!
//! Wrappers build an [`HttpRequest`](crate::clients::HttpRequest) with the
//! right path escaping, media types, redirect policy and async flag, and
//! return typed data through [`ApiResponse`](crate::clients::ApiResponse).
//! Errors are the transport's [`HttpError`](crate::clients::HttpError)
//! unchanged, so callers match on one taxonomy everywhere.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::clients::{HttpClient, HttpError, RedirectPolicy};
//! use github_api::rest::Repositories;
//!
//! let repos = Repositories::new(&client);
//!
//! let branch = repos
//!     .get_branch("rust-lang", "rust", "master", RedirectPolicy::FollowOnce)
//!     .await?;
//!
//! match repos.get_branch_protection("o", "r", "dev").await {
//!     Ok(protection) => println!("{:?}", protection.data()),
//!     Err(HttpError::PreconditionNotMet(_)) => println!("dev is not protected"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod repositories;

pub use repositories::{
    AdminEnforcement, Branch, BranchCommit, Contributor, ContributorStats, GitObject,
    Protection, ProtectionRequest, Reference, Repositories, Repository, RequiredStatusChecks,
    WeeklyStats,
};
