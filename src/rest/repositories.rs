//! Repository, branch and git reference endpoints.
//!
//! A small set of endpoints that each exercise one transport behavior:
//!
//! - [`Repositories::get_branch`]: renamed branches answer `301`
//! - [`Repositories::get_ref`]: multi-segment reference names
//! - [`Repositories::get_branch_protection`] and
//!   [`Repositories::update_branch_protection`]: the "Branch not protected"
//!   condition
//! - [`Repositories::list_org_repos`]: offset pagination
//! - [`Repositories::list_contributor_stats`]: `202 Accepted` while GitHub
//!   computes statistics

use serde::{Deserialize, Serialize};

use crate::clients::{
    escape_path_segment, escape_path_segments, ApiResponse, HttpClient, HttpError, HttpMethod,
    HttpRequest, ListOptions, RedirectPolicy,
};

/// Preview media type for branch protection review settings.
const PROTECTION_PREVIEW: &str = "application/vnd.github.luke-cage-preview+json";

/// A branch.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Head commit.
    #[serde(default)]
    pub commit: Option<BranchCommit>,
    /// Whether branch protection is enabled.
    #[serde(default)]
    pub protected: bool,
}

/// The head commit of a branch.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BranchCommit {
    /// Commit SHA.
    pub sha: String,
    /// API URL of the commit.
    #[serde(default)]
    pub url: Option<String>,
}

/// A git reference such as `refs/heads/main`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Reference {
    /// Fully qualified name, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub name: String,
    /// GraphQL node ID.
    #[serde(default)]
    pub node_id: Option<String>,
    /// API URL of the reference.
    #[serde(default)]
    pub url: Option<String>,
    /// The object the reference points at.
    pub object: GitObject,
}

/// The target of a git reference.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GitObject {
    /// Object type: `commit`, `tag`, `tree` or `blob`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Object SHA.
    pub sha: String,
    /// API URL of the object.
    #[serde(default)]
    pub url: Option<String>,
}

/// Branch protection settings as returned by GitHub.
///
/// Review and restriction settings vary a lot between plans and are kept as
/// raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Protection {
    /// API URL of the protection.
    #[serde(default)]
    pub url: Option<String>,
    /// Required status checks.
    #[serde(default)]
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// Whether the rules apply to administrators.
    #[serde(default)]
    pub enforce_admins: Option<AdminEnforcement>,
    /// Pull request review requirements.
    #[serde(default)]
    pub required_pull_request_reviews: Option<serde_json::Value>,
    /// Push restrictions.
    #[serde(default)]
    pub restrictions: Option<serde_json::Value>,
}

/// Status checks that must pass before merging.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RequiredStatusChecks {
    /// Require branches to be up to date before merging.
    pub strict: bool,
    /// Names of the required checks.
    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Whether protection applies to administrators.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AdminEnforcement {
    /// API URL of the setting.
    #[serde(default)]
    pub url: Option<String>,
    /// Whether enforcement is on.
    pub enabled: bool,
}

/// Body of a branch protection update.
///
/// GitHub requires all four keys; `None` is sent as `null` to disable a rule.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct ProtectionRequest {
    /// Required status checks, or `None` to disable.
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// Apply the rules to administrators.
    pub enforce_admins: bool,
    /// Pull request review requirements, or `None` to disable.
    pub required_pull_request_reviews: Option<serde_json::Value>,
    /// Push restrictions, or `None` to disable.
    pub restrictions: Option<serde_json::Value>,
}

/// A repository.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Repository {
    /// Repository ID.
    pub id: u64,
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default branch name.
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Commit activity of one contributor.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContributorStats {
    /// The contributor; `None` for commits without a linked account.
    #[serde(default)]
    pub author: Option<Contributor>,
    /// Total commits.
    pub total: u64,
    /// Weekly breakdown.
    #[serde(default)]
    pub weeks: Vec<WeeklyStats>,
}

/// A contributor account.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Contributor {
    /// Login name.
    pub login: String,
    /// Account ID.
    pub id: u64,
}

/// Additions, deletions and commits for one week.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WeeklyStats {
    /// Start of the week, in epoch seconds.
    pub w: i64,
    /// Lines added.
    pub a: u64,
    /// Lines deleted.
    pub d: u64,
    /// Commits.
    pub c: u64,
}

/// Repository endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Repositories<'a> {
    client: &'a HttpClient,
}

impl<'a> Repositories<'a> {
    /// Creates a wrapper around `client`.
    #[must_use]
    pub const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Gets a branch.
    ///
    /// GitHub answers `301` for a branch that was renamed. With
    /// [`RedirectPolicy::FollowOnce`] the new location is fetched; with
    /// [`RedirectPolicy::NoRedirect`] the call fails with
    /// [`HttpError::Redirect`] carrying the new location.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on any transport or API failure.
    pub async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        redirect_policy: RedirectPolicy,
    ) -> Result<ApiResponse<Branch>, HttpError> {
        let path = format!(
            "repos/{}/{}/branches/{}",
            escape_path_segment(owner)?,
            escape_path_segment(repo)?,
            escape_path_segment(branch)?
        );
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .redirect_policy(redirect_policy)
            .build()?;
        self.client.execute(request).await
    }

    /// Gets a git reference.
    ///
    /// `reference` may be given with or without the `refs/` prefix; its
    /// segments are escaped individually so `heads/feature/x` stays a
    /// multi-segment path. Redirects are never followed.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on any transport or API failure.
    pub async fn get_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<ApiResponse<Reference>, HttpError> {
        let reference = reference.strip_prefix("refs/").unwrap_or(reference);
        let path = format!(
            "repos/{}/{}/git/ref/{}",
            escape_path_segment(owner)?,
            escape_path_segment(repo)?,
            escape_path_segments(reference)?
        );
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .redirect_policy(RedirectPolicy::NoRedirect)
            .build()?;
        self.client.execute(request).await
    }

    /// Gets the protection settings of a branch.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::PreconditionNotMet`] with
    /// [`PreconditionKind::BranchNotProtected`](crate::clients::PreconditionKind::BranchNotProtected)
    /// if the branch has no protection, or another [`HttpError`] on failure.
    pub async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ApiResponse<Protection>, HttpError> {
        let request = HttpRequest::builder(
            HttpMethod::Get,
            Self::protection_path(owner, repo, branch)?,
        )
        .media_type(PROTECTION_PREVIEW)
        .build()?;
        self.client.execute(request).await
    }

    /// Replaces the protection settings of a branch.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::PreconditionNotMet`] when GitHub reports the
    /// branch as not protected, or another [`HttpError`] on failure.
    pub async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        protection: &ProtectionRequest,
    ) -> Result<ApiResponse<Protection>, HttpError> {
        let request = HttpRequest::builder(
            HttpMethod::Put,
            Self::protection_path(owner, repo, branch)?,
        )
        .media_type(PROTECTION_PREVIEW)
        .json(protection)
        .build()?;
        self.client.execute(request).await
    }

    /// Lists repositories of an organization, one page at a time.
    ///
    /// Use [`ApiResponse::next_page`] to request the following page.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on any transport or API failure.
    pub async fn list_org_repos(
        &self,
        org: &str,
        options: &ListOptions,
    ) -> Result<ApiResponse<Vec<Repository>>, HttpError> {
        let path = format!("orgs/{}/repos", escape_path_segment(org)?);
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query_options(options)
            .build()?;
        self.client.execute(request).await
    }

    /// Lists commit activity per contributor.
    ///
    /// GitHub computes these statistics in the background. While it does,
    /// the call fails with [`HttpError::Accepted`]; repeat it later.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Accepted`] while statistics are being computed,
    /// or another [`HttpError`] on failure.
    pub async fn list_contributor_stats(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<ApiResponse<Vec<ContributorStats>>, HttpError> {
        let path = format!(
            "repos/{}/{}/stats/contributors",
            escape_path_segment(owner)?,
            escape_path_segment(repo)?
        );
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .async_accepted(true)
            .build()?;
        self.client.execute(request).await
    }

    fn protection_path(owner: &str, repo: &str, branch: &str) -> Result<String, HttpError> {
        Ok(format!(
            "repos/{}/{}/branches/{}/protection",
            escape_path_segment(owner)?,
            escape_path_segment(repo)?,
            escape_path_segment(branch)?
        ))
    }
}
