use std::path::{Path, PathBuf};

use anyhow::Context;
use tally_config::TallyConfig;
use tally_core::auth::{AllowlistAuthorizer, Authorizer};
use tally_db::service::ReviewService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: ReviewService,
    pub config: TallyConfig,
    pub authorizer: AllowlistAuthorizer,
}

impl AppContext {
    /// Load configuration for `project_root` and open the review database.
    ///
    /// A configured remote replica that fails to open falls back to the
    /// local database with a warning.
    pub async fn init(project_root: &Path, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let config = TallyConfig::load_for_project(project_root)
            .context("failed to load tally configuration")?;

        let db_path = resolve_db_path(project_root, &config.database.path);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let db_path_str = db_path.to_string_lossy();

        let service = if config.database.is_remote_configured() {
            match ReviewService::new_remote_replica(
                &db_path_str,
                &config.database.url,
                &config.database.auth_token,
            )
            .await
            {
                Ok(service) => service,
                Err(error) => {
                    tracing::warn!(%error, "failed to open remote replica; falling back to local");
                    ReviewService::new_local(&db_path_str)
                        .await
                        .context("failed to open review database")?
                }
            }
        } else {
            ReviewService::new_local(&db_path_str)
                .await
                .context("failed to open review database")?
        };

        let mut policy = config.review.quorum_policy();
        if let Some(threshold) = flags.threshold {
            policy.threshold = threshold;
        }
        let service = service
            .with_policy(policy)
            .with_triage_limit(usize::try_from(config.review.triage_limit)?);
        let authorizer = config.review.authorizer();

        Ok(Self {
            service,
            config,
            authorizer,
        })
    }

    /// Fail unless `actor` is an admin.
    pub fn require_admin(&self, actor: &str, action: &str) -> anyhow::Result<()> {
        self.authorizer.require_admin(actor, action)?;
        Ok(())
    }
}

fn resolve_db_path(project_root: &Path, configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::resolve_db_path;

    #[test]
    fn relative_db_path_is_under_project_root() {
        let resolved = resolve_db_path(Path::new("/work/solar"), ".tally/review.db");
        assert_eq!(resolved, PathBuf::from("/work/solar/.tally/review.db"));
    }

    #[test]
    fn absolute_db_path_is_kept() {
        let resolved = resolve_db_path(Path::new("/work/solar"), "/var/lib/tally.db");
        assert_eq!(resolved, PathBuf::from("/var/lib/tally.db"));
    }
}
