use anyhow::{Context, Result};
use git2::{Cred, PushOptions, RemoteCallbacks, Repository, Signature, StatusOptions};
use std::path::Path;

/// Trait defining the git operations the release flow needs.
///
/// The release flow only does opportunistic bookkeeping: a dirty-tree check
/// before bumping, a commit of the version bump, and a release tag pushed
/// after a successful upload.
pub trait GitOperations {
    /// Paths with uncommitted changes (staged, unstaged, or untracked).
    fn dirty_paths(&self) -> Result<Vec<String>>;

    /// Stage the given paths and commit them on HEAD.
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()>;

    /// Create a lightweight tag pointing at HEAD.
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push a tag to the named remote.
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;
}

/// Implementation of GitOperations using git2
pub struct Git2Operations {
    repo: Repository,
}

impl Git2Operations {
    /// Open the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).context("Failed to open git repository")?;
        Ok(Self { repo })
    }

    fn get_signature(&self) -> Result<Signature<'_>> {
        // Try to get signature from config, fall back to defaults
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => Signature::now("BootBoots Release", "ops@bootboots.dev")
                .context("Failed to create default signature"),
        }
    }

    fn auth_callbacks() -> RemoteCallbacks<'static> {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, _allowed_types| {
            Cred::ssh_key(
                username_from_url.unwrap_or("git"),
                None,
                Path::new(&format!(
                    "{}/.ssh/id_rsa",
                    std::env::var("HOME").unwrap_or_default()
                )),
                None,
            )
        });
        callbacks
    }
}

impl GitOperations for Git2Operations {
    fn dirty_paths(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);
        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .context("Failed to read repository status")?;

        Ok(statuses
            .iter()
            .filter_map(|entry| entry.path().map(|p| p.to_string()))
            .collect())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        let workdir = self
            .repo
            .workdir()
            .context("Repository has no working directory")?;
        for path in paths {
            let relative = path.strip_prefix(workdir).unwrap_or(path);
            index
                .add_path(relative)
                .with_context(|| format!("Failed to stage {}", relative.display()))?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.get_signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;

        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &[&parent],
            )
            .context("Failed to commit")?;
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .with_context(|| format!("Failed to create tag '{name}'"))?;
        Ok(())
    }

    fn push_tag(&self, remote_name: &str, tag: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .with_context(|| format!("Remote '{remote_name}' not found"))?;

        let refspec = format!("refs/tags/{tag}:refs/tags/{tag}");

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(Self::auth_callbacks());

        remote
            .push(&[&refspec], Some(&mut push_options))
            .with_context(|| format!("Failed to push tag '{tag}' to '{remote_name}'"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();

            std::fs::write(dir.join("README.md"), "# test\n").unwrap();
            let mut index = repo.index().unwrap();
            index.add_path(Path::new("README.md")).unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = repo.signature().unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn clean_tree_reports_no_dirty_paths() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());
        let git = Git2Operations::discover(temp.path()).unwrap();
        assert!(git.dirty_paths().unwrap().is_empty());
    }

    #[test]
    fn untracked_file_makes_tree_dirty() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());
        std::fs::write(temp.path().join("scratch.txt"), "wip").unwrap();

        let git = Git2Operations::discover(temp.path()).unwrap();
        let dirty = git.dirty_paths().unwrap();
        assert_eq!(dirty, vec!["scratch.txt".to_string()]);
    }

    #[test]
    fn commit_paths_leaves_tree_clean_and_tag_lands_on_head() {
        let temp = TempDir::new().unwrap();
        init_repo(temp.path());
        let version_file = temp.path().join("version.h");
        std::fs::write(&version_file, "#define FIRMWARE_VERSION \"1.0.1\"\n").unwrap();

        let git = Git2Operations::discover(temp.path()).unwrap();
        git.commit_paths(&[&version_file], "Bump firmware version to 1.0.1")
            .unwrap();
        assert!(git.dirty_paths().unwrap().is_empty());

        git.create_tag("device/1.0.1").unwrap();
        let repo = Repository::open(temp.path()).unwrap();
        assert!(repo.revparse_single("refs/tags/device/1.0.1").is_ok());
    }

    #[test]
    fn push_tag_to_local_bare_remote() {
        let temp = TempDir::new().unwrap();
        let work = temp.path().join("work");
        let bare = temp.path().join("origin.git");
        std::fs::create_dir_all(&work).unwrap();
        Repository::init_bare(&bare).unwrap();

        let repo = init_repo(&work);
        repo.remote("origin", bare.to_str().unwrap()).unwrap();

        let git = Git2Operations::discover(&work).unwrap();
        git.create_tag("device/9.9.9").unwrap();
        git.push_tag("origin", "device/9.9.9").unwrap();

        let remote_repo = Repository::open_bare(&bare).unwrap();
        assert!(remote_repo.revparse_single("refs/tags/device/9.9.9").is_ok());
    }
}
