//! Repository cloning

use super::{ClonedRepo, RepoHandle};
use crate::config::Backend;
use crate::error::{Error, Result};
use crate::exec::process::git;
use crate::exec::Invocation;
use std::path::Path;

impl RepoHandle<'_> {
    /// Clone the repository.
    ///
    /// Without `dest` the clone lands in a fresh temp directory owned by the
    /// returned guard; call [`ClonedRepo::keep`] to hold on to it. With `dest`
    /// the guard never deletes anything. `clone_args` defaults to the
    /// configured arguments (`--depth=1`); the handle's branch is appended.
    pub fn clone_repo(
        &self,
        dest: Option<&Path>,
        clone_args: Option<&[String]>,
    ) -> Result<ClonedRepo> {
        let client = self.client;
        let target = match dest {
            Some(path) => ClonedRepo::new(path.to_path_buf(), false),
            None => client.workspace().scoped("clone")?,
        };

        let mut args: Vec<String> = match clone_args {
            Some(args) => args.to_vec(),
            None => client.config().clone_args.clone(),
        };
        if let Some(branch) = &self.branch {
            args.extend(["--branch".to_string(), branch.clone()]);
        }

        let invocation = match client.config().backend {
            Backend::Gh => Invocation::new(client.require_gh_for(self.reference.host())?)
                .args(["repo", "clone"])
                .arg(self.gh_repo_arg())
                .arg(target.path())
                .arg("--")
                .args(&args),
            Backend::Git => git(["clone"], None)
                .args(&args)
                .arg(self.reference.clone_url())
                .arg(target.path()),
        };

        let output = client.run(&invocation)?;
        if !output.success() {
            let detail = output.failure_detail();
            tracing::error!("Failed to clone {}: {}", self.reference.full_name(), detail);
            return Err(Error::failed(format!("clone {}", self.reference.full_name()), detail));
        }

        tracing::debug!("Cloned {} into {}", self.reference.full_name(), target.path().display());
        Ok(target)
    }

    /// Clone, hand the checkout to `f`, then release it.
    ///
    /// Without `dest` the temp directory is removed once `f` returns, fails or
    /// panics. With `dest` the clone persists and `f` sees that path.
    pub fn with_clone<T, E, F>(
        &self,
        dest: Option<&Path>,
        clone_args: Option<&[String]>,
        f: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(&Path) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let checkout = self.clone_repo(dest, clone_args)?;
        f(checkout.path())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::*;
    use crate::config::Backend;
    use crate::error::Error;
    use crate::exec::Invocation;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Pretend to clone by writing a file into the target directory, which is
    /// the argument after `clone`'s reference for gh and the last one for git.
    fn fake_clone(inv: &Invocation) -> crate::exec::CommandOutput {
        let args = inv.arg_strings();
        let target = match args.first().map(String::as_str) {
            Some("repo") if args.get(1).map(String::as_str) == Some("clone") => args.get(3),
            Some("clone") => args.last(),
            _ => None,
        };
        if let Some(target) = target {
            let dir = PathBuf::from(target);
            std::fs::create_dir_all(&dir).expect("mkdir");
            std::fs::write(dir.join("README.md"), "hello").expect("write");
        }
        ok("")
    }

    fn temp_entries(root: &std::path::Path) -> usize {
        std::fs::read_dir(root).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn gh_clone_arguments() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(fake_clone));
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        let repo = client.repo("https://github.com/octocat/Hello-World", Some("dev")).unwrap();

        let cloned = repo.clone_repo(None, None).unwrap();

        let path = cloned.path().display().to_string();
        assert_eq!(
            runner.lines(),
            vec![format!("repo clone octocat/Hello-World {path} -- --depth=1 --branch dev")]
        );
    }

    #[test]
    fn git_clone_uses_ssh_url_for_ssh_references() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(fake_clone));
        let client = client(runner.clone(), tmp.path(), Backend::Git);
        let repo = client.repo("git@github.com:octocat/Hello-World.git", None).unwrap();
        let dest = tmp.path().join("checkout");

        let cloned = repo.clone_repo(Some(&dest), Some(&["--depth=5".to_string()])).unwrap();

        assert_eq!(cloned.path(), dest.as_path());
        assert!(!cloned.is_temp());
        assert_eq!(
            runner.lines(),
            vec![format!("clone --depth=5 git@github.com:octocat/Hello-World.git {}", dest.display())]
        );
        assert_eq!(runner.calls()[0].program, PathBuf::from("git"));
    }

    #[test]
    fn enterprise_host_is_passed_to_gh() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(fake_clone));
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        let repo = client.repo("https://ghe.example.com/team/tool", None).unwrap();
        let _cloned = repo.clone_repo(None, None).unwrap();
        assert!(runner.lines()[0].starts_with("repo clone ghe.example.com/team/tool "));
        let auth = runner.calls()[1].arg_strings().join(" ");
        assert_eq!(auth, "auth status --hostname ghe.example.com");
    }

    #[test]
    fn enterprise_clone_fails_when_host_is_not_authenticated() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(|inv| {
            if inv.arg_strings().join(" ") == "auth status --hostname ghe.example.com" {
                fail("not logged in to ghe.example.com")
            } else {
                fake_clone(inv)
            }
        }));
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        client.require_gh().unwrap();
        let repo = client.repo("https://ghe.example.com/team/tool", None).unwrap();

        let err = repo.clone_repo(None, None).unwrap_err();

        assert!(matches!(err, Error::ToolingUnavailable(_)), "{err}");
        assert!(runner.lines().is_empty());
    }

    #[test]
    fn temp_clone_returns_existing_path_and_cleans_on_drop() {
        let tmp = TempDir::new().expect("tmp");
        let client = client(Arc::new(RecordingRunner::new(fake_clone)), tmp.path(), Backend::Git);
        let repo = client.repo("octocat/Hello-World", None).unwrap();

        let cloned = repo.clone_repo(None, None).unwrap();
        let path = cloned.path().to_path_buf();
        assert!(cloned.is_temp());
        assert!(path.join("README.md").is_file());

        drop(cloned);
        assert!(!path.exists());
    }

    #[test]
    fn kept_temp_clone_survives_until_cleanup() {
        let tmp = TempDir::new().expect("tmp");
        let client = client(Arc::new(RecordingRunner::new(fake_clone)), tmp.path(), Backend::Git);
        let repo = client.repo("octocat/Hello-World", None).unwrap();

        let path = repo.clone_repo(None, None).unwrap().keep();
        assert!(path.is_dir());

        repo.cleanup_temp(&path);
        assert!(!path.exists());
    }

    #[test]
    fn failed_clone_removes_temp_dir_and_reports_stderr() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(|_| fail("fatal: repository not found")));
        let client = client(runner, tmp.path(), Backend::Git);
        let repo = client.repo("octocat/missing", None).unwrap();

        let err = repo.clone_repo(None, None).unwrap_err();

        assert!(matches!(err, Error::OperationFailed { .. }));
        assert!(err.to_string().contains("repository not found"));
        assert_eq!(temp_entries(tmp.path()), 0);
    }

    #[test]
    fn with_clone_removes_temp_dir_after_success() {
        let tmp = TempDir::new().expect("tmp");
        let client = client(Arc::new(RecordingRunner::new(fake_clone)), tmp.path(), Backend::Git);
        let repo = client.repo("octocat/Hello-World", None).unwrap();

        let (seen, content) = repo
            .with_clone(None, None, |path| {
                let content = std::fs::read_to_string(path.join("README.md"))?;
                Ok::<_, Error>((path.to_path_buf(), content))
            })
            .unwrap();

        assert_eq!(content, "hello");
        assert!(!seen.exists());
    }

    #[test]
    fn with_clone_removes_temp_dir_when_closure_fails() {
        let tmp = TempDir::new().expect("tmp");
        let client = client(Arc::new(RecordingRunner::new(fake_clone)), tmp.path(), Backend::Git);
        let repo = client.repo("octocat/Hello-World", None).unwrap();

        let result: Result<(), Error> = repo.with_clone(None, None, |path| {
            assert!(path.is_dir());
            Err(Error::failed("inspect", "boom"))
        });

        assert!(result.is_err());
        assert_eq!(temp_entries(tmp.path()), 0);
    }

    #[test]
    fn with_clone_removes_temp_dir_when_closure_panics() {
        let tmp = TempDir::new().expect("tmp");
        let client = client(Arc::new(RecordingRunner::new(fake_clone)), tmp.path(), Backend::Git);
        let repo = client.repo("octocat/Hello-World", None).unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: Result<(), Error> = repo.with_clone(None, None, |_| panic!("callback exploded"));
        }));

        assert!(outcome.is_err());
        assert_eq!(temp_entries(tmp.path()), 0);
    }

    #[test]
    fn with_clone_keeps_explicit_destination() {
        let tmp = TempDir::new().expect("tmp");
        let client = client(Arc::new(RecordingRunner::new(fake_clone)), tmp.path(), Backend::Git);
        let repo = client.repo("octocat/Hello-World", None).unwrap();
        let dest = tmp.path().join("persisted");

        let seen = repo.with_clone(Some(&dest), None, |path| Ok::<_, Error>(path.to_path_buf())).unwrap();

        assert_eq!(seen, dest);
        assert!(dest.join("README.md").is_file());
    }
}
