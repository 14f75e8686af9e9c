//! Repository creation and initial push

use super::GithubClient;
use crate::error::{Error, Result};
use crate::exec::process::git;
use crate::reference::build_repo_url;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct CreateRepoOptions {
    pub private: bool,
    pub description: Option<String>,
    /// Local directory passed to `gh repo create --source`.
    pub source: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PushOptions {
    pub branch: String,
    pub message: String,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self { branch: "main".to_string(), message: "init commit".to_string() }
    }
}

impl GithubClient {
    /// Create `owner/name` on GitHub via `gh repo create`.
    pub fn create_repo(&self, owner: &str, name: &str, options: &CreateRepoOptions) -> Result<()> {
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() {
            return Err(Error::InvalidReference("owner and name must be non-empty".to_string()));
        }
        let name_with_owner = format!("{owner}/{name}");

        let mut args = vec![
            "repo".to_string(),
            "create".to_string(),
            name_with_owner.clone(),
            if options.private { "--private" } else { "--public" }.to_string(),
            "--confirm".to_string(),
        ];
        if let Some(source) = options.source.as_deref().filter(|s| !s.is_empty()) {
            args.extend(["--source".to_string(), source.to_string()]);
        }
        if let Some(description) = options.description.as_deref().filter(|d| !d.is_empty()) {
            args.extend(["--description".to_string(), description.to_string()]);
        }

        let output = self.gh(&args)?;
        if !output.success() {
            let detail = output.failure_detail();
            tracing::error!("Failed to create {}: {}", name_with_owner, detail);
            return Err(Error::failed(format!("create {name_with_owner}"), detail));
        }
        tracing::info!("Created repository {}.", name_with_owner);
        Ok(())
    }

    /// Initialize a repository at `repo_path`, commit everything and push it to
    /// `https://github.com/<owner>/<name>.git`.
    ///
    /// A failed step is reported with its stderr; nothing is rolled back.
    pub fn push_initial_commit(
        &self,
        repo_path: &Path,
        owner: &str,
        name: &str,
        options: &PushOptions,
    ) -> Result<()> {
        if !repo_path.is_dir() {
            return Err(Error::InvalidPath(format!(
                "repo_path must be a directory: {}",
                repo_path.display()
            )));
        }
        let target = repo_path.canonicalize()?;
        let remote_url = build_repo_url(owner, name)?;
        let cwd = Some(target.as_path());
        let branch = options.branch.as_str();

        self.git_checked("initialize git repository", ["init"], cwd)?;
        self.git_checked("stage project files", ["add", "--all"], cwd)?;
        self.git_checked("create initial commit", ["commit", "-m", options.message.as_str()], cwd)?;
        self.git_checked(&format!("set branch to {branch}"), ["branch", "-M", branch], cwd)?;

        let remote_add = self.run(&git(["remote", "add", "origin", remote_url.as_str()], cwd))?;
        if !remote_add.success() {
            let remote_set =
                self.run(&git(["remote", "set-url", "origin", remote_url.as_str()], cwd))?;
            if !remote_set.success() {
                let mut detail = remote_set.stderr_str();
                if detail.is_empty() {
                    detail = remote_add.failure_detail();
                }
                return Err(Error::failed("configure remote origin", detail));
            }
        }

        self.git_checked("push initial commit", ["push", "-u", "origin", branch], cwd)?;
        tracing::info!("Pushed initial commit to {} ({})", remote_url, branch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;
    use crate::config::Backend;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn create_repo_builds_gh_arguments() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::ok());
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        let options = CreateRepoOptions {
            private: true,
            description: Some("demo repo".into()),
            source: Some(".".into()),
        };
        client.create_repo("octocat", "demo", &options).unwrap();
        assert_eq!(
            runner.lines(),
            vec!["repo create octocat/demo --private --confirm --source . --description demo repo"]
        );
        let last = runner.calls().pop().unwrap();
        assert_eq!(last.program, std::path::PathBuf::from("/usr/bin/gh"));
    }

    #[test]
    fn create_repo_defaults_to_public() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::ok());
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        client.create_repo("octocat", "demo", &CreateRepoOptions::default()).unwrap();
        assert_eq!(runner.lines(), vec!["repo create octocat/demo --public --confirm"]);
    }

    #[test]
    fn create_repo_failure_carries_stderr() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(|inv| {
            if inv.arg_strings().first().map(String::as_str) == Some("repo") {
                fail("Name already exists on this account")
            } else {
                ok("")
            }
        }));
        let client = client(runner, tmp.path(), Backend::Gh);
        let err = client.create_repo("octocat", "demo", &CreateRepoOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Name already exists"), "{err}");
    }

    #[test]
    fn create_repo_rejects_empty_names() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::ok());
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        assert!(matches!(
            client.create_repo(" ", "demo", &CreateRepoOptions::default()),
            Err(Error::InvalidReference(_))
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn push_runs_git_steps_in_order() {
        let tmp = TempDir::new().expect("tmp");
        let project = tmp.path().join("project");
        std::fs::create_dir(&project).expect("mkdir");
        let runner = Arc::new(RecordingRunner::ok());
        let client = client(runner.clone(), tmp.path(), Backend::Gh);

        client.push_initial_commit(&project, "octocat", "my repo", &PushOptions::default()).unwrap();

        assert_eq!(
            runner.lines(),
            vec![
                "init",
                "add --all",
                "commit -m init commit",
                "branch -M main",
                "remote add origin https://github.com/octocat/my-repo.git",
                "push -u origin main",
            ]
        );
        let canonical = project.canonicalize().unwrap();
        assert!(runner.calls().iter().all(|c| c.cwd.as_deref() == Some(canonical.as_path())));
    }

    #[test]
    fn push_updates_existing_remote() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(|inv| {
            if inv.arg_strings().starts_with(&["remote".to_string(), "add".to_string()]) {
                fail("error: remote origin already exists.")
            } else {
                ok("")
            }
        }));
        let client = client(runner.clone(), tmp.path(), Backend::Gh);
        let options = PushOptions { branch: "trunk".into(), message: "first".into() };

        client.push_initial_commit(tmp.path(), "o", "r", &options).unwrap();

        let lines = runner.lines();
        assert!(lines.contains(&"remote set-url origin https://github.com/o/r.git".to_string()));
        assert_eq!(lines.last().unwrap(), "push -u origin trunk");
    }

    #[test]
    fn push_stops_at_first_failure() {
        let tmp = TempDir::new().expect("tmp");
        let runner = Arc::new(RecordingRunner::new(|inv| {
            if inv.arg_strings().first().map(String::as_str) == Some("commit") {
                fail("nothing to commit, working tree clean")
            } else {
                ok("")
            }
        }));
        let client = client(runner.clone(), tmp.path(), Backend::Gh);

        let err = client.push_initial_commit(tmp.path(), "o", "r", &PushOptions::default()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "create initial commit failed: nothing to commit, working tree clean"
        );
        assert_eq!(runner.lines().len(), 3);
    }

    #[test]
    fn push_requires_a_directory() {
        let tmp = TempDir::new().expect("tmp");
        let file = tmp.path().join("file.txt");
        std::fs::write(&file, "x").expect("write");
        let client = client(Arc::new(RecordingRunner::ok()), tmp.path(), Backend::Gh);
        assert!(matches!(
            client.push_initial_commit(&file, "o", "r", &PushOptions::default()),
            Err(Error::InvalidPath(_))
        ));
    }
}
