use crate::commands::{CmdMessage, CmdResult, GrepsPaths};
use crate::error::{GrepsError, Result};
use crate::repository::QueryRepository;
use crate::store::QueryBackend;

pub fn run<B: QueryBackend>(paths: &GrepsPaths, repo: &QueryRepository<B>) -> Result<CmdResult> {
    std::fs::create_dir_all(&paths.data_dir).map_err(GrepsError::Io)?;
    let created = repo.ensure_exists()?;

    let mut result = CmdResult::default();
    if created {
        result.add_message(CmdMessage::success(format!(
            "Initialized query store in {}",
            paths.data_dir.display()
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Query store already exists in {}",
            paths.data_dir.display()
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs::FsQueryBackend;
    use tempfile::TempDir;

    #[test]
    fn creates_the_store_once() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("greps");
        let paths = GrepsPaths {
            data_dir: data_dir.clone(),
        };
        let repo = QueryRepository::new(FsQueryBackend::new(&data_dir));

        let first = run(&paths, &repo).unwrap();
        assert!(first.messages[0].content.starts_with("Initialized"));
        assert!(data_dir.join("queries.json").exists());

        let second = run(&paths, &repo).unwrap();
        assert!(second.messages[0].content.starts_with("Query store already exists"));
    }
}
