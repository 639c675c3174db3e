use super::CmdResult;
use crate::error::Result;
use crate::model::HistoryKind;
use crate::repository::QueryRepository;
use crate::store::QueryBackend;

pub fn run<B: QueryBackend>(repo: &QueryRepository<B>, kind: HistoryKind) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed(repo.history(kind)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemQueryBackend;

    #[test]
    fn lists_most_recent_first() {
        let repo = QueryRepository::new(MemQueryBackend::new());
        repo.record_history(HistoryKind::ChangeTo, "one").unwrap();
        repo.record_history(HistoryKind::ChangeTo, "two").unwrap();

        let result = run(&repo, HistoryKind::ChangeTo).unwrap();
        assert_eq!(result.listed, vec!["two", "one"]);
        assert!(run(&repo, HistoryKind::FindWhat).unwrap().listed.is_empty());
    }
}
