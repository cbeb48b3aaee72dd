//! Staged-edit repository over the links table.
//!
//! Edits accumulate in memory and reach the store only through `commit`,
//! which applies the whole set in a single transaction and then reloads the
//! baseline from disk.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::db::{Database, LinkFields, LinkRecord};
use crate::error::Result;

/// In-memory diff against the committed baseline.
#[derive(Debug, Default)]
struct StagedEdits {
    /// Pending inserts keyed by placeholder id, in staging order.
    inserts: Vec<(i64, LinkFields)>,
    /// Dirty rows keyed by persisted id.
    updates: BTreeMap<i64, LinkFields>,
    /// Persisted ids marked for removal.
    deletes: BTreeSet<i64>,
}

impl StagedEdits {
    fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    fn clear(&mut self) {
        self.inserts.clear();
        self.updates.clear();
        self.deletes.clear();
    }
}

pub struct LinkRepository {
    db: Arc<Database>,
    baseline: Vec<LinkRecord>,
    staged: StagedEdits,
    next_placeholder: i64,
}

impl LinkRepository {
    /// Create a repository over an open store and load the initial baseline.
    pub fn open(db: Arc<Database>) -> Result<Self> {
        let mut repo = LinkRepository {
            db,
            baseline: Vec::new(),
            staged: StagedEdits::default(),
            next_placeholder: -1,
        };
        repo.load_all()?;
        Ok(repo)
    }

    /// Reload the committed rows, discarding any staged edits.
    pub fn load_all(&mut self) -> Result<&[LinkRecord]> {
        self.baseline = self.db.load_links()?;
        self.staged.clear();
        Ok(&self.baseline)
    }

    /// Committed rows, in store order. The projection reads this view.
    pub fn baseline(&self) -> &[LinkRecord] {
        &self.baseline
    }

    /// Baseline with the staged diff applied: surviving rows first, pending
    /// inserts last. Pending rows carry their negative placeholder ids.
    pub fn rows(&self) -> Vec<LinkRecord> {
        let mut rows: Vec<LinkRecord> = self
            .baseline
            .iter()
            .filter(|row| !self.staged.deletes.contains(&row.id))
            .map(|row| match self.staged.updates.get(&row.id) {
                Some(fields) => fields.with_id(row.id),
                None => row.clone(),
            })
            .collect();

        for (id, fields) in &self.staged.inserts {
            rows.push(fields.with_id(*id));
        }
        rows
    }

    /// Queue a new row. Returns the placeholder id it is tracked under until
    /// commit lets the store assign a real one.
    pub fn stage_insert(&mut self, fields: LinkFields) -> i64 {
        let id = self.next_placeholder;
        self.next_placeholder -= 1;
        self.staged.inserts.push((id, fields));
        id
    }

    /// Replace the field values of a row. Returns false when there is
    /// nothing to do: the id is unknown or the row is already marked for
    /// removal.
    pub fn stage_update(&mut self, id: i64, fields: LinkFields) -> bool {
        if id < 0 {
            if let Some(entry) = self.staged.inserts.iter_mut().find(|(pid, _)| *pid == id) {
                entry.1 = fields;
                return true;
            }
            return false;
        }

        if self.staged.deletes.contains(&id) {
            return false;
        }
        if !self.baseline.iter().any(|row| row.id == id) {
            return false;
        }

        self.staged.updates.insert(id, fields);
        true
    }

    /// Mark a row for removal. A pending insert is simply dropped and never
    /// reaches the store. Returns false when the id is unknown.
    pub fn stage_delete(&mut self, id: i64) -> bool {
        if id < 0 {
            let before = self.staged.inserts.len();
            self.staged.inserts.retain(|(pid, _)| *pid != id);
            return self.staged.inserts.len() != before;
        }

        if !self.baseline.iter().any(|row| row.id == id) {
            return false;
        }

        self.staged.updates.remove(&id);
        self.staged.deletes.insert(id)
    }

    /// Explicit pending flag for the collaborator to poll.
    pub fn has_pending_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Apply every staged edit in one transaction, then reload the baseline
    /// from disk. On failure the store and the staged set are both left as
    /// they were, so the caller can retry or keep editing.
    pub fn commit(&mut self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let deletes: Vec<i64> = self.staged.deletes.iter().copied().collect();
        let updates: Vec<(i64, LinkFields)> = self
            .staged
            .updates
            .iter()
            .map(|(id, fields)| (*id, fields.clone()))
            .collect();
        let inserts: Vec<LinkFields> = self
            .staged
            .inserts
            .iter()
            .map(|(_, fields)| fields.clone())
            .collect();

        self.db.apply_links(&deletes, &updates, &inserts)?;
        self.load_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, category: &str, url: &str) -> LinkFields {
        LinkFields {
            title: title.to_string(),
            category: category.to_string(),
            url: url.to_string(),
        }
    }

    fn repo() -> LinkRepository {
        LinkRepository::open(Arc::new(Database::open_in_memory().unwrap())).unwrap()
    }

    #[test]
    fn test_insert_commit_roundtrip() {
        let mut repo = repo();

        let placeholder = repo.stage_insert(fields("Dashboard", "Work", "https://example.com"));
        assert!(placeholder < 0);
        assert!(repo.has_pending_changes());

        repo.commit().unwrap();
        assert!(!repo.has_pending_changes());

        let rows = repo.baseline();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].id > 0);
        assert_eq!(rows[0].title, "Dashboard");
        assert_eq!(rows[0].category, "Work");
        assert_eq!(rows[0].url, "https://example.com");
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut repo = repo();

        repo.stage_insert(fields("A", "Work", "u1"));
        repo.commit().unwrap();
        let first_id = repo.baseline()[0].id;

        repo.stage_delete(first_id);
        repo.commit().unwrap();
        assert!(repo.baseline().is_empty());

        repo.stage_insert(fields("B", "Work", "u2"));
        repo.commit().unwrap();
        assert_ne!(repo.baseline()[0].id, first_id);
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let mut repo = LinkRepository::open(Arc::clone(&db)).unwrap();

        repo.stage_insert(fields("Base", "Work", "u0"));
        repo.commit().unwrap();
        let baseline_before: Vec<LinkRecord> = repo.baseline().to_vec();

        // Force the second of three staged inserts to fail.
        db.execute_batch("CREATE UNIQUE INDEX idx_links_url_unique ON links(url)")
            .unwrap();
        repo.stage_insert(fields("One", "Work", "u1"));
        repo.stage_insert(fields("Dup", "Work", "u1"));
        repo.stage_insert(fields("Three", "Work", "u3"));

        assert!(repo.commit().is_err());

        // The store still holds exactly the pre-commit baseline, and the
        // staged set survives for a retry.
        assert_eq!(db.load_links().unwrap(), baseline_before);
        assert!(repo.has_pending_changes());

        // Dropping the conflicting pending insert makes the retry succeed.
        let dup_id = repo.rows()[2].id;
        assert!(repo.stage_delete(dup_id));
        repo.commit().unwrap();
        assert_eq!(repo.baseline().len(), 3);
    }

    #[test]
    fn test_deleting_pending_insert_skips_the_store() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let mut repo = LinkRepository::open(Arc::clone(&db)).unwrap();

        let placeholder = repo.stage_insert(fields("Gone", "Work", "u1"));
        assert!(repo.stage_delete(placeholder));
        assert!(!repo.has_pending_changes());

        repo.commit().unwrap();
        assert!(db.load_links().unwrap().is_empty());
    }

    #[test]
    fn test_updating_pending_insert_rewrites_it_in_place() {
        let mut repo = repo();

        let placeholder = repo.stage_insert(fields("Draft", "Work", "u1"));
        assert!(repo.stage_update(placeholder, fields("Final", "Home", "u2")));

        repo.commit().unwrap();
        let rows = repo.baseline();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Final");
        assert_eq!(rows[0].category, "Home");
    }

    #[test]
    fn test_update_and_delete_of_committed_rows() {
        let mut repo = repo();

        repo.stage_insert(fields("A", "Work", "u1"));
        repo.stage_insert(fields("B", "Work", "u2"));
        repo.commit().unwrap();
        let (id_a, id_b) = (repo.baseline()[0].id, repo.baseline()[1].id);

        assert!(repo.stage_update(id_a, fields("A2", "Home", "u1")));
        assert!(repo.stage_delete(id_b));
        repo.commit().unwrap();

        let rows = repo.baseline();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id_a);
        assert_eq!(rows[0].title, "A2");
        assert_eq!(rows[0].category, "Home");
    }

    #[test]
    fn test_operations_without_a_target_are_noops() {
        let mut repo = repo();

        assert!(!repo.stage_update(42, fields("X", "Y", "Z")));
        assert!(!repo.stage_delete(42));
        assert!(!repo.stage_delete(-42));
        assert!(!repo.has_pending_changes());
        repo.commit().unwrap();
    }

    #[test]
    fn test_delete_wins_over_staged_update() {
        let mut repo = repo();

        repo.stage_insert(fields("A", "Work", "u1"));
        repo.commit().unwrap();
        let id = repo.baseline()[0].id;

        assert!(repo.stage_update(id, fields("A2", "Work", "u1")));
        assert!(repo.stage_delete(id));
        assert!(!repo.stage_update(id, fields("A3", "Work", "u1")));

        repo.commit().unwrap();
        assert!(repo.baseline().is_empty());
    }

    #[test]
    fn test_rows_view_applies_the_diff() {
        let mut repo = repo();

        repo.stage_insert(fields("A", "Work", "u1"));
        repo.stage_insert(fields("B", "Work", "u2"));
        repo.commit().unwrap();
        let (id_a, id_b) = (repo.baseline()[0].id, repo.baseline()[1].id);

        repo.stage_update(id_a, fields("A2", "Work", "u1"));
        repo.stage_delete(id_b);
        let pending = repo.stage_insert(fields("C", "Home", "u3"));

        let rows = repo.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, id_a);
        assert_eq!(rows[0].title, "A2");
        assert_eq!(rows[1].id, pending);
        assert_eq!(rows[1].title, "C");

        // The committed view is unchanged until commit.
        assert_eq!(repo.baseline().len(), 2);
        assert_eq!(repo.baseline()[0].title, "A");
    }

    #[test]
    fn test_load_all_discards_staged_edits() {
        let mut repo = repo();

        repo.stage_insert(fields("A", "Work", "u1"));
        assert!(repo.has_pending_changes());

        repo.load_all().unwrap();
        assert!(!repo.has_pending_changes());
        assert!(repo.baseline().is_empty());
    }

    #[test]
    fn test_empty_commit_is_a_noop() {
        let mut repo = repo();
        repo.commit().unwrap();
        assert!(repo.baseline().is_empty());
    }
}
