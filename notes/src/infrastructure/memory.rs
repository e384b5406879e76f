use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use bulletin_common::{RepositoryError, UserId};
use itertools::Itertools;
use tokio::sync::RwLock;

use crate::domain::{Note, NoteDraft, NoteId, NoteRepository, NoteSlug};

/// Notes kept in memory; the slug stays unique like under the database constraint
#[derive(Clone, Debug, Default)]
pub struct MemoryNoteRepository {
    notes: Arc<RwLock<BTreeMap<NoteId, Note>>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.notes.read().await.len()
    }
}

fn slug_in_use(notes: &BTreeMap<NoteId, Note>, slug: &NoteSlug, exclude: Option<NoteId>) -> bool {
    notes
        .values()
        .any(|note| &note.slug == slug && Some(note.id) != exclude)
}

impl NoteRepository for MemoryNoteRepository {
    async fn list_by_author(&self, author: UserId) -> Result<Vec<Note>, RepositoryError> {
        // BTreeMap iterates by id
        Ok(self
            .notes
            .read()
            .await
            .values()
            .filter(|note| note.author == author)
            .cloned()
            .collect_vec())
    }

    async fn find_by_slug(&self, slug: &NoteSlug) -> Result<Option<Note>, RepositoryError> {
        let notes = self.notes.read().await;
        Ok(notes.values().find(|note| &note.slug == slug).cloned())
    }

    async fn exists_by_slug(
        &self,
        slug: &NoteSlug,
        exclude: Option<NoteId>,
    ) -> Result<bool, RepositoryError> {
        Ok(slug_in_use(&*self.notes.read().await, slug, exclude))
    }

    async fn create(&self, author: UserId, draft: NoteDraft) -> Result<Note, RepositoryError> {
        let mut notes = self.notes.write().await;
        if slug_in_use(&notes, &draft.slug, None) {
            return Err(RepositoryError::UniqueViolation(draft.slug.to_string()));
        }

        let id = NoteId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1);
        let note = Note {
            id,
            title: draft.title,
            text: draft.text,
            slug: draft.slug,
            author,
        };
        notes.insert(id, note.clone());
        Ok(note)
    }

    async fn update(&self, id: NoteId, draft: NoteDraft) -> Result<Note, RepositoryError> {
        let mut notes = self.notes.write().await;
        if slug_in_use(&notes, &draft.slug, Some(id)) {
            return Err(RepositoryError::UniqueViolation(draft.slug.to_string()));
        }

        let note = notes.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        note.title = draft.title;
        note.text = draft.text;
        note.slug = draft.slug;
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), RepositoryError> {
        self.notes
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(slug: &str) -> NoteDraft {
        NoteDraft {
            title: "Заголовок".to_string(),
            text: "Текст заметки".to_string(),
            slug: NoteSlug::try_new(slug).unwrap(),
        }
    }

    #[tokio::test]
    async fn list_is_per_author_and_by_id() {
        let repository = MemoryNoteRepository::new();
        let first = repository.create(UserId(1), draft("first")).await.unwrap();
        repository.create(UserId(2), draft("other")).await.unwrap();
        let second = repository.create(UserId(1), draft("second")).await.unwrap();

        let listed = repository.list_by_author(UserId(1)).await.unwrap();
        assert_eq!(listed, vec![first, second]);
        assert!(repository.list_by_author(UserId(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn slug_is_unique_across_authors() {
        let repository = MemoryNoteRepository::new();
        let note = repository.create(UserId(1), draft("note-slug")).await.unwrap();

        let duplicate = repository.create(UserId(2), draft("note-slug")).await;
        assert!(matches!(duplicate, Err(RepositoryError::UniqueViolation(_))));
        assert_eq!(repository.count().await, 1);

        assert!(repository.exists_by_slug(&note.slug, None).await.unwrap());
        assert!(!repository.exists_by_slug(&note.slug, Some(note.id)).await.unwrap());
    }

    #[tokio::test]
    async fn update_may_keep_its_own_slug() {
        let repository = MemoryNoteRepository::new();
        let note = repository.create(UserId(1), draft("note-slug")).await.unwrap();
        repository.create(UserId(1), draft("taken")).await.unwrap();

        let mut changed = draft("note-slug");
        changed.text = "Новый текст".to_string();
        let updated = repository.update(note.id, changed).await.unwrap();
        assert_eq!(updated.text, "Новый текст");

        let clash = repository.update(note.id, draft("taken")).await;
        assert!(matches!(clash, Err(RepositoryError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let repository = MemoryNoteRepository::new();
        let note = repository.create(UserId(1), draft("note-slug")).await.unwrap();

        repository.delete(note.id).await.unwrap();
        assert_eq!(repository.find_by_slug(&note.slug).await.unwrap(), None);
        assert_eq!(repository.delete(note.id).await, Err(RepositoryError::NotFound));

        let next = repository.create(UserId(1), draft("note-slug")).await.unwrap();
        assert_eq!(next.id, NoteId(2));
    }
}
