//! In-process implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    next_id: i64,
    links: BTreeMap<i64, Link>,
    /// short_code -> id
    codes: HashMap<String, i64>,
}

impl Store {
    fn alias_in_use(&self, alias: &str, except_id: Option<i64>) -> bool {
        self.links
            .values()
            .any(|l| Some(l.id) != except_id && l.custom_alias.as_deref() == Some(alias))
    }
}

/// Link store kept in process memory.
///
/// Every operation runs inside one mutex-guarded critical section, which gives
/// the same guarantees as the database constraints: a duplicate code is
/// rejected at insert time and increments are never lost. Data does not
/// survive a restart.
#[derive(Default)]
pub struct MemoryLinkRepository {
    store: Mutex<Store>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored links, active or not.
    pub fn len(&self) -> usize {
        self.lock().links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn duplicate(constraint: &str) -> AppError {
    AppError::DuplicateCode {
        constraint: Some(constraint.to_string()),
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut store = self.lock();

        if store.codes.contains_key(&new_link.short_code) {
            return Err(duplicate("links_short_code_key"));
        }
        if let Some(alias) = &new_link.custom_alias
            && store.alias_in_use(alias, None)
        {
            return Err(duplicate("links_custom_alias_key"));
        }

        store.next_id += 1;
        let link = Link::new(
            store.next_id,
            new_link.original_url,
            new_link.short_code,
            new_link.custom_alias,
            Utc::now(),
            0,
            true,
        );

        store.codes.insert(link.short_code.clone(), link.id);
        store.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.lock().links.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let store = self.lock();
        Ok(store
            .codes
            .get(code)
            .and_then(|id| store.links.get(id))
            .cloned())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.lock().codes.contains_key(code))
    }

    async fn list_active(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError> {
        let store = self.lock();
        let mut active: Vec<&Link> = store.links.values().filter(|l| l.is_active).collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(active
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        Ok(self.lock().links.values().filter(|l| l.is_active).count() as i64)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        let mut store = self.lock();

        let Some(current_code) = store.links.get(&id).map(|l| l.short_code.clone()) else {
            return Ok(None);
        };

        if let Some(code) = &patch.short_code
            && *code != current_code
            && store.codes.contains_key(code)
        {
            return Err(duplicate("links_short_code_key"));
        }
        if let Some(Some(alias)) = &patch.custom_alias
            && store.alias_in_use(alias, Some(id))
        {
            return Err(duplicate("links_custom_alias_key"));
        }

        let Some(link) = store.links.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(link);
        let updated = link.clone();

        if updated.short_code != current_code {
            store.codes.remove(&current_code);
            store.codes.insert(updated.short_code.clone(), id);
        }

        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut store = self.lock();

        match store.links.remove(&id) {
            Some(link) => {
                store.codes.remove(&link.short_code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_click_count(&self, id: i64) -> Result<Option<i64>, AppError> {
        Ok(self.lock().links.get_mut(&id).map(|link| {
            link.click_count += 1;
            link.click_count
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(code: &str, alias: Option<&str>) -> NewLink {
        NewLink {
            original_url: "https://example.com".to_string(),
            short_code: code.to_string(),
            custom_alias: alias.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = MemoryLinkRepository::new();

        let first = repo.create(new_link("aaa", None)).await.unwrap();
        let second = repo.create(new_link("bbb", None)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.click_count, 0);
        assert!(first.is_active);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_code() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("dup", None)).await.unwrap();

        let err = repo.create(new_link("dup", Some("dup"))).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateCode { .. }));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_codes_are_case_sensitive() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("AbC", None)).await.unwrap();

        assert!(repo.code_exists("AbC").await.unwrap());
        assert!(!repo.code_exists("abc").await.unwrap());
        assert!(repo.create(new_link("abc", None)).await.is_ok());
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let repo = MemoryLinkRepository::new();
        let first = repo.create(new_link("one", None)).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(new_link("one", None)).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_delete_frees_code() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("free", Some("free"))).await.unwrap();

        assert!(repo.delete(link.id).await.unwrap());
        assert!(!repo.code_exists("free").await.unwrap());
        assert!(!repo.delete(link.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_moves_code_index() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("old", None)).await.unwrap();

        let updated = repo
            .update(
                link.id,
                LinkPatch {
                    short_code: Some("new".to_string()),
                    custom_alias: Some(Some("new".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.short_code, "new");
        assert!(!repo.code_exists("old").await.unwrap());
        assert_eq!(repo.find_by_code("new").await.unwrap().unwrap().id, link.id);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_code() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("taken", None)).await.unwrap();
        let link = repo.create(new_link("mine", None)).await.unwrap();

        let err = repo
            .update(
                link.id,
                LinkPatch {
                    short_code: Some("taken".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateCode { .. }));
        assert_eq!(repo.find_by_id(link.id).await.unwrap().unwrap().short_code, "mine");
    }

    #[tokio::test]
    async fn test_update_missing_link() {
        let repo = MemoryLinkRepository::new();
        let result = repo.update(5, LinkPatch::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let repo = MemoryLinkRepository::new();
        let a = repo.create(new_link("a1", None)).await.unwrap();
        repo.create(new_link("b2", None)).await.unwrap();
        repo.update(
            a.id,
            LinkPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let items = repo.list_active(0, 10).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].short_code, "b2");
        assert_eq!(repo.count_active().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_click_count() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("clk", None)).await.unwrap();

        assert_eq!(repo.increment_click_count(link.id).await.unwrap(), Some(1));
        assert_eq!(repo.increment_click_count(link.id).await.unwrap(), Some(2));
        assert_eq!(repo.increment_click_count(999).await.unwrap(), None);
    }
}
