use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;

use crate::{
    domain::ItemId,
    errors::Error,
    shopping::{
        store::ListStore,
        types::{Item, ShoppingList},
    },
    Result,
};

/// A list mutation, as requested by either entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Add { text: String, added_by: String },
    Remove { text: String },
    Toggle { id: ItemId },
    MarkDone { text: String },
    ClearChecked,
    ClearAll,
}

/// Result of applying a `Mutation`. Absent matches are outcomes, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    Added(Item),
    Removed(bool),
    Toggled(Option<Item>),
    MarkedDone(Option<Item>),
    ClearedChecked { removed: usize },
    ClearedAll,
}

/// Serialized load→mutate→save access to the durable list.
///
/// Every cycle (reads included) runs under one store-wide lock, so the HTTP
/// handlers and the bot loop never interleave a load with another writer's save.
#[derive(Clone)]
pub struct ShoppingService {
    store: Arc<ListStore>,
    lock: Arc<Mutex<()>>,
}

impl ShoppingService {
    pub fn new(store: ListStore) -> Self {
        Self {
            store: Arc::new(store),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    pub async fn snapshot(&self) -> Result<ShoppingList> {
        let _guard = self.lock.lock().await;
        self.store.load().await
    }

    pub async fn add_item(&self, text: &str, added_by: &str) -> Result<Item> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("item text is empty".to_string()));
        }

        let _guard = self.lock.lock().await;
        let mut list = self.store.load().await?;
        let item = Item {
            id: list.allocate_id(),
            text: text.to_string(),
            added_by: added_by.to_string(),
            added_at: Local::now().naive_local(),
            checked: false,
        };
        list.items.push(item.clone());
        self.store.save(&mut list).await?;
        Ok(item)
    }

    /// Remove the first item whose text matches case-insensitively.
    pub async fn remove_item(&self, text: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut list = self.store.load().await?;
        let removed = match list.position_of_text(text) {
            Some(idx) => {
                list.items.remove(idx);
                true
            }
            None => false,
        };
        self.store.save(&mut list).await?;
        Ok(removed)
    }

    pub async fn toggle_item(&self, id: ItemId) -> Result<Option<Item>> {
        let _guard = self.lock.lock().await;
        let mut list = self.store.load().await?;
        let Some(item) = list.find_by_id_mut(id) else {
            return Ok(None);
        };
        item.checked = !item.checked;
        let updated = item.clone();
        self.store.save(&mut list).await?;
        Ok(Some(updated))
    }

    /// Check off the first item whose text matches case-insensitively.
    pub async fn mark_done(&self, text: &str) -> Result<Option<Item>> {
        let _guard = self.lock.lock().await;
        let mut list = self.store.load().await?;
        let Some(idx) = list.position_of_text(text) else {
            return Ok(None);
        };
        list.items[idx].checked = true;
        let updated = list.items[idx].clone();
        self.store.save(&mut list).await?;
        Ok(Some(updated))
    }

    /// Drop checked items; unchecked ones keep their relative order.
    pub async fn clear_checked(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut list = self.store.load().await?;
        let before = list.items.len();
        list.items.retain(|i| !i.checked);
        let removed = before - list.items.len();
        self.store.save(&mut list).await?;
        Ok(removed)
    }

    pub async fn clear_all(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.store.reset().await?;
        Ok(())
    }

    pub async fn apply(&self, mutation: Mutation) -> Result<MutationOutcome> {
        let outcome = match mutation {
            Mutation::Add { text, added_by } => {
                MutationOutcome::Added(self.add_item(&text, &added_by).await?)
            }
            Mutation::Remove { text } => MutationOutcome::Removed(self.remove_item(&text).await?),
            Mutation::Toggle { id } => MutationOutcome::Toggled(self.toggle_item(id).await?),
            Mutation::MarkDone { text } => {
                MutationOutcome::MarkedDone(self.mark_done(&text).await?)
            }
            Mutation::ClearChecked => MutationOutcome::ClearedChecked {
                removed: self.clear_checked().await?,
            },
            Mutation::ClearAll => {
                self.clear_all().await?;
                MutationOutcome::ClearedAll
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn service(tag: &str) -> (ShoppingService, PathBuf) {
        let root = std::env::temp_dir().join(format!("hub-svc-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let svc = ShoppingService::new(ListStore::new(root.join("shopping_list.json")));
        (svc, root)
    }

    #[tokio::test]
    async fn add_to_empty_list_assigns_first_id() {
        let (svc, root) = service("add-first");
        let item = svc.add_item("  Milk ", "Alice").await.unwrap();
        assert_eq!(item.id, ItemId(1));
        assert_eq!(item.text, "Milk");
        assert_eq!(item.added_by, "Alice");
        assert!(!item.checked);

        let list = svc.snapshot().await.unwrap();
        assert_eq!(list.items, vec![item]);
        assert!(list.last_updated.is_some());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn add_rejects_blank_text_without_writing() {
        let (svc, root) = service("add-blank");
        let err = svc.add_item("   ", "Alice").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!svc.store().path().exists());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn ids_keep_increasing_across_removals() {
        let (svc, root) = service("ids");
        let a = svc.add_item("a", "t").await.unwrap();
        let b = svc.add_item("b", "t").await.unwrap();
        assert!(svc.remove_item("a").await.unwrap());
        let c = svc.add_item("c", "t").await.unwrap();
        assert!(a.id < b.id && b.id < c.id);

        assert!(svc.remove_item("c").await.unwrap());
        let d = svc.add_item("d", "t").await.unwrap();
        assert!(d.id > c.id);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn remove_is_case_insensitive_and_first_only() {
        let (svc, root) = service("remove");
        svc.add_item("milk", "t").await.unwrap();
        assert!(svc.remove_item("MILK").await.unwrap());
        assert!(svc.snapshot().await.unwrap().items.is_empty());

        svc.add_item("Eggs", "t").await.unwrap();
        svc.add_item("eggs", "t").await.unwrap();
        assert!(svc.remove_item(" eggs ").await.unwrap());
        let left = svc.snapshot().await.unwrap();
        assert_eq!(left.items.len(), 1);
        assert_eq!(left.items[0].text, "eggs");

        assert!(!svc.remove_item("bread").await.unwrap());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let (svc, root) = service("toggle");
        let item = svc.add_item("Butter", "t").await.unwrap();
        let once = svc.toggle_item(item.id).await.unwrap().unwrap();
        assert!(once.checked);
        let twice = svc.toggle_item(item.id).await.unwrap().unwrap();
        assert!(!twice.checked);
        assert_eq!(svc.toggle_item(ItemId(99)).await.unwrap(), None);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn mark_done_checks_first_match_only() {
        let (svc, root) = service("done");
        svc.add_item("Eggs", "t").await.unwrap();
        svc.add_item("eggs", "t").await.unwrap();

        let done = svc.mark_done("EGGS").await.unwrap().unwrap();
        assert_eq!(done.id, ItemId(1));
        // Already checked items stay checked.
        assert!(svc.mark_done("eggs").await.unwrap().unwrap().checked);

        let list = svc.snapshot().await.unwrap();
        assert!(list.items[0].checked);
        assert!(!list.items[1].checked);

        assert_eq!(svc.mark_done("Ham").await.unwrap(), None);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn clear_checked_keeps_unchecked_order() {
        let (svc, root) = service("clear-checked");
        for t in ["a", "b", "c", "d", "e"] {
            svc.add_item(t, "t").await.unwrap();
        }
        svc.toggle_item(ItemId(2)).await.unwrap();
        svc.toggle_item(ItemId(4)).await.unwrap();

        assert_eq!(svc.clear_checked().await.unwrap(), 2);
        let texts: Vec<_> = svc
            .snapshot()
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|i| i.text)
            .collect();
        assert_eq!(texts, vec!["a", "c", "e"]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn clear_all_resets_to_initial_state() {
        let (svc, root) = service("clear-all");
        svc.add_item("a", "t").await.unwrap();
        svc.clear_all().await.unwrap();
        let list = svc.snapshot().await.unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.last_updated, None);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn apply_dispatches_to_operations() {
        let (svc, root) = service("apply");
        let added = svc
            .apply(Mutation::Add {
                text: "Bread".to_string(),
                added_by: "Bob".to_string(),
            })
            .await
            .unwrap();
        let MutationOutcome::Added(item) = added else {
            panic!("expected Added, got {added:?}");
        };
        assert_eq!(
            svc.apply(Mutation::Toggle { id: item.id }).await.unwrap(),
            MutationOutcome::Toggled(Some(Item {
                checked: true,
                ..item.clone()
            }))
        );
        assert_eq!(
            svc.apply(Mutation::ClearChecked).await.unwrap(),
            MutationOutcome::ClearedChecked { removed: 1 }
        );
        assert_eq!(
            svc.apply(Mutation::Remove {
                text: "Bread".to_string()
            })
            .await
            .unwrap(),
            MutationOutcome::Removed(false)
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_are_not_lost() {
        let (svc, root) = service("concurrent");
        let mut handles = Vec::new();
        for n in 0..1000 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.add_item(&format!("item-{n}"), "load").await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let list = svc.snapshot().await.unwrap();
        assert_eq!(list.items.len(), 1000);
        let mut ids: Vec<_> = list.items.iter().map(|i| i.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
        let _ = std::fs::remove_dir_all(&root);
    }
}
