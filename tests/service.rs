use catlist::storage::{
    COMPLETED_ITEMS_KEY, KeyValueStore, MemoryStore, SqliteStore, StorageError, TODO_ITEMS_KEY,
};
use catlist::todo::{CategoryMap, EditTarget, TodoError, TodoService, filter};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::HashSet;

/// Memory store that refuses writes to selected keys.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: RefCell<HashSet<&'static str>>,
}

impl FlakyStore {
    fn fail(&self, key: &'static str) {
        self.failing.borrow_mut().insert(key);
    }

    fn heal(&self) {
        self.failing.borrow_mut().clear();
    }

    fn refuses(&self, key: &str) -> bool {
        self.failing.borrow().contains(key)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.refuses(key) {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        self.inner.set(key, value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        if let Some((key, _)) = entries.iter().find(|(key, _)| self.refuses(key)) {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        self.inner.set_many(entries)
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn add_to_empty_store() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "Buy milk").unwrap();

    assert_eq!(service.map().categories(), names(&["General"]).as_slice());
    assert_eq!(service.map().items("General").unwrap(), names(&["Buy milk"]).as_slice());
}

#[test]
fn edit_moves_item_and_prunes_source() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "Buy milk").unwrap();
    service
        .edit(&EditTarget::new("General", 0), "Buy oat milk", "Shop")
        .unwrap();

    assert_eq!(service.map().categories(), names(&["Shop"]).as_slice());
    assert_eq!(service.map().items("Shop").unwrap(), names(&["Buy oat milk"]).as_slice());
    assert!(service.map().items("General").is_none());
}

#[test]
fn complete_moves_item_to_log() {
    let mut service = TodoService::open(MemoryStore::new());
    let at = Utc.with_ymd_and_hms(2025, 1, 14, 18, 45, 0).unwrap();
    service.add("General", "A").unwrap();
    service.add("General", "B").unwrap();
    service.complete_at("General", 0, at).unwrap();

    assert_eq!(service.map().items("General").unwrap(), names(&["B"]).as_slice());
    let records = service.completed().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "A");
    assert_eq!(records[0].category, "General");
    assert_eq!(records[0].completed_at, at);
}

#[test]
fn remove_last_item_leaves_nothing() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "Task").unwrap();
    service.remove("General", 0).unwrap();

    assert!(service.map().categories().is_empty());
    assert_eq!(service.map(), &CategoryMap::new());
    assert!(service.completed().is_empty());
}

#[test]
fn complete_equals_remove_plus_one_record() {
    let mut completing = TodoService::open(MemoryStore::new());
    let mut removing = TodoService::open(MemoryStore::new());
    for service in [&mut completing, &mut removing] {
        service.add("Shop", "Bread").unwrap();
        service.add("Health", "Run").unwrap();
        service.add("Shop", "Eggs").unwrap();
    }

    completing.complete("Shop", 1).unwrap();
    removing.remove("Shop", 1).unwrap();

    assert_eq!(completing.map(), removing.map());
    assert_eq!(completing.completed().len(), 1);
    assert_eq!(completing.completed().records()[0].text, "Eggs");
    assert_eq!(completing.completed().records()[0].category, "Shop");
}

#[test]
fn validation_failure_changes_nothing() {
    let kv = MemoryStore::new();
    let mut service = TodoService::open(&kv);
    service.add("General", "keep").unwrap();
    let stored = kv.raw(TODO_ITEMS_KEY);

    let err = service.add("General", "").unwrap_err();
    assert!(err.is_validation());
    let err = service
        .edit(&EditTarget::new("General", 0), "", "General")
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(service.map().items("General").unwrap(), names(&["keep"]).as_slice());
    assert_eq!(kv.raw(TODO_ITEMS_KEY), stored);
}

#[test]
fn stale_targets_are_reported() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "only").unwrap();

    assert!(matches!(
        service.complete("General", 1),
        Err(TodoError::StaleReference { .. })
    ));
    assert!(matches!(
        service.remove("Shop", 0),
        Err(TodoError::StaleReference { .. })
    ));
    assert!(matches!(
        service.edit(&EditTarget::new("General", 3), "x", "Shop"),
        Err(TodoError::StaleReference { .. })
    ));
    assert_eq!(service.map().item_count(), 1);
    assert!(service.completed().is_empty());
}

#[test]
fn failed_write_keeps_memory_and_storage_intact() {
    let kv = FlakyStore::default();
    let mut service = TodoService::open(&kv);
    service.add("General", "A").unwrap();
    let stored = kv.inner.raw(TODO_ITEMS_KEY);
    let before = service.map().clone();

    kv.fail(TODO_ITEMS_KEY);
    assert!(matches!(service.add("Shop", "B"), Err(TodoError::Storage(_))));
    assert!(matches!(
        service.edit(&EditTarget::new("General", 0), "A2", "General"),
        Err(TodoError::Storage(_))
    ));
    assert!(matches!(service.remove("General", 0), Err(TodoError::Storage(_))));

    assert_eq!(service.map(), &before);
    assert_eq!(kv.inner.raw(TODO_ITEMS_KEY), stored);

    kv.heal();
    service.add("Shop", "B").unwrap();
    assert_eq!(service.map().item_count(), 2);
}

#[test]
fn failed_log_write_keeps_item_active() {
    let kv = FlakyStore::default();
    let mut service = TodoService::open(&kv);
    service.add("General", "Pay bills").unwrap();

    kv.fail(COMPLETED_ITEMS_KEY);
    let err = service.complete("General", 0).unwrap_err();
    assert!(matches!(err, TodoError::Storage(_)));

    assert_eq!(service.map().items("General").unwrap(), names(&["Pay bills"]).as_slice());
    assert!(service.completed().is_empty());

    let reopened = TodoService::open(&kv);
    assert_eq!(reopened.map().item_count(), 1);
    assert!(reopened.completed().is_empty());
}

#[test]
fn failed_items_write_during_complete_does_not_log() {
    let kv = FlakyStore::default();
    let mut service = TodoService::open(&kv);
    service.add("General", "Pay bills").unwrap();

    kv.fail(TODO_ITEMS_KEY);
    assert!(service.complete("General", 0).is_err());

    let reopened = TodoService::open(&kv);
    assert!(reopened.completed().is_empty());
    assert_eq!(reopened.map().item_count(), 1);
}

#[test]
fn completed_log_never_shrinks() {
    let mut service = TodoService::open(MemoryStore::new());
    for text in ["a", "b", "c", "d"] {
        service.add("General", text).unwrap();
    }

    let mut seen = 0;
    while !service.map().is_empty() {
        service.complete("General", 0).unwrap();
        assert!(service.completed().len() > seen);
        seen = service.completed().len();
    }
    assert_eq!(seen, 4);
    let texts: Vec<&str> = service
        .completed()
        .records()
        .iter()
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(texts, vec!["a", "b", "c", "d"]);
}

#[test]
fn state_survives_restart_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catlist.db");

    {
        let mut service = TodoService::open(SqliteStore::open(&path).unwrap());
        service.add("Personal", "Call grandma").unwrap();
        service.add("Business", "Send invoice").unwrap();
        service.add("Personal", "Book dentist").unwrap();
        service.complete("Business", 0).unwrap();
    }

    let service = TodoService::open(SqliteStore::open(&path).unwrap());
    assert_eq!(service.map().categories(), names(&["Personal"]).as_slice());
    assert_eq!(
        service.map().items("Personal").unwrap(),
        names(&["Call grandma", "Book dentist"]).as_slice()
    );
    assert_eq!(service.completed().records()[0].text, "Send invoice");
}

#[test]
fn whitespace_text_is_a_valid_item() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "   ").unwrap();
    assert_eq!(service.map().items("General").unwrap(), names(&["   "]).as_slice());
}

#[test]
fn legacy_whitespace_items_survive_load_and_write() {
    let kv = MemoryStore::with_value(TODO_ITEMS_KEY, r#"{"General":["  ","Buy milk"]}"#);
    let mut service = TodoService::open(&kv);
    assert_eq!(service.map().item_count(), 2);

    service.add("Shop", "Bread").unwrap();
    let reopened = TodoService::open(&kv);
    assert_eq!(
        reopened.map().items("General").unwrap(),
        names(&["  ", "Buy milk"]).as_slice()
    );
}

#[test]
fn padded_category_names_share_one_category() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("Shop ", "Bread").unwrap();
    service.add("Shop", "Milk").unwrap();

    assert_eq!(service.map().categories(), names(&["Shop"]).as_slice());
    assert_eq!(service.map().items("Shop").unwrap(), names(&["Bread", "Milk"]).as_slice());
}

/// Small deterministic generator so the operation mix is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

#[test]
fn invariant_holds_across_operation_mix() {
    const CATEGORIES: [&str; 5] = ["General", "Business", "Personal", "Shop", "Health"];
    let kv = MemoryStore::new();
    let mut service = TodoService::open(&kv);
    let mut rng = Lcg(7);
    let mut completed = 0;

    for step in 0..500 {
        let category = CATEGORIES[rng.next(CATEGORIES.len())];
        let existing = service.map().categories().to_vec();
        let pick = (!existing.is_empty()).then(|| {
            let name = existing[rng.next(existing.len())].clone();
            let len = service.map().items(&name).map_or(0, |items| items.len());
            let position = rng.next(len);
            (name, position)
        });

        match (rng.next(4), pick) {
            (0, _) | (_, None) => {
                service.add(category, &format!("item {step}")).unwrap();
            }
            (1, Some((name, position))) => {
                service
                    .edit(&EditTarget::new(name, position), &format!("edited {step}"), category)
                    .unwrap();
            }
            (2, Some((name, position))) => {
                service.remove(&name, position).unwrap();
            }
            (_, Some((name, position))) => {
                service.complete(&name, position).unwrap();
                completed += 1;
            }
        }

        assert!(service.map().is_consistent(), "invariant broken at step {step}");
        assert_eq!(service.completed().len(), completed);
        assert_eq!(TodoService::open(&kv).map(), service.map());
    }
}

#[test]
fn filter_is_sub_structure() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "Buy MILK").unwrap();
    service.add("Shop", "bread").unwrap();
    service.add("Shop", "milk chocolate").unwrap();

    let filtered = filter(service.map(), "mIlK");
    for (category, items) in filtered.iter() {
        let live = service.map().items(category).unwrap();
        for text in items {
            assert!(live.contains(text));
            assert!(text.to_lowercase().contains("milk"));
        }
    }
    assert_eq!(filtered.item_count(), 2);
    assert_eq!(filter(service.map(), ""), *service.map());
}
