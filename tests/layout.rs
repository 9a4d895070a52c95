use catlist::storage::MemoryStore;
use catlist::todo::{Change, EditTarget, ListLayout, TodoService};
use pretty_assertions::assert_eq;

fn replay(service: &TodoService<MemoryStore>, layout: &mut ListLayout, changes: &[Change]) {
    layout.apply(changes).unwrap();
    assert_eq!(*layout, ListLayout::from_map(service.map()));
}

#[test]
fn changes_keep_layout_in_step_with_map() {
    let mut service = TodoService::open(MemoryStore::new());
    let mut layout = ListLayout::from_map(service.map());

    let changes = service.add("General", "Buy milk").unwrap();
    replay(&service, &mut layout, &changes);

    let changes = service.add("Shop", "Bread").unwrap();
    replay(&service, &mut layout, &changes);

    let changes = service.add("General", "Walk dog").unwrap();
    replay(&service, &mut layout, &changes);

    let changes = service
        .edit(&EditTarget::new("General", 1), "Walk the dog", "General")
        .unwrap();
    assert_eq!(
        changes,
        vec![Change::ReloadRow {
            section: 0,
            row: 1,
            text: "Walk the dog".to_string()
        }]
    );
    replay(&service, &mut layout, &changes);

    let changes = service
        .edit(&EditTarget::new("Shop", 0), "Bread", "Health")
        .unwrap();
    assert_eq!(
        changes,
        vec![
            Change::DeleteRow { section: 1, row: 0 },
            Change::DeleteSection { section: 1 },
            Change::InsertSection {
                section: 1,
                title: "Health".to_string()
            },
            Change::InsertRow {
                section: 1,
                row: 0,
                text: "Bread".to_string()
            },
        ]
    );
    replay(&service, &mut layout, &changes);

    let changes = service.complete("General", 0).unwrap();
    replay(&service, &mut layout, &changes);

    let changes = service.remove("General", 0).unwrap();
    replay(&service, &mut layout, &changes);

    let changes = service.remove("Health", 0).unwrap();
    replay(&service, &mut layout, &changes);
    assert!(layout.is_empty());
}

#[test]
fn moving_into_earlier_section_after_prune() {
    let mut service = TodoService::open(MemoryStore::new());
    service.add("General", "a").unwrap();
    service.add("Shop", "b").unwrap();
    service.add("Health", "c").unwrap();
    let mut layout = ListLayout::from_map(service.map());

    let changes = service
        .edit(&EditTarget::new("General", 0), "a", "Health")
        .unwrap();
    replay(&service, &mut layout, &changes);
    assert_eq!(layout.title(0), Some("Shop"));
    assert_eq!(layout.text(1, 1), Some("a"));
}
