use super::input::LineInput;
use super::mode::Mode;
use crate::config::Config;
use crate::storage::{KeyValueStore, SqliteStore, UiCache};
use crate::todo::change::last_landing_row;
use crate::todo::{CategoryMap, Change, EditTarget, FilteredView, ListLayout, TodoError, TodoResult, TodoService};
use crate::ui::theme::Theme;
use ratatui::widgets::ListState;
use std::time::Instant;
use tracing::{debug, error, warn};

const STATUS_MESSAGE_SECS: u64 = 3;

/// Text entry for a new item or an edit of an existing one.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub input: LineInput,
    pub category: String,
    /// Item being edited; `None` when adding
    pub target: Option<EditTarget>,
    /// Text of the edited item when the editor opened
    pub original: String,
}

impl EditSession {
    pub fn title(&self) -> &'static str {
        if self.target.is_some() { "Edit" } else { "Add" }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryPicker {
    pub categories: Vec<String>,
    pub selected: usize,
}

pub struct AppState<S: KeyValueStore = SqliteStore> {
    pub service: TodoService<S>,
    pub config: Config,
    pub theme: Theme,
    /// Layout of whatever is on screen: the live map or the search results
    pub layout: ListLayout,
    pub search: LineInput,
    pub filtered: Option<FilteredView>,
    /// Index of the selected item, counted across sections
    pub cursor: usize,
    pub mode: Mode,
    pub editor: Option<EditSession>,
    pub picker: Option<CategoryPicker>,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub status_message: Option<(String, Instant)>,
    pub list_state: ListState,
    pub done_state: ListState,
    pub terminal_height: u16,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(service: TodoService<S>, config: Config, theme: Theme, ui_cache: Option<UiCache>) -> Self {
        let layout = ListLayout::from_map(service.map());
        let mut state = Self {
            service,
            config,
            theme,
            layout,
            search: LineInput::default(),
            filtered: None,
            cursor: 0,
            mode: Mode::Navigate,
            editor: None,
            picker: None,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            status_message: None,
            list_state: ListState::default(),
            done_state: ListState::default(),
            terminal_height: 24,
        };

        if let Some(index) = ui_cache
            .and_then(|cache| cache.selected)
            .and_then(|target| state.index_of_target(&target))
        {
            state.cursor = index;
        }
        state.sync_list_state();
        state
    }

    pub fn visible_map(&self) -> &CategoryMap {
        match &self.filtered {
            Some(view) => view.map(),
            None => self.service.map(),
        }
    }

    pub fn is_filtering(&self) -> bool {
        self.filtered.as_ref().is_some_and(FilteredView::is_active)
    }

    /// Live-map address of the n-th visible item.
    pub fn target_at(&self, index: usize) -> Option<EditTarget> {
        let (section, row) = self.layout.item_at(index)?;
        let category = self.layout.title(section)?;
        match &self.filtered {
            Some(view) => view.origin(category, row),
            None => Some(EditTarget::new(category, row)),
        }
    }

    pub fn selected_target(&self) -> Option<EditTarget> {
        self.target_at(self.cursor)
    }

    pub fn selected_text(&self) -> Option<&str> {
        let (section, row) = self.layout.item_at(self.cursor)?;
        self.layout.text(section, row)
    }

    fn index_of_target(&self, target: &EditTarget) -> Option<usize> {
        (0..self.layout.row_count()).find(|&i| self.target_at(i).as_ref() == Some(target))
    }

    pub fn ui_cache(&self) -> UiCache {
        UiCache {
            selected: self.selected_target(),
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.sync_list_state();
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.layout.row_count() {
            self.cursor += 1;
        }
        self.sync_list_state();
    }

    pub fn move_cursor_top(&mut self) {
        self.cursor = 0;
        self.sync_list_state();
    }

    pub fn move_cursor_bottom(&mut self) {
        self.cursor = self.layout.row_count().saturating_sub(1);
        self.sync_list_state();
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.layout.row_count().saturating_sub(1));
        self.sync_list_state();
    }

    /// Point the list widget at the cursor, skipping section header lines.
    pub fn sync_list_state(&mut self) {
        let line = self
            .layout
            .item_at(self.cursor)
            .and_then(|(section, row)| self.layout.display_line(section, row));
        self.list_state.select(line);
    }

    fn rebuild_layout(&mut self) {
        self.layout = ListLayout::from_map(self.visible_map());
        self.clamp_cursor();
    }

    fn refresh_filter(&mut self) {
        self.filtered = if self.search.is_empty() {
            None
        } else {
            Some(self.service.search(self.search.text()))
        };
        self.rebuild_layout();
    }

    /// Bring the on-screen layout in line after a mutation.
    fn apply_changes(&mut self, changes: &[Change]) {
        if self.is_filtering() {
            self.refresh_filter();
            return;
        }

        if let Err(e) = self.layout.apply(changes) {
            warn!(error = %e, "list layout out of step, rebuilding");
            self.layout = ListLayout::from_map(self.service.map());
        }

        if let Some((section, row)) = last_landing_row(changes)
            && let Some(index) = self.layout.index_of(section, row)
        {
            self.cursor = index;
        }
        self.clamp_cursor();
    }

    /// Apply a mutation outcome to the screen.
    fn settle(&mut self, result: TodoResult<Vec<Change>>, success: &str) {
        match result {
            Ok(changes) => {
                debug!(changes = changes.len(), "mutation applied");
                self.apply_changes(&changes);
                self.set_status_message(success.to_string());
            }
            Err(TodoError::EmptyText) => {
                self.set_status_message("You didn't enter any text".to_string());
            }
            Err(TodoError::EmptyCategory) => {
                self.set_status_message("Pick a category first".to_string());
            }
            Err(e @ TodoError::StaleReference { .. }) => {
                warn!(error = %e, "mutation targeted a missing item");
                self.refresh_filter();
                self.set_status_message("That item no longer exists".to_string());
            }
            Err(TodoError::Storage(e)) => {
                error!(error = %e, "write-through failed, change discarded");
                self.set_status_message(format!("Could not save: {e}"));
            }
        }
    }

    pub fn begin_add(&mut self) {
        self.editor = Some(EditSession {
            input: LineInput::default(),
            category: self.config.default_category().to_string(),
            target: None,
            original: String::new(),
        });
        self.mode = Mode::Edit;
    }

    pub fn begin_edit(&mut self) {
        let Some(target) = self.selected_target() else {
            return;
        };
        let Some(text) = self.service.map().get(&target) else {
            return;
        };
        self.editor = Some(EditSession {
            input: LineInput::new(text),
            category: target.category.clone(),
            target: Some(target),
            original: text.to_string(),
        });
        self.mode = Mode::Edit;
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
        self.picker = None;
        self.mode = Mode::Navigate;
    }

    /// Save the open editor. Stays in the editor when the text is rejected.
    pub fn save_editor(&mut self) {
        let Some(session) = self.editor.take() else {
            self.mode = Mode::Navigate;
            return;
        };

        let text = session.input.text();
        let result = match &session.target {
            Some(target) => match self.locate_for_write(target, &session.original) {
                Some(target) => self.service.edit(&target, text, &session.category),
                None => {
                    self.mode = Mode::Navigate;
                    return;
                }
            },
            None => {
                self.sync_before_write();
                self.service.add(&session.category, text)
            }
        };
        let keep_editing = matches!(&result, Err(e) if e.is_validation());
        let message = if session.target.is_some() { "Saved" } else { "Added" };

        self.settle(result, message);
        if keep_editing {
            self.editor = Some(session);
        } else {
            self.mode = Mode::Navigate;
        }
    }

    pub fn open_picker(&mut self) {
        let Some(session) = &self.editor else {
            return;
        };
        let categories = self.config.picker_categories(self.service.map());
        let selected = categories
            .iter()
            .position(|c| *c == session.category)
            .unwrap_or(0);
        self.picker = Some(CategoryPicker {
            categories,
            selected,
        });
        self.mode = Mode::PickCategory;
    }

    pub fn picker_up(&mut self) {
        if let Some(picker) = &mut self.picker {
            picker.selected = picker.selected.saturating_sub(1);
        }
    }

    pub fn picker_down(&mut self) {
        if let Some(picker) = &mut self.picker
            && picker.selected + 1 < picker.categories.len()
        {
            picker.selected += 1;
        }
    }

    pub fn confirm_picker(&mut self) {
        if let Some(picker) = self.picker.take()
            && let Some(choice) = picker.categories.get(picker.selected)
            && let Some(session) = &mut self.editor
        {
            session.category = choice.clone();
        }
        self.mode = Mode::Edit;
    }

    pub fn cancel_picker(&mut self) {
        self.picker = None;
        self.mode = Mode::Edit;
    }

    /// Another process may have written since the last reload. Writing the
    /// in-memory map as-is would drop its changes.
    fn sync_before_write(&mut self) {
        if self.service.sync() {
            self.refresh_filter();
        }
    }

    /// Find `text` again after a resync, preferring its old position.
    fn relocate(&self, target: &EditTarget, text: &str) -> Option<EditTarget> {
        let items = self.service.map().items(&target.category)?;
        if items.get(target.position).is_some_and(|t| t == text) {
            return Some(target.clone());
        }
        items
            .iter()
            .position(|t| t == text)
            .map(|position| EditTarget::new(target.category.as_str(), position))
    }

    fn report_gone(&mut self, target: &EditTarget) {
        warn!(category = %target.category, position = target.position, "selected item is gone");
        self.refresh_filter();
        self.set_status_message("That item no longer exists".to_string());
    }

    fn locate_for_write(&mut self, target: &EditTarget, text: &str) -> Option<EditTarget> {
        self.sync_before_write();
        let found = self.relocate(target, text);
        if found.is_none() {
            self.report_gone(target);
        }
        found
    }

    /// Selected item resolved against fresh storage.
    fn selected_for_write(&mut self) -> Option<EditTarget> {
        let target = self.selected_target()?;
        let Some(text) = self.service.map().get(&target).map(str::to_string) else {
            self.report_gone(&target);
            return None;
        };
        self.locate_for_write(&target, &text)
    }

    pub fn complete_selected(&mut self) {
        let Some(target) = self.selected_for_write() else {
            return;
        };
        let result = self.service.complete(&target.category, target.position);
        self.settle(result, "Moved to the Done List");
    }

    /// Delete forgets the item; nothing is logged.
    pub fn delete_selected(&mut self) {
        let Some(target) = self.selected_for_write() else {
            return;
        };
        let result = self.service.remove(&target.category, target.position);
        self.settle(result, "Deleted");
    }

    pub fn start_search(&mut self) {
        self.search.end();
        self.mode = Mode::Search;
    }

    pub fn search_changed(&mut self) {
        self.refresh_filter();
        self.move_cursor_top();
    }

    pub fn finish_search(&mut self) {
        self.mode = Mode::Navigate;
    }

    pub fn clear_search(&mut self) {
        let selected = self.selected_target();
        self.search.clear();
        self.refresh_filter();
        if let Some(index) = selected.and_then(|t| self.index_of_target(&t)) {
            self.cursor = index;
            self.sync_list_state();
        }
        self.mode = Mode::Navigate;
    }

    pub fn open_done_list(&mut self) {
        let count = self.service.completed().len();
        self.done_state.select(count.checked_sub(1));
        self.mode = Mode::DoneList;
    }

    pub fn close_done_list(&mut self) {
        self.mode = Mode::Navigate;
    }

    pub fn done_up(&mut self) {
        if let Some(i) = self.done_state.selected() {
            self.done_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn done_down(&mut self) {
        let count = self.service.completed().len();
        if let Some(i) = self.done_state.selected()
            && i + 1 < count
        {
            self.done_state.select(Some(i + 1));
        }
    }

    /// Re-read storage after another process wrote to it.
    pub fn reload_from_storage(&mut self) {
        let selected = self.selected_target();
        self.service.reload();
        self.refresh_filter();
        if let Some(index) = selected.and_then(|t| self.index_of_target(&t)) {
            self.cursor = index;
            self.sync_list_state();
        }
        debug!(items = self.service.map().item_count(), "reloaded from storage");
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn clear_expired_status_message(&mut self) {
        if let Some((_, time)) = &self.status_message
            && time.elapsed().as_secs() > STATUS_MESSAGE_SECS
        {
            self.status_message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn state_with(items: &[(&str, &str)]) -> AppState<MemoryStore> {
        let mut service = TodoService::open(MemoryStore::new());
        for (category, text) in items {
            service.add(category, text).unwrap();
        }
        AppState::new(service, Config::default(), Theme::default(), None)
    }

    fn type_text<S: KeyValueStore>(state: &mut AppState<S>, text: &str) {
        let session = state.editor.as_mut().unwrap();
        for c in text.chars() {
            session.input.insert(c);
        }
    }

    fn type_query(state: &mut AppState<MemoryStore>, text: &str) {
        state.start_search();
        for c in text.chars() {
            state.search.insert(c);
        }
        state.search_changed();
    }

    #[test]
    fn test_add_goes_to_default_category_and_selects_it() {
        let mut state = state_with(&[("Shop", "Bread")]);
        state.begin_add();
        type_text(&mut state, "Buy milk");
        state.save_editor();

        assert_eq!(state.mode, Mode::Navigate);
        assert!(state.editor.is_none());
        assert_eq!(state.service.map().items("General").unwrap(), &["Buy milk".to_string()]);
        assert_eq!(state.selected_text(), Some("Buy milk"));
        assert_eq!(state.layout, ListLayout::from_map(state.service.map()));
    }

    #[test]
    fn test_empty_text_keeps_editor_open() {
        let mut state = state_with(&[]);
        state.begin_add();
        state.save_editor();

        assert_eq!(state.mode, Mode::Edit);
        assert!(state.editor.is_some());
        assert!(state.service.map().is_empty());
        let (message, _) = state.status_message.as_ref().unwrap();
        assert_eq!(message, "You didn't enter any text");
    }

    #[test]
    fn test_edit_with_picker_moves_item() {
        let mut state = state_with(&[("General", "Buy milk")]);
        state.begin_edit();
        assert_eq!(state.editor.as_ref().unwrap().title(), "Edit");

        let session = state.editor.as_mut().unwrap();
        session.input.clear();
        type_text(&mut state, "Buy oat milk");

        state.open_picker();
        assert_eq!(state.mode, Mode::PickCategory);
        for _ in 0..3 {
            state.picker_down();
        }
        state.confirm_picker();
        assert_eq!(state.editor.as_ref().unwrap().category, "Shop");
        state.save_editor();

        assert_eq!(state.service.map().categories(), &["Shop".to_string()]);
        assert_eq!(state.selected_text(), Some("Buy oat milk"));
    }

    #[test]
    fn test_complete_and_delete_selected() {
        let mut state = state_with(&[("General", "A"), ("General", "B"), ("Shop", "C")]);
        state.move_cursor_down();
        state.complete_selected();

        assert_eq!(state.service.completed().records()[0].text, "B");
        assert_eq!(state.service.map().items("General").unwrap(), &["A".to_string()]);

        state.move_cursor_bottom();
        state.delete_selected();
        assert!(state.service.map().items("Shop").is_none());
        assert_eq!(state.service.completed().len(), 1);
        assert_eq!(state.layout, ListLayout::from_map(state.service.map()));
    }

    #[test]
    fn test_actions_from_search_results_hit_live_items() {
        let mut state = state_with(&[
            ("General", "Walk dog"),
            ("General", "Buy milk"),
            ("Shop", "Bread"),
            ("Shop", "Milk chocolate"),
        ]);
        type_query(&mut state, "milk");
        state.finish_search();

        assert!(state.is_filtering());
        assert_eq!(state.layout.row_count(), 2);
        assert_eq!(state.selected_target(), Some(EditTarget::new("General", 1)));

        state.move_cursor_down();
        state.complete_selected();

        assert_eq!(state.service.completed().records()[0].text, "Milk chocolate");
        assert_eq!(state.service.map().items("Shop").unwrap(), &["Bread".to_string()]);
        assert_eq!(state.layout.row_count(), 1);

        state.clear_search();
        assert!(!state.is_filtering());
        assert_eq!(state.layout.row_count(), 3);
    }

    #[test]
    fn test_cursor_restored_from_cache() {
        let mut service = TodoService::open(MemoryStore::new());
        service.add("General", "A").unwrap();
        service.add("Shop", "B").unwrap();
        let cache = UiCache {
            selected: Some(EditTarget::new("Shop", 0)),
        };

        let state = AppState::new(service, Config::default(), Theme::default(), Some(cache));
        assert_eq!(state.cursor, 1);
        assert_eq!(state.list_state.selected(), Some(3));
        assert_eq!(state.ui_cache().selected, Some(EditTarget::new("Shop", 0)));
    }

    #[test]
    fn test_done_list_selection_bounds() {
        let mut state = state_with(&[("General", "A"), ("General", "B")]);
        state.complete_selected();
        state.complete_selected();

        state.open_done_list();
        assert_eq!(state.mode, Mode::DoneList);
        assert_eq!(state.done_state.selected(), Some(1));
        state.done_down();
        assert_eq!(state.done_state.selected(), Some(1));
        state.done_up();
        state.done_up();
        assert_eq!(state.done_state.selected(), Some(0));
        state.close_done_list();
        assert_eq!(state.mode, Mode::Navigate);
    }

    #[test]
    fn test_add_keeps_items_written_by_another_process() {
        let kv = MemoryStore::new();
        let mut state = AppState::new(TodoService::open(&kv), Config::default(), Theme::default(), None);

        let mut other = TodoService::open(&kv);
        other.add("Shop", "Bread").unwrap();

        state.begin_add();
        type_text(&mut state, "Buy milk");
        state.save_editor();

        let stored = TodoService::open(&kv);
        assert_eq!(stored.map().items("Shop").unwrap(), &["Bread".to_string()]);
        assert_eq!(stored.map().items("General").unwrap(), &["Buy milk".to_string()]);
        assert_eq!(state.layout, ListLayout::from_map(state.service.map()));
    }

    #[test]
    fn test_complete_follows_item_shifted_by_another_process() {
        let kv = MemoryStore::new();
        let mut service = TodoService::open(&kv);
        service.add("General", "A").unwrap();
        service.add("General", "B").unwrap();
        let mut state = AppState::new(service, Config::default(), Theme::default(), None);
        state.move_cursor_down();

        let mut other = TodoService::open(&kv);
        other.remove("General", 0).unwrap();

        state.complete_selected();
        assert_eq!(state.service.completed().records()[0].text, "B");
        assert!(state.service.map().is_empty());
        assert!(TodoService::open(&kv).map().is_empty());
    }

    #[test]
    fn test_edit_of_item_deleted_elsewhere_is_refused() {
        let kv = MemoryStore::new();
        let mut service = TodoService::open(&kv);
        service.add("General", "A").unwrap();
        let mut state = AppState::new(service, Config::default(), Theme::default(), None);
        state.begin_edit();

        let mut other = TodoService::open(&kv);
        other.remove("General", 0).unwrap();

        type_text(&mut state, "!");
        state.save_editor();

        assert_eq!(state.mode, Mode::Navigate);
        assert!(state.service.map().is_empty());
        let (message, _) = state.status_message.as_ref().unwrap();
        assert_eq!(message, "That item no longer exists");
    }

    #[test]
    fn test_stale_selection_reports_and_recovers() {
        let mut state = state_with(&[("General", "A")]);
        state.layout = ListLayout::from_map(&{
            let mut ghost = CategoryMap::new();
            ghost.add("Ghost", "gone").unwrap();
            ghost
        });

        state.delete_selected();
        let (message, _) = state.status_message.as_ref().unwrap();
        assert_eq!(message, "That item no longer exists");
        assert_eq!(state.layout, ListLayout::from_map(state.service.map()));
    }
}
