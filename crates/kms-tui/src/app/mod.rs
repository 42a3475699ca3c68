//! Main application state and logic.

mod constants;
pub mod navigation;
mod render;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use kms_core::{ClickKind, ElementId, ElementStore, ExplorerConfig, KmsError, SortKey};
use kms_explorer::{
    CrumbKind, FetchRequest, FolderHeader, FolderRow, FolderTree, KnowledgeTable,
    NavigationContext, NodeState,
};
use kms_ops::{DeleteResult, OperationComplete, OperationProgress, SharedBackend, start_bulk_delete, start_move};

use crate::event::KeyAction;
use crate::theme::Theme;

use self::constants::{MESSAGE_CHANNEL_SIZE, TICK_INTERVAL_MS};
use self::navigation::{ListCursor, ListNavigator};
use self::state::{AppMessage, AppMode, DragState, Focus};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Main application state.
pub struct App {
    backend: SharedBackend,
    config: ExplorerConfig,
    mode: AppMode,
    focus: Focus,
    theme: Theme,
    store: ElementStore,
    ctx: NavigationContext,
    tree: FolderTree,
    header: FolderHeader,
    table: KnowledgeTable,
    /// Cached flattened tree, rebuilt after every state change.
    tree_rows: Vec<FolderRow>,
    tree_cursor: ListCursor,
    table_cursor: ListCursor,
    /// Folder whose listing the table shows. `None` until the first load.
    table_folder: Option<Option<ElementId>>,
    table_token: u64,
    table_loading: bool,
    drag: Option<DragState>,
    delete_progress: Option<OperationProgress>,
    msg_tx: mpsc::Sender<AppMessage>,
    msg_rx: mpsc::Receiver<AppMessage>,
    /// Last status message and whether it reports success.
    status: Option<(bool, String)>,
    needs_redraw: bool,
}

impl App {
    /// Create a new application over `backend`.
    pub fn new(backend: SharedBackend, config: ExplorerConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_SIZE);
        Self {
            backend,
            tree: FolderTree::new(&config),
            header: FolderHeader::new(&config),
            config,
            mode: AppMode::Normal,
            focus: Focus::Tree,
            theme: Theme::default(),
            store: ElementStore::new(),
            ctx: NavigationContext::mounted(),
            table: KnowledgeTable::new(),
            tree_rows: Vec::new(),
            tree_cursor: ListCursor::default(),
            table_cursor: ListCursor::default(),
            table_folder: None,
            table_token: 0,
            table_loading: false,
            drag: None,
            delete_progress: None,
            msg_tx,
            msg_rx,
            status: None,
            needs_redraw: true,
        }
    }

    /// Run the application with async event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        self.start();

        let period = Duration::from_millis(TICK_INTERVAL_MS);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while self.mode != AppMode::Quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key_event) = event {
                        self.handle_key(key_event);
                    }

                    // Drain any additional pending events
                    while self.mode != AppMode::Quit && crossterm::event::poll(Duration::ZERO)? {
                        if let Event::Key(key_event) = crossterm::event::read()? {
                            self.handle_key(key_event);
                        }
                    }
                    self.needs_redraw = true;
                }

                Some(message) = self.msg_rx.recv() => {
                    self.handle_message(message);
                    self.after_action();
                    self.needs_redraw = true;
                }

                _ = interval.tick() => {}
            }
        }

        Ok(())
    }

    /// Request the root listing and the table's first listing.
    fn start(&mut self) {
        if let Some(request) = self.tree.load_root() {
            self.spawn_tree_fetch(request);
        }
        self.after_action();
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(self, area);
    }

    fn spawn_tree_fetch(&self, request: FetchRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_children(request.folder).await;
            let _ = tx.send(AppMessage::TreeListing { request, result }).await;
        });
    }

    /// Load the listing of the current folder into the table.
    fn load_table(&mut self) {
        let folder = self.ctx.current_folder();
        self.table_token += 1;
        self.table_folder = Some(folder);
        self.table_loading = true;

        let token = self.table_token;
        let backend = Arc::clone(&self.backend);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_children(folder).await;
            let _ = tx
                .send(AppMessage::TableListing {
                    folder,
                    token,
                    result,
                })
                .await;
        });
    }

    /// Forward a background receiver into the message channel.
    fn forward<T, F>(&self, mut rx: mpsc::Receiver<T>, wrap: F)
    where
        T: Send + 'static,
        F: Fn(T) -> AppMessage + Send + 'static,
    {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                if tx.send(wrap(item)).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Apply a result from a background task.
    fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::TreeListing { request, result } => {
                self.tree.complete_fetch(&mut self.store, request, result);
                self.table.refresh(&self.store);
            }
            AppMessage::TableListing {
                folder,
                token,
                result,
            } => {
                if token != self.table_token {
                    debug!(?folder, token, "ignoring stale table listing");
                    return;
                }
                self.table_loading = false;
                match result {
                    Ok(listing) => {
                        let ids = self.store.ingest_listing(folder, listing);
                        let removed = self.store.prune_children(folder, &ids);
                        self.tree.forget(&removed);
                        self.table.set_elements(ids, &self.store);
                    }
                    Err(source) => {
                        let error = KmsError::fetch(folder, source);
                        warn!(error = %error, "table listing failed");
                        self.status = Some((false, error.to_string()));
                        self.table.set_error(error);
                    }
                }
            }
            AppMessage::Delete(DeleteResult::Progress(progress)) => {
                self.delete_progress = Some(progress);
            }
            AppMessage::Delete(DeleteResult::Complete(complete)) => {
                self.finish_delete(complete);
            }
            AppMessage::Move(complete) => self.finish_move(complete),
        }
    }

    /// Bring derived state up to date after any action or message.
    fn after_action(&mut self) {
        if self.ctx.take_refetch() {
            for request in self.tree.refresh() {
                self.spawn_tree_fetch(request);
            }
            self.load_table();
        } else if self.table_folder != Some(self.ctx.current_folder()) {
            self.table_cursor.jump_to_top();
            self.load_table();
        }

        self.tree_rows = self.tree.visible_rows(&self.store, &self.ctx);
        self.tree_cursor.set_count(self.tree_rows.len());
        self.table_cursor.set_count(self.table.visible().len());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.mode == AppMode::Search {
            self.handle_search_input(key);
        } else {
            self.handle_action(KeyAction::from_key_event(key));
        }
        self.after_action();
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        let mut query = self.table.search().to_string();
        match key.code {
            KeyCode::Esc => {
                query.clear();
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => return,
        }
        self.table.set_search(query, &self.store);
        self.table_cursor.jump_to_top();
    }

    /// Handle a key action.
    fn handle_action(&mut self, action: KeyAction) {
        match self.mode {
            AppMode::Help => {
                if matches!(
                    action,
                    KeyAction::ToggleHelp | KeyAction::Quit | KeyAction::Cancel
                ) {
                    self.mode = AppMode::Normal;
                }
                return;
            }
            AppMode::ConfirmDelete => {
                match action {
                    KeyAction::Confirm | KeyAction::Activate => self.execute_delete(),
                    KeyAction::Quit | KeyAction::Cancel => self.mode = AppMode::Normal,
                    _ => {}
                }
                return;
            }
            AppMode::Deleting => return,
            AppMode::Dragging => {
                self.handle_drag_action(action);
                return;
            }
            _ => {}
        }

        self.status = None;
        match action {
            KeyAction::Quit | KeyAction::ForceQuit => self.mode = AppMode::Quit,
            KeyAction::Cancel => self.table.set_all_checked(false),

            KeyAction::MoveUp => self.cursor_mut().move_up(1),
            KeyAction::MoveDown => self.cursor_mut().move_down(1),
            KeyAction::PageUp => self.cursor_mut().page_up(),
            KeyAction::PageDown => self.cursor_mut().page_down(),
            KeyAction::JumpToTop => self.cursor_mut().jump_to_top(),
            KeyAction::JumpToBottom => self.cursor_mut().jump_to_bottom(),

            KeyAction::MoveRight => match self.focus {
                Focus::Tree => {
                    if let Some(id) = self.tree_row_id() {
                        self.expand(id);
                    }
                }
                Focus::Table => self.open_table_folder(),
            },
            KeyAction::MoveLeft => match self.focus {
                Focus::Tree => self.collapse_or_parent(),
                Focus::Table => self.navigate_back(),
            },
            KeyAction::ToggleExpand => {
                if let Some(id) = self.tree_row_id() {
                    if let Some(request) = self.tree.toggle(id) {
                        self.spawn_tree_fetch(request);
                    }
                }
            }
            KeyAction::Activate => match self.focus {
                Focus::Tree => {
                    if let Some(id) = self.tree_row_id() {
                        self.select_folder(id);
                    }
                }
                Focus::Table => {
                    if self.table_row_is_folder() {
                        self.open_table_folder();
                    } else {
                        self.table.click(self.table_cursor.selected(), ClickKind::Plain);
                    }
                }
            },
            KeyAction::NavigateBack => self.navigate_back(),
            KeyAction::NavigateRoot => self.header.click_root(&mut self.ctx),

            KeyAction::ToggleMark if self.focus == Focus::Table => {
                self.table.click(self.table_cursor.selected(), ClickKind::Toggle);
            }
            KeyAction::RangeMark if self.focus == Focus::Table => {
                self.table.click(self.table_cursor.selected(), ClickKind::Range);
            }
            KeyAction::SelectAll => {
                let checked = !self.table.all_checked();
                self.table.set_all_checked(checked);
            }
            KeyAction::Delete => self.confirm_delete(),
            KeyAction::PickUp => self.pick_up(),

            KeyAction::Search => {
                self.focus = Focus::Table;
                self.mode = AppMode::Search;
            }
            KeyAction::SortByName => self.table.toggle_sort(SortKey::Name, &self.store),
            KeyAction::SortByStatus => self.table.toggle_sort(SortKey::Status, &self.store),

            KeyAction::SwitchFocus => self.focus = self.focus.next(),
            KeyAction::ToggleHelp => self.mode = AppMode::Help,
            KeyAction::ToggleTheme => self.theme = self.theme.toggle(),
            KeyAction::Refresh => self.ctx.request_refetch(),

            _ => {}
        }
    }

    fn cursor_mut(&mut self) -> &mut ListCursor {
        match self.focus {
            Focus::Tree => &mut self.tree_cursor,
            Focus::Table => &mut self.table_cursor,
        }
    }

    fn tree_row_id(&self) -> Option<ElementId> {
        self.tree_rows.get(self.tree_cursor.selected()).map(|r| r.id)
    }

    fn table_row_id(&self) -> Option<ElementId> {
        self.table.visible().get(self.table_cursor.selected()).copied()
    }

    fn table_row_is_folder(&self) -> bool {
        self.table_row_id()
            .and_then(|id| self.store.get(id))
            .is_some_and(|e| e.is_folder)
    }

    fn expand(&mut self, id: ElementId) {
        if let Some(request) = self.tree.expand(id) {
            self.spawn_tree_fetch(request);
        }
    }

    /// Left in the tree: collapse an open folder, or jump to the parent row.
    fn collapse_or_parent(&mut self) {
        let index = self.tree_cursor.selected();
        let Some(row) = self.tree_rows.get(index) else {
            return;
        };
        if row.state != NodeState::Collapsed {
            self.tree.collapse(row.id);
        } else if row.depth > 0 {
            let depth = row.depth;
            if let Some(parent) = self.tree_rows[..index]
                .iter()
                .rposition(|r| r.depth + 1 == depth)
            {
                self.tree_cursor.set_selected(parent);
            }
        }
    }

    fn select_folder(&mut self, id: ElementId) {
        if let Err(err) = self.tree.select_label(&self.store, &mut self.ctx, id) {
            self.status = Some((false, err.to_string()));
        }
    }

    fn open_table_folder(&mut self) {
        if let Some(id) = self.table_row_id().filter(|_| self.table_row_is_folder()) {
            self.select_folder(id);
            self.expand(id);
        }
    }

    /// Parent crumb click, or root crumb click at the top level.
    fn navigate_back(&mut self) {
        let crumbs = self.header.crumbs(&self.ctx, &self.store);
        if let Some(crumb) = crumbs
            .iter()
            .find(|c| matches!(c.kind, CrumbKind::Root | CrumbKind::Parent))
        {
            self.header.click(crumb, &mut self.ctx, &self.store);
        }
    }

    fn confirm_delete(&mut self) {
        if !self.table.delete_enabled() {
            self.status = Some((false, "Nothing selected".to_string()));
        } else if self.table.delete_batch().is_empty() {
            self.status = Some((false, "Selected items are hidden by the search".to_string()));
        } else {
            self.mode = AppMode::ConfirmDelete;
        }
    }

    fn execute_delete(&mut self) {
        let batch = self.table.take_delete_batch();
        debug!(count = batch.len(), "starting bulk delete");
        self.delete_progress = None;
        self.mode = AppMode::Deleting;
        let rx = start_bulk_delete(Arc::clone(&self.backend), batch);
        self.forward(rx, AppMessage::Delete);
    }

    fn finish_delete(&mut self, complete: OperationComplete) {
        let removed = self
            .table
            .apply_deleted(&complete, &mut self.store, &mut self.ctx);
        self.tree.forget(&removed);
        for error in &complete.errors {
            warn!(error = %error, "delete failed");
        }
        self.status = Some((complete.is_success(), complete.summary()));
        self.delete_progress = None;
        self.mode = AppMode::Normal;
    }

    /// Pick up the element under the cursor and start choosing a target.
    fn pick_up(&mut self) {
        let dragged = match self.focus {
            Focus::Tree => self.tree_row_id(),
            Focus::Table => self.table_row_id(),
        };
        let Some(dragged) = dragged else {
            return;
        };
        let name = self
            .store
            .get(dragged)
            .map(|e| e.display_name().to_string())
            .unwrap_or_default();
        self.drag = Some(DragState {
            dragged,
            over: None,
        });
        self.mode = AppMode::Dragging;
        self.focus = Focus::Tree;
        self.update_drag_target();
        self.status = Some((true, format!("Moving {name}: pick a folder, Enter to drop")));
    }

    fn handle_drag_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::MoveUp => self.tree_cursor.move_up(1),
            KeyAction::MoveDown => self.tree_cursor.move_down(1),
            KeyAction::MoveRight => {
                if let Some(id) = self.tree_row_id() {
                    self.expand(id);
                }
            }
            KeyAction::MoveLeft => self.collapse_or_parent(),
            KeyAction::Activate | KeyAction::Confirm => {
                self.drop_dragged();
                return;
            }
            KeyAction::Cancel | KeyAction::Quit => {
                self.cancel_drag();
                return;
            }
            _ => return,
        }
        self.tree_rows = self.tree.visible_rows(&self.store, &self.ctx);
        self.tree_cursor.set_count(self.tree_rows.len());
        self.update_drag_target();
    }

    /// Highlight the folder row under the cursor as the drop target.
    fn update_drag_target(&mut self) {
        let Some(mut drag) = self.drag else {
            return;
        };
        let row = self.tree_row_id();
        if drag.over == row {
            return;
        }
        if let Some(old) = drag.over.take() {
            self.tree.drag_leave(old);
        }
        if let Some(id) = row {
            if self.tree.drag_enter(&self.store, id) {
                drag.over = Some(id);
            }
        }
        self.drag = Some(drag);
    }

    fn cancel_drag(&mut self) {
        if let Some(over) = self.drag.take().and_then(|d| d.over) {
            self.tree.drag_leave(over);
        }
        self.mode = AppMode::Normal;
        self.status = None;
    }

    fn drop_dragged(&mut self) {
        let Some(drag) = self.drag.take() else {
            self.mode = AppMode::Normal;
            return;
        };
        self.mode = AppMode::Normal;
        let Some(target) = drag.over.or_else(|| self.tree_row_id()) else {
            self.status = None;
            return;
        };
        match self.tree.prepare_drop(&self.store, drag.dragged, target) {
            Ok(request) => {
                debug!(id = %request.id, target = %request.target, "dropping element");
                let rx = start_move(Arc::clone(&self.backend), request.id, Some(request.target));
                self.forward(rx, AppMessage::Move);
                self.status = Some((true, "Moving...".to_string()));
            }
            Err(err) => self.status = Some((false, err.to_string())),
        }
    }

    fn finish_move(&mut self, complete: OperationComplete) {
        if let Some(error) = complete.errors.first() {
            self.status = Some((false, error.to_string()));
        } else {
            self.status = Some((true, complete.summary()));
            self.ctx.request_refetch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kms_ops::MemoryBackend;

    fn app() -> App {
        App::new(Arc::new(MemoryBackend::sample()), ExplorerConfig::default())
    }

    /// Apply background results until the channel goes quiet.
    async fn settle(app: &mut App) {
        while let Ok(Some(message)) =
            tokio::time::timeout(Duration::from_millis(200), app.msg_rx.recv()).await
        {
            app.handle_message(message);
            app.after_action();
        }
    }

    fn tree_labels(app: &App) -> Vec<String> {
        app.tree_rows.iter().map(|r| r.label.clone()).collect()
    }

    #[tokio::test]
    async fn test_tree_scroll_offset_survives_redraw() {
        use ratatui::buffer::Buffer;
        use ratatui::layout::Rect;
        use ratatui::widgets::Widget;

        let mut app = app();
        app.start();
        settle(&mut app).await;
        app.handle_action(KeyAction::MoveRight);
        settle(&mut app).await;
        assert_eq!(app.tree_rows.len(), 5);

        // Eight lines leave four tree rows inside the borders.
        let area = Rect::new(0, 0, 80, 8);
        app.handle_action(KeyAction::JumpToBottom);
        Widget::render(&mut app, area, &mut Buffer::empty(area));
        assert_eq!(app.tree_cursor.offset(), 1);

        // Moving back up inside the viewport does not scroll.
        app.handle_action(KeyAction::MoveUp);
        app.handle_action(KeyAction::MoveUp);
        app.handle_action(KeyAction::MoveUp);
        Widget::render(&mut app, area, &mut Buffer::empty(area));
        assert_eq!(app.tree_cursor.selected(), 1);
        assert_eq!(app.tree_cursor.offset(), 1);
    }

    #[tokio::test]
    async fn test_startup_loads_root() {
        let mut app = app();
        app.start();
        settle(&mut app).await;

        assert_eq!(tree_labels(&app), vec!["Research", "Projects", "Shared drive"]);
        // The table lists every root element, files included.
        assert_eq!(app.table.visible().len(), 4);
        assert_eq!(app.table_folder, Some(None));
    }

    #[tokio::test]
    async fn test_activate_opens_folder_in_table() {
        let mut app = app();
        app.start();
        settle(&mut app).await;

        app.handle_action(KeyAction::MoveRight);
        app.handle_action(KeyAction::Activate);
        app.after_action();
        settle(&mut app).await;

        assert_eq!(app.ctx.current_folder(), Some(ElementId::new(1)));
        assert_eq!(tree_labels(&app), vec!["Research", "Papers", "Notes", "Projects", "Shared drive"]);
        assert_eq!(app.table.visible().len(), 3);

        app.handle_action(KeyAction::NavigateBack);
        app.after_action();
        assert_eq!(app.ctx.current_folder(), None);
    }

    #[tokio::test]
    async fn test_delete_selection_from_table() {
        let mut app = app();
        app.start();
        settle(&mut app).await;

        app.handle_action(KeyAction::SwitchFocus);
        app.handle_action(KeyAction::JumpToBottom);
        app.handle_action(KeyAction::ToggleMark);
        app.handle_action(KeyAction::Delete);
        assert_eq!(app.mode, AppMode::ConfirmDelete);

        app.handle_action(KeyAction::Confirm);
        assert_eq!(app.mode, AppMode::Deleting);
        settle(&mut app).await;

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.table.visible().len(), 3);
        assert!(app.status.as_ref().is_some_and(|(ok, _)| *ok));
    }

    #[tokio::test]
    async fn test_drop_onto_own_child_is_refused() {
        let mut app = app();
        app.start();
        settle(&mut app).await;

        // Open Research, then pick it up and drop it on Papers.
        app.handle_action(KeyAction::MoveRight);
        app.after_action();
        settle(&mut app).await;
        app.handle_action(KeyAction::PickUp);
        assert_eq!(app.mode, AppMode::Dragging);
        app.handle_action(KeyAction::MoveDown);
        assert_eq!(app.drag.and_then(|d| d.over), Some(ElementId::new(2)));

        app.handle_action(KeyAction::Activate);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status.as_ref().is_some_and(|(ok, _)| !*ok));
    }

    #[tokio::test]
    async fn test_search_mode_filters_table() {
        let mut app = app();
        app.start();
        settle(&mut app).await;

        app.handle_action(KeyAction::Search);
        for c in "wel".chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.table.visible(), &[ElementId::new(11)]);
    }
}
