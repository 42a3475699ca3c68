//! Application rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, StatefulWidget, Widget};

use kms_core::Element;

use crate::ui::modals::{DeleteConfirmModal, DeleteProgressModal};
use crate::ui::{
    AppLayout, BreadcrumbView, FolderTreeView, HelpOverlay, KnowledgeTableView, truncate,
};

use super::App;
use super::state::{AppMode, Focus};

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base_style = Style::default().fg(self.theme.foreground);
        buf.set_style(area, base_style);

        let layout = AppLayout::new(area);

        let crumbs = self.header.crumbs(&self.ctx, &self.store);
        BreadcrumbView::new(&crumbs, &self.theme).render(layout.header, buf);

        self.render_tree(layout.tree, buf);
        self.render_table(layout.table, buf);
        self.render_footer(layout.footer, buf);

        match self.mode {
            AppMode::Help => HelpOverlay::new(&self.theme, self.focus).render(area, buf),
            AppMode::ConfirmDelete => {
                let batch: Vec<&Element> = self
                    .table
                    .delete_batch()
                    .into_iter()
                    .filter_map(|id| self.store.get(id))
                    .collect();
                let hidden = self.table.selection().len().saturating_sub(batch.len());
                DeleteConfirmModal::new(&self.theme, &batch, hidden).render(area, buf);
            }
            AppMode::Deleting => {
                DeleteProgressModal::new(&self.theme, self.delete_progress.as_ref())
                    .render(area, buf);
            }
            _ => {}
        }
    }
}

impl App {
    fn pane_block(&self, title: &str, focus: Focus) -> Block<'static> {
        let border = if self.focus == focus {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(format!(" {title} "), self.theme.title))
    }

    fn render_tree(&mut self, area: Rect, buf: &mut Buffer) {
        let title = if self.mode == AppMode::Dragging {
            "Folders (drop target)"
        } else {
            "Folders"
        };
        let block = self.pane_block(title, Focus::Tree);
        FolderTreeView::new(&self.tree_rows, &self.theme, self.focus == Focus::Tree)
            .block(block)
            .render(area, buf, &mut self.tree_cursor);
    }

    fn render_table(&mut self, area: Rect, buf: &mut Buffer) {
        let rows = self.table.rows(&self.store);
        let title = match self.table.selection().len() {
            0 => "Knowledge".to_string(),
            n => format!("Knowledge ({n} selected)"),
        };
        let block = self.pane_block(&title, Focus::Table);
        KnowledgeTableView::new(&rows, self.table.sort(), &self.theme)
            .all_checked(self.table.all_checked())
            .show_status(self.config.show_status_column)
            .focused(self.focus == Focus::Table)
            .loading(self.table_loading)
            .error(self.table.error())
            .block(block)
            .render(area, buf, &mut self.table_cursor);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let line = if self.mode == AppMode::Search {
            Line::from(vec![
                Span::styled("/", self.theme.help_key),
                Span::styled(
                    format!("{}█", self.table.search()),
                    self.theme.search_input,
                ),
                Span::styled("  Enter keep · Esc clear", self.theme.help_desc),
            ])
        } else if let Some((ok, message)) = &self.status {
            let color = if *ok { self.theme.success } else { self.theme.error };
            Line::from(Span::styled(
                truncate(message, width),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        } else {
            let mut spans = Vec::new();
            if !self.table.search().is_empty() {
                spans.push(Span::styled(
                    format!("/{}  ", self.table.search()),
                    self.theme.search_input,
                ));
            }
            for (key, desc) in [
                ("Tab", "focus"),
                ("/", "search"),
                ("Space", "mark"),
                ("d", "delete"),
                ("m", "move"),
                ("?", "help"),
            ] {
                spans.push(Span::styled(format!(" {key} "), self.theme.help_key));
                spans.push(Span::styled(desc, self.theme.help_desc));
            }
            Line::from(spans)
        };

        Paragraph::new(line)
            .style(self.theme.footer)
            .render(area, buf);
    }
}
