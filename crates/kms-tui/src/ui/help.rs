//! Key binding overlay.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::app::state::Focus;
use crate::event::{HelpSection, get_help_sections};
use crate::theme::Theme;

use super::modals::popup;

/// Key bindings for the focused pane first, then the rest dimmed.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
    focus: Focus,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme, focus: Focus) -> Self {
        Self { theme, focus }
    }

    fn applies(&self, section: &HelpSection) -> bool {
        section.pane.is_none_or(|pane| pane == self.focus)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut sections = get_help_sections();
        sections.sort_by_key(|s| !self.applies(s));

        let key_width = sections
            .iter()
            .flat_map(|s| &s.bindings)
            .map(|b| b.keys.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::new();
        for section in &sections {
            let active = self.applies(section);
            let title_style = if active {
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            lines.push(Line::from(Span::styled(section.title, title_style)));

            for binding in &section.bindings {
                let (key_style, desc_style) = if active {
                    (self.theme.help_key, self.theme.help_desc)
                } else {
                    let muted = Style::default().fg(self.theme.muted);
                    (muted, muted)
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<width$}", binding.keys, width = key_width),
                        key_style,
                    ),
                    Span::styled(format!("  {}", binding.description), desc_style),
                ]));
            }
            lines.push(Line::default());
        }
        lines.pop();
        lines
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
        let popup_area = popup(area, width.max(40), lines.len() as u16 + 2);

        Clear.render(popup_area, buf);
        let block = Block::default()
            .title(format!(" Keys: {} pane ", self.focus))
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused);
        Paragraph::new(lines).block(block).render(popup_area, buf);
    }
}
