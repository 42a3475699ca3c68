//! Breadcrumb header widget.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use kms_explorer::{Crumb, CrumbKind};

use crate::theme::Theme;

/// One-line breadcrumb: root or parent crumb, then the current folder.
pub struct BreadcrumbView<'a> {
    crumbs: &'a [Crumb],
    theme: &'a Theme,
}

impl<'a> BreadcrumbView<'a> {
    pub fn new(crumbs: &'a [Crumb], theme: &'a Theme) -> Self {
        Self { crumbs, theme }
    }

    fn line(&self) -> Line<'a> {
        let mut spans = vec![Span::raw(" ")];
        for crumb in self.crumbs {
            if let Some(icon) = &crumb.icon {
                spans.push(Span::raw(format!("{icon} ")));
            }
            let style = match crumb.kind {
                CrumbKind::Current if crumb.highlighted => self.theme.crumb_highlighted,
                _ if crumb.clickable => self.theme.crumb.add_modifier(Modifier::UNDERLINED),
                _ => self.theme.crumb,
            };
            spans.push(Span::styled(crumb.label.clone(), style));
            if crumb.chevron {
                spans.push(Span::styled(" › ", self.theme.tree_lines));
            }
        }
        Line::from(spans)
    }
}

impl Widget for BreadcrumbView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.header);
        self.line().render(area, buf);
    }
}
