//! Color theme for the TUI.
//!
//! Dark and light variants over a semantic palette based on Tailwind CSS
//! colors.

use ratatui::style::{Color, Modifier, Style};

use kms_core::KnowledgeStatus;

/// Theme variant (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub variant: ThemeVariant,

    // Base colors
    pub foreground: Color,
    pub muted: Color,

    // Interactive elements
    pub selected: Style,
    pub cursor: Style,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Style,
    pub border_focused: Style,
    pub title: Style,
    pub help_key: Style,
    pub help_desc: Style,

    // Tree elements
    pub tree_lines: Style,
    pub folder: Style,
    pub folder_empty: Style,
    pub current_folder: Style,
    pub drag_over: Style,
    pub file: Style,
    pub link: Style,

    // Breadcrumb
    pub crumb: Style,
    pub crumb_highlighted: Style,

    // Header/Footer
    pub header: Style,
    pub footer: Style,
    pub search_input: Style,

    /// Rows in the table's selection.
    pub marked: Style,
}

impl Theme {
    /// Dark theme using a slate-based palette.
    pub fn dark() -> Self {
        let slate_50 = Color::Rgb(248, 250, 252);
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_300 = Color::Rgb(203, 213, 225);
        let slate_400 = Color::Rgb(148, 163, 184);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_600 = Color::Rgb(71, 85, 105);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_800 = Color::Rgb(30, 41, 59);

        let blue_400 = Color::Rgb(96, 165, 250);
        let blue_500 = Color::Rgb(59, 130, 246);
        let green_500 = Color::Rgb(34, 197, 94);
        let yellow_500 = Color::Rgb(234, 179, 8);
        let red_500 = Color::Rgb(239, 68, 68);
        let cyan_400 = Color::Rgb(34, 211, 238);
        let amber_500 = Color::Rgb(245, 158, 11);
        let violet_400 = Color::Rgb(167, 139, 250);

        Self {
            variant: ThemeVariant::Dark,
            foreground: slate_100,
            muted: slate_500,

            selected: Style::new().bg(slate_700).fg(slate_50).add_modifier(Modifier::BOLD),
            cursor: Style::new().bg(slate_800),

            success: green_500,
            warning: yellow_500,
            error: red_500,
            info: blue_400,

            border: Style::new().fg(slate_600),
            border_focused: Style::new().fg(blue_400),
            title: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            help_key: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(slate_400),

            tree_lines: Style::new().fg(slate_600),
            folder: Style::new().fg(blue_500).add_modifier(Modifier::BOLD),
            folder_empty: Style::new().fg(slate_400),
            current_folder: Style::new().fg(violet_400).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            drag_over: Style::new().bg(slate_600).fg(slate_50),
            file: Style::new().fg(slate_300),
            link: Style::new().fg(cyan_400),

            crumb: Style::new().fg(slate_400),
            crumb_highlighted: Style::new().fg(slate_50).add_modifier(Modifier::BOLD),

            header: Style::new().bg(slate_800).fg(slate_100),
            footer: Style::new().bg(slate_800).fg(slate_400),
            search_input: Style::new().fg(slate_100),

            marked: Style::new().fg(amber_500).add_modifier(Modifier::BOLD),
        }
    }

    /// Light theme using a slate-based palette.
    pub fn light() -> Self {
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_200 = Color::Rgb(226, 232, 240);
        let slate_400 = Color::Rgb(148, 163, 184);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_600 = Color::Rgb(71, 85, 105);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_800 = Color::Rgb(30, 41, 59);
        let slate_900 = Color::Rgb(15, 23, 42);

        let blue_600 = Color::Rgb(37, 99, 235);
        let blue_700 = Color::Rgb(29, 78, 216);
        let green_600 = Color::Rgb(22, 163, 74);
        let yellow_600 = Color::Rgb(202, 138, 4);
        let red_600 = Color::Rgb(220, 38, 38);
        let cyan_600 = Color::Rgb(8, 145, 178);
        let amber_600 = Color::Rgb(217, 119, 6);
        let violet_600 = Color::Rgb(124, 58, 237);

        Self {
            variant: ThemeVariant::Light,
            foreground: slate_900,
            muted: slate_500,

            selected: Style::new().bg(slate_200).fg(slate_900).add_modifier(Modifier::BOLD),
            cursor: Style::new().bg(slate_100),

            success: green_600,
            warning: yellow_600,
            error: red_600,
            info: blue_600,

            border: Style::new().fg(slate_400),
            border_focused: Style::new().fg(blue_700),
            title: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            help_key: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(slate_600),

            tree_lines: Style::new().fg(slate_400),
            folder: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            folder_empty: Style::new().fg(slate_500),
            current_folder: Style::new().fg(violet_600).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            drag_over: Style::new().bg(slate_200).fg(slate_900),
            file: Style::new().fg(slate_700),
            link: Style::new().fg(cyan_600),

            crumb: Style::new().fg(slate_600),
            crumb_highlighted: Style::new().fg(slate_900).add_modifier(Modifier::BOLD),

            header: Style::new().bg(slate_100).fg(slate_800),
            footer: Style::new().bg(slate_100).fg(slate_600),
            search_input: Style::new().fg(slate_900),

            marked: Style::new().fg(amber_600).add_modifier(Modifier::BOLD),
        }
    }

    /// Toggle between dark and light themes.
    pub fn toggle(&self) -> Self {
        match self.variant {
            ThemeVariant::Dark => Self::light(),
            ThemeVariant::Light => Self::dark(),
        }
    }

    /// Color for a knowledge processing status.
    pub fn status_color(&self, status: KnowledgeStatus) -> Color {
        match status {
            KnowledgeStatus::Error => self.error,
            KnowledgeStatus::Reserved | KnowledgeStatus::Processing => self.warning,
            KnowledgeStatus::Processed => self.success,
            KnowledgeStatus::Uploaded => self.info,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
