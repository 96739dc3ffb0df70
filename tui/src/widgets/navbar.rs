use campuseats_common::View;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs, Widget},
};

/// View tabs with the cart count badge.
pub struct Navbar {
    current: View,
    cart_count: u32,
}

impl Navbar {
    pub fn new(current: View, cart_count: u32) -> Self {
        Self { current, cart_count }
    }
}

impl Widget for Navbar {
    fn render(self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let titles: Vec<Line> = View::ALL
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let label = match view {
                    View::Cart if self.cart_count > 0 => format!("F{} {} ({})", i + 1, view.title(), self.cart_count),
                    _ => format!("F{} {}", i + 1, view.title()),
                };
                Line::from(label)
            })
            .collect();
        let selected = View::ALL.iter().position(|v| *v == self.current).unwrap_or(0);

        let brand = Line::from(vec![
            Span::styled(" CampusEats ", Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)),
        ]);

        Tabs::new(titles)
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title(brand))
            .highlight_style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
            .divider("|")
            .render(area, buf);
    }
}
