use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct StatusBar<'a> {
    mode: &'a str,
    status: &'a str,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str, status: &'a str, hints: &'a str) -> Self {
        Self { mode, status, hints }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Style::default().fg(Color::Black).bg(Color::LightRed).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ];
        if !self.status.is_empty() {
            spans.push(Span::styled(self.status, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw("  |  "));
        }
        spans.push(Span::styled(self.hints, Style::default().fg(Color::Gray)));

        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}
