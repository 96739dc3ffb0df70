use campuseats_common::{CategoryFilter, ChatRole, View};
use campuseats_core::cart::format_price;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::widgets::{Navbar, StatusBar};

const MENU_HINTS: &str = "↑↓ select  ←→ category  Enter add  / search  m mood  1-9 quick add  Tab views  q quit";
const CART_HINTS: &str = "↑↓ select  +/- qty  e address  d detect  c checkout  Tab views";
const ORDERS_HINTS: &str = "↑↓ scroll  Tab views  q quit";
const CHAT_HINTS: &str = "type and Enter to send  Tab views  Ctrl+Q quit";
const CONTACT_HINTS: &str = "Tab views  q quit";
const EDIT_HINTS: &str = "Enter confirm  Esc cancel";

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(3)])
        .split(f.area());

    f.render_widget(Navbar::new(app.store.view, app.store.cart.count()), chunks[0]);

    match app.store.view {
        View::Menu => draw_menu(f, app, chunks[1]),
        View::Cart => draw_cart(f, app, chunks[1]),
        View::Orders => draw_orders(f, app, chunks[1]),
        View::Chat => draw_chat(f, app, chunks[1]),
        View::Contact => draw_contact(f, chunks[1]),
    }

    let hints = if app.focus != Focus::None {
        EDIT_HINTS
    } else {
        match app.store.view {
            View::Menu => MENU_HINTS,
            View::Cart => CART_HINTS,
            View::Orders => ORDERS_HINTS,
            View::Chat => CHAT_HINTS,
            View::Contact => CONTACT_HINTS,
        }
    };
    let mode = match app.focus {
        Focus::None => app.store.view.title(),
        Focus::Search => "Search",
        Focus::Mood => "Mood",
        Focus::Address => "Address",
    };
    let status = app.status.as_deref().unwrap_or("");
    f.render_widget(StatusBar::new(mode, status, hints), chunks[2]);
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let mut spans = vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::LightRed)));
    }
    Line::from(spans)
}

fn draw_menu(f: &mut Frame, app: &App, area: Rect) {
    let recs = &app.store.recommendations;
    let concierge_height = 4 + recs.len().min(4) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(concierge_height),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    // Concierge panel
    let mut lines = vec![input_line("Mood: ", &app.mood, app.focus == Focus::Mood)];
    if app.store.is_loading_recommendations() {
        lines.push(Line::styled("Analyzing your mood...", Style::default().fg(Color::Yellow)));
    } else if recs.is_empty() {
        lines.push(Line::styled(
            "State your mood (press m) and we'll find the perfect meal.",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for (i, rec) in recs.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}. {} ", i + 1, rec.item.name), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("\"{}\"", rec.reason), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    let concierge = Paragraph::new(lines)
        .block(Block::default().title("CampusEats Concierge").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(concierge, chunks[0]);

    // Category + search bar
    let mut spans: Vec<Span> = Vec::new();
    for option in CategoryFilter::options() {
        let style = if option == app.store.category {
            Style::default().fg(Color::Black).bg(Color::LightRed)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", option.label()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("  "));
    let search = input_line("Search: ", &app.store.search, app.focus == Focus::Search);
    spans.extend(search.spans);
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    // Items
    let visible = app.store.visible_menu();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{:<26}", item.name), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("{:>8}", format_price(item.price)), Style::default().fg(Color::LightRed)),
                    Span::raw(format!(
                        "  {:<9} {:>5} kcal  ★ {:.1}  {}",
                        item.category.as_str(),
                        item.calories,
                        item.rating,
                        item.tags.join(", ")
                    )),
                ]),
                Line::styled(format!("  {}", item.description), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    let title = format!("Menu ({} items)", visible.len());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(if visible.is_empty() { None } else { Some(app.menu_selected) });
    f.render_stateful_widget(list, chunks[2], &mut state);
}

fn draw_cart(f: &mut Frame, app: &App, area: Rect) {
    let cart = &app.store.cart;
    if cart.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::styled("Cart is empty", Style::default().add_modifier(Modifier::BOLD)),
            Line::from("Press F1 to go to the menu."),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().title("Your Shopping Cart").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let items: Vec<ListItem> = cart
        .lines()
        .iter()
        .map(|line| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<26}", line.item.name), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:>8}", format_price(line.item.price))),
                Span::raw(format!("  x{:<3}", line.quantity)),
                Span::styled(format!("{:>9}", format_price(line.line_total())), Style::default().fg(Color::LightRed)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().title("Your Shopping Cart").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.cart_selected));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let location = &app.store.location;
    let mut lines = vec![
        Line::from(format!("Subtotal  {}", format_price(cart.subtotal()))),
        Line::from(vec![Span::raw("Delivery  "), Span::styled("Free", Style::default().fg(Color::Green))]),
        Line::styled(
            format!("Total     {}", format_price(cart.total())),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];
    if app.focus == Focus::Address {
        lines.push(input_line("Deliver to: ", &app.address_input, true));
    } else if location.address.is_empty() {
        lines.push(Line::styled("Deliver to: (press e to enter, d to detect)", Style::default().fg(Color::DarkGray)));
    } else {
        lines.push(input_line("Deliver to: ", &location.address, false));
    }
    if app.store.is_detecting_location() {
        lines.push(Line::styled("Detecting location...", Style::default().fg(Color::Yellow)));
    }
    if let Some(insight) = &location.insight {
        lines.push(Line::styled(format!("Tip: {insight}"), Style::default().fg(Color::Cyan)));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled("Press c to place order", Style::default().fg(Color::LightRed)));

    let summary = Paragraph::new(lines)
        .block(Block::default().title("Order Summary").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(summary, chunks[1]);
}

fn draw_orders(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("My Orders").borders(Borders::ALL);
    let orders = app.store.orders.orders();
    if orders.is_empty() {
        f.render_widget(Paragraph::new("No recent orders found.").block(block), area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for order in orders {
        lines.push(Line::from(vec![
            Span::styled(format!("#{}", order.id), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(order.status.to_string(), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(format!("Location: {}", order.location.address)));
        for item in &order.items {
            lines.push(Line::from(format!(
                "  {} x{}  {}",
                item.item.name,
                item.quantity,
                format_price(item.line_total())
            )));
        }
        let placed = order.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M");
        lines.push(Line::styled(format!("Placed on {placed}"), Style::default().fg(Color::DarkGray)));
        lines.push(Line::styled(
            format!("Total: {}", format_price(order.total)),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.orders_scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_chat(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for message in app.store.chat.messages() {
        let (who, color) = match message.role {
            ChatRole::User => ("You: ", Color::LightRed),
            ChatRole::Bot => ("Assistant: ", Color::Cyan),
        };
        lines.push(Line::from(vec![
            Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(message.text.as_str()),
        ]));
    }
    if app.store.chat.is_pending() {
        lines.push(Line::styled("Assistant is typing...", Style::default().fg(Color::DarkGray)));
    }

    // Keep the newest rows in view, counted after wrapping.
    let inner = Block::default().borders(Borders::ALL).inner(chunks[0]);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    let rows = body.line_count(inner.width);
    let scroll = u16::try_from(rows.saturating_sub(inner.height as usize)).unwrap_or(u16::MAX);
    let messages = body
        .block(Block::default().title("CampusEats Smart Assistant").borders(Borders::ALL))
        .scroll((scroll, 0));
    f.render_widget(messages, chunks[0]);

    let input = Paragraph::new(input_line("", &app.chat_input, true))
        .block(Block::default().title("What should I eat for a rainy day?").borders(Borders::ALL));
    f.render_widget(input, chunks[1]);
}

fn draw_contact(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled("CampusEats Support", Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("Questions about an order? Reach the campus delivery desk:"),
        Line::from("  Email:  support@campuseats.example"),
        Line::from("  Desk:   Student Center, ground floor"),
        Line::from("  Hours:  Mon-Sat, 8:00 - 22:00"),
        Line::from(""),
        Line::from("For menu questions, the Smart Assistant (F4) is available any time."),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Contact").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuseats_core::Store;
    use campuseats_protocol::Event;
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        render_at(app, 120, 40)
    }

    fn render_at(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn menu_lists_catalog() {
        let app = App::new(Store::default());
        let screen = render(&app);
        assert!(screen.contains("Classic Cheeseburger"));
        assert!(screen.contains("Menu (8 items)"));
        assert!(screen.contains("CampusEats Concierge"));
    }

    #[test]
    fn cart_shows_rounded_totals_and_badge() {
        let mut app = App::new(Store::default());
        app.store.add_to_cart("1").unwrap();
        app.store.add_to_cart("1").unwrap();
        app.store.add_to_cart("6").unwrap();
        app.store.set_view(View::Cart);
        let screen = render(&app);
        assert!(screen.contains("$30.48"));
        assert!(screen.contains("$32.00"));
        assert!(screen.contains("Cart (3)"));
    }

    #[test]
    fn empty_orders_message() {
        let mut app = App::new(Store::default());
        app.store.set_view(View::Orders);
        assert!(render(&app).contains("No recent orders found."));
    }

    #[test]
    fn chat_shows_greeting() {
        let mut app = App::new(Store::default());
        app.store.set_view(View::Chat);
        assert!(render(&app).contains("Hungry? Confused? Just ask!"));
    }

    #[test]
    fn chat_keeps_newest_wrapped_reply_in_view() {
        let mut app = App::new(Store::default());
        app.store.set_view(View::Chat);
        let filler = "lots of words that wrap across the narrow chat panel ".repeat(4);
        for i in 0..3 {
            app.store.send_chat(&format!("question {i} {filler}")).unwrap();
            app.store.apply(Event::ChatReply { text: format!("answer {i} {filler}END{i}") });
        }
        let screen = render_at(&app, 60, 24);
        assert!(screen.contains("END2"));
    }
}
