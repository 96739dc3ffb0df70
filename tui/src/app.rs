use anyhow::Result;
use campuseats_common::{CategoryFilter, View};
use campuseats_core::{Concierge, Store};
use campuseats_protocol::Op;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use tokio::time::Duration;

use crate::ui;

/// Which text field, if any, receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    None,
    Search,
    Mood,
    Address,
}

pub struct App {
    pub store: Store,
    pub running: bool,
    pub focus: Focus,
    pub mood: String,
    pub chat_input: String,
    pub address_input: String,
    pub menu_selected: usize,
    pub cart_selected: usize,
    pub orders_scroll: u16,
    pub status: Option<String>,
}

impl App {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            running: true,
            focus: Focus::None,
            mood: String::new(),
            chat_input: String::new(),
            address_input: String::new(),
            menu_selected: 0,
            cart_selected: 0,
            orders_scroll: 0,
            status: None,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>, concierge: &Concierge) -> Result<()> {
        while self.running {
            terminal.draw(|f| ui::draw(f, self))?;

            tokio::select! {
                maybe_ev = concierge.next_event() => {
                    if let Some(ev) = maybe_ev {
                        self.store.apply(ev);
                        self.clamp_selection();
                    }
                }
                event_result = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                    if let Ok(Ok(true)) = event_result {
                        if let Event::Key(key) = event::read()? {
                            if key.kind == KeyEventKind::Press {
                                if let Some(op) = self.handle_key(key) {
                                    concierge.submit(op).await?;
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies a key press. Returns an operation for the concierge when
    /// the key starts an AI call.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Op> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.running = false;
            return None;
        }

        match key.code {
            KeyCode::Tab => {
                self.switch_view(self.store.view.next());
                return None;
            }
            KeyCode::BackTab => {
                self.switch_view(self.store.view.previous());
                return None;
            }
            KeyCode::F(n @ 1..=5) => {
                self.switch_view(View::ALL[usize::from(n) - 1]);
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => {
                self.edit_search(key.code);
                None
            }
            Focus::Mood => self.edit_mood(key.code),
            Focus::Address => {
                self.edit_address(key.code);
                None
            }
            Focus::None => match self.store.view {
                View::Menu => self.menu_key(key.code),
                View::Cart => self.cart_key(key.code),
                View::Orders => {
                    self.orders_key(key.code);
                    None
                }
                View::Chat => self.chat_key(key.code),
                View::Contact => {
                    self.quit_key(key.code);
                    None
                }
            },
        }
    }

    fn switch_view(&mut self, view: View) {
        self.focus = Focus::None;
        self.store.set_view(view);
        self.clamp_selection();
    }

    fn quit_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char('q') {
            self.running = false;
        }
    }

    fn menu_key(&mut self, code: KeyCode) -> Option<Op> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selected = self.menu_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.store.visible_menu().len();
                if self.menu_selected + 1 < len {
                    self.menu_selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.shift_category(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_category(1),
            KeyCode::Enter | KeyCode::Char('a') => self.add_selected(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('m') => self.focus = Focus::Mood,
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                match self.store.quick_add(idx) {
                    Ok(()) => self.status = Some(format!("Added recommendation #{}", idx + 1)),
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            other => self.quit_key(other),
        }
        None
    }

    fn shift_category(&mut self, step: isize) {
        let options = CategoryFilter::options();
        let current = options.iter().position(|c| *c == self.store.category).unwrap_or(0) as isize;
        let len = options.len() as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.store.category = options[next];
        self.menu_selected = 0;
    }

    fn add_selected(&mut self) {
        let Some(item) = self.store.visible_menu().get(self.menu_selected).copied() else {
            return;
        };
        match self.store.add_to_cart(&item.id) {
            Ok(()) => self.status = Some(format!("Added {} to cart", item.name)),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn edit_search(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.store.search.push(c),
            KeyCode::Backspace => {
                self.store.search.pop();
            }
            KeyCode::Enter | KeyCode::Esc => self.focus = Focus::None,
            _ => {}
        }
        self.clamp_selection();
    }

    fn edit_mood(&mut self, code: KeyCode) -> Option<Op> {
        match code {
            KeyCode::Char(c) => self.mood.push(c),
            KeyCode::Backspace => {
                self.mood.pop();
            }
            KeyCode::Esc => self.focus = Focus::None,
            KeyCode::Enter => {
                self.focus = Focus::None;
                return self.store.request_recommendations(&self.mood);
            }
            _ => {}
        }
        None
    }

    fn cart_key(&mut self, code: KeyCode) -> Option<Op> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cart_selected = self.cart_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cart_selected + 1 < self.store.cart.lines().len() {
                    self.cart_selected += 1;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_selected(1),
            KeyCode::Char('-') => self.adjust_selected(-1),
            KeyCode::Char('e') => {
                self.address_input = self.store.location.address.clone();
                self.focus = Focus::Address;
            }
            KeyCode::Char('d') => return self.store.request_location(),
            KeyCode::Char('c') | KeyCode::Enter => self.checkout(),
            other => self.quit_key(other),
        }
        None
    }

    fn adjust_selected(&mut self, delta: i32) {
        let Some(id) = self
            .store
            .cart
            .lines()
            .get(self.cart_selected)
            .map(|l| l.item.id.clone())
        else {
            return;
        };
        self.store.update_quantity(&id, delta);
        self.clamp_selection();
    }

    fn checkout(&mut self) {
        if self.store.cart.is_empty() {
            return;
        }
        match self.store.checkout(Utc::now()) {
            Ok(id) => {
                self.status = Some(format!("Order #{id} placed"));
                self.orders_scroll = 0;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        self.clamp_selection();
    }

    fn edit_address(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.address_input.push(c),
            KeyCode::Backspace => {
                self.address_input.pop();
            }
            KeyCode::Enter => {
                self.store.set_address(self.address_input.trim());
                self.focus = Focus::None;
            }
            KeyCode::Esc => self.focus = Focus::None,
            _ => {}
        }
    }

    fn orders_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.orders_scroll = self.orders_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.orders_scroll = self.orders_scroll.saturating_add(1),
            other => self.quit_key(other),
        }
    }

    /// Typing always goes to the chat input in this view.
    fn chat_key(&mut self, code: KeyCode) -> Option<Op> {
        match code {
            KeyCode::Char(c) => self.chat_input.push(c),
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::Enter => {
                let op = self.store.send_chat(&self.chat_input);
                if op.is_some() {
                    self.chat_input.clear();
                }
                return op;
            }
            _ => {}
        }
        None
    }

    fn clamp_selection(&mut self) {
        let menu_len = self.store.visible_menu().len();
        self.menu_selected = self.menu_selected.min(menu_len.saturating_sub(1));
        let cart_len = self.store.cart.lines().len();
        self.cart_selected = self.cart_selected.min(cart_len.saturating_sub(1));
    }
}
