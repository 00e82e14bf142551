use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use railadvice_core::{
    ChatController, ChatError, ChatResponse, Environment, RailAdviceClient,
};
use tracing::debug;

use crate::tui::{AppEvent, EventSender};

/// Suggested questions offered on the landing view
pub const QUICK_ACTIONS: &[&str] = &[
    "Hva er forskjellen mellom ETCS nivå 1 og nivå 2?",
    "Hvordan fungerer en balise?",
    "Hva betyr Movement Authority (MA)?",
    "Forklar driftsmodusene Full Supervision og On Sight",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub controller: ChatController,
    pub environment: Environment,
    client: RailAdviceClient,
    events: EventSender,

    // Prompt input (shared by landing and chat views)
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub quick_action_state: ListState,

    // Chat log
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub chat_area: Option<Rect>,
    pub follow_tail: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for typing dots
    pub fresh_from: Option<usize>, // first message still fading in
    seen_messages: usize,
}

impl App {
    pub fn new(client: RailAdviceClient, environment: Environment, events: EventSender) -> Self {
        let mut quick_action_state = ListState::default();
        quick_action_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            controller: ChatController::new(),
            environment,
            client,
            events,
            input: String::new(),
            cursor: 0,
            quick_action_state,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,
            follow_tail: true,
            animation_frame: 0,
            fresh_from: None,
            seen_messages: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    // ------------------------------------------------------------------
    // Network
    // ------------------------------------------------------------------

    /// Send whatever is in the input box. On the landing view this also
    /// switches to the chat view.
    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        self.cursor = 0;

        let message = if self.controller.is_chat_active() {
            self.controller.begin_send(&text)
        } else {
            self.controller.start_chat(&text)
        };

        if let Some(message) = message {
            self.dispatch_chat(message);
        }
    }

    /// Send the highlighted quick action as the first question
    pub fn select_quick_action(&mut self) {
        let Some(prompt) = self
            .quick_action_state
            .selected()
            .and_then(|i| QUICK_ACTIONS.get(i))
        else {
            return;
        };

        if let Some(message) = self.controller.start_chat(prompt) {
            self.input.clear();
            self.cursor = 0;
            self.dispatch_chat(message);
        }
    }

    fn dispatch_chat(&mut self, message: String) {
        self.sync_log();
        self.follow_tail = true;
        self.scroll_to_bottom();

        debug!(pending = self.controller.pending_requests(), "dispatching chat request");

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.chat(&message).await;
            let _ = events.send(AppEvent::ChatCompleted(result));
        });
    }

    /// Fire-and-forget health check; the result arrives as an event
    pub fn check_health(&mut self) {
        self.controller.begin_health_check();

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.health().await;
            let _ = events.send(AppEvent::HealthChecked(result));
        });
    }

    pub fn on_chat_completed(&mut self, result: Result<ChatResponse, ChatError>) {
        self.controller.complete_send(result);
        self.sync_log();
        if self.follow_tail {
            self.scroll_to_bottom();
        }
    }

    pub fn on_health_checked(&mut self, result: Result<(), ChatError>) {
        self.controller.complete_health_check(result);
    }

    /// Mark messages appended since the last call as fresh
    fn sync_log(&mut self) {
        let count = self.controller.messages().len();
        if count > self.seen_messages {
            self.fresh_from = Some(self.seen_messages);
            self.seen_messages = count;
        }
    }

    pub fn is_fresh(&self, index: usize) -> bool {
        self.fresh_from.is_some_and(|from| index >= from)
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        self.fresh_from = None;
        if self.controller.is_typing() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // ------------------------------------------------------------------
    // Input editing
    // ------------------------------------------------------------------

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // ------------------------------------------------------------------
    // Quick actions
    // ------------------------------------------------------------------

    pub fn quick_action_down(&mut self) {
        let i = match self.quick_action_state.selected() {
            Some(i) if i + 1 < QUICK_ACTIONS.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.quick_action_state.select(Some(i));
    }

    pub fn quick_action_up(&mut self) {
        let i = self
            .quick_action_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.quick_action_state.select(Some(i));
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    /// Number of rendered lines in the chat log at the current width
    pub fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };

        let count = crate::ui::chat_paragraph(self).line_count(wrap_width);
        count.min(u16::MAX as usize) as u16
    }

    fn max_scroll(&self) -> u16 {
        self.chat_line_count().saturating_sub(self.chat_height)
    }

    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    /// Re-pin the tail when following, otherwise keep the offset in range
    pub fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        if self.follow_tail {
            self.chat_scroll = max;
        } else {
            self.chat_scroll = self.chat_scroll.min(max);
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
        self.follow_tail = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
        self.follow_tail = self.chat_scroll >= max;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_tail = self.chat_scroll >= self.max_scroll();
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_down((self.chat_height / 2).max(1));
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_up((self.chat_height / 2).max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railadvice_core::{ChatRole, ConnectionStatus, View};
    use serde_json::json;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(base_url: &str) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(RailAdviceClient::new(base_url), Environment::Development, tx);
        (app, rx)
    }

    #[test]
    fn test_input_editing_is_utf8_safe() {
        let (mut app, _rx) = test_app("http://localhost:8000");
        for c in "sør".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.delete_back();
        assert_eq!(app.input, "sr");
        assert_eq!(app.cursor, 1);

        app.cursor_home();
        app.delete_forward();
        assert_eq!(app.input, "r");
        app.cursor_end();
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_blank_submit_stays_on_landing() {
        let (mut app, mut rx) = test_app("http://localhost:8000");
        app.input = "   ".to_string();
        app.submit_input();

        assert_eq!(app.controller.view(), View::Initial);
        assert!(app.controller.messages().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_quick_action_bounds() {
        let (mut app, _rx) = test_app("http://localhost:8000");
        app.quick_action_up();
        assert_eq!(app.quick_action_state.selected(), Some(0));
        for _ in 0..10 {
            app.quick_action_down();
        }
        assert_eq!(app.quick_action_state.selected(), Some(QUICK_ACTIONS.len() - 1));
    }

    #[test]
    fn test_line_count_wraps_and_counts_typing() {
        let (mut app, _rx) = test_app("http://localhost:8000");
        app.chat_width = 10;
        app.controller.append(railadvice_core::ChatMessage::user("a".repeat(25)));
        // label + 3 wrapped + separator
        assert_eq!(app.chat_line_count(), 5);

        app.controller.show_typing();
        assert_eq!(app.chat_line_count(), 7);
    }

    #[test]
    fn test_line_count_breaks_at_words() {
        let (mut app, _rx) = test_app("http://localhost:8000");
        app.chat_width = 10;
        // 20 chars would fit two rows, but each word needs its own row
        app.controller.append(railadvice_core::ChatMessage::user("abcdef abcdef abcdef"));
        assert_eq!(app.chat_line_count(), 5);
    }

    #[tokio::test]
    async fn test_submit_round_trip_through_event_channel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Balisen sender telegrammer til toget.",
                "sources": 2,
                "confidence": "medium"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, mut rx) = test_app(&server.uri());
        app.input = "Hvordan fungerer en balise?".to_string();
        app.cursor_end();
        app.submit_input();

        assert!(app.controller.is_chat_active());
        assert!(app.controller.is_typing());
        assert!(app.input.is_empty());
        assert!(app.is_fresh(0));

        match rx.recv().await {
            Some(AppEvent::ChatCompleted(result)) => app.on_chat_completed(result),
            other => panic!("unexpected event: {:?}", other),
        }

        let messages = app.controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert!(messages[1].text.contains("2 dokumenter"));
        assert!(!app.controller.is_typing());
        assert!(app.is_fresh(1));

        app.tick_animation();
        assert!(!app.is_fresh(1));
    }

    #[tokio::test]
    async fn test_quick_action_starts_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "down"})))
            .mount(&server)
            .await;

        let (mut app, mut rx) = test_app(&server.uri());
        app.quick_action_down();
        app.select_quick_action();

        assert_eq!(app.controller.messages()[0].text, QUICK_ACTIONS[1]);

        if let Some(AppEvent::ChatCompleted(result)) = rx.recv().await {
            app.on_chat_completed(result);
        }
        assert_eq!(app.controller.status().status, ConnectionStatus::Error);
    }

    #[tokio::test]
    async fn test_health_check_reports_through_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let (mut app, mut rx) = test_app(&server.uri());
        app.check_health();
        assert_eq!(app.controller.status().status, ConnectionStatus::Connecting);

        if let Some(AppEvent::HealthChecked(result)) = rx.recv().await {
            app.on_health_checked(result);
        }
        assert_eq!(app.controller.status().status, ConnectionStatus::Connected);
    }
}
