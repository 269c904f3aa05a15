use chatclient::state_handler::{parse_command, Action, ClientState};
use common::markdown::{self, Style as Emphasis};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Position,
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::component::{Component, ComponentRender, RenderProps};

pub struct InputBox {
    char_index: usize,
    input: String,
    prompt: String,
    action_tx: UnboundedSender<Action>,
}

impl InputBox {
    pub fn cursor_left(&mut self) {
        let moved_left = self.char_index.saturating_sub(1);
        self.char_index = self.clamp_cursor(moved_left);
    }

    pub fn cursor_right(&mut self) {
        let moved_right = self.char_index.saturating_add(1);
        self.char_index = self.clamp_cursor(moved_right);
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.input.insert(index, new_char);
        self.cursor_right();

        // Commands are not chat, so they do not count as typing
        if !self.input.starts_with('/') {
            let _ = self.action_tx.send(Action::Typing);
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.char_index)
            .unwrap_or(self.input.len())
    }

    pub fn delete_char(&mut self) {
        if self.char_index == 0 {
            return;
        }

        let before_del = self.input.chars().take(self.char_index - 1);
        let after_del = self.input.chars().skip(self.char_index);

        self.input = before_del.chain(after_del).collect();
        self.cursor_left();
    }

    fn clamp_cursor(&self, new_pos: usize) -> usize {
        new_pos.clamp(0, self.input.chars().count())
    }

    fn cursor_to_end(&mut self) {
        self.char_index = self.input.chars().count();
    }

    /// Wraps the whole draft in the markers for `style`.
    pub fn emphasize(&mut self, style: Emphasis) {
        if self.input.trim().is_empty() {
            return;
        }

        self.input = markdown::wrap(&self.input, style);
        self.cursor_to_end();
    }

    pub fn submit(&mut self) {
        let input = std::mem::take(&mut self.input);
        self.char_index = 0;

        if input.trim().is_empty() {
            return;
        }

        let action = parse_command(input).unwrap_or(Action::Invalid);
        let _ = self.action_tx.send(action);
    }
}

impl Component for InputBox {
    fn new(state: &ClientState, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            char_index: 0,
            input: String::new(),
            prompt: prompt_for(state),
            action_tx,
        }
    }

    fn update(self, state: &ClientState) -> Self
    where
        Self: Sized,
    {
        Self {
            prompt: prompt_for(state),
            ..self
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('b') => self.emphasize(Emphasis::Bold),
                KeyCode::Char('t') => self.emphasize(Emphasis::Italic),
                KeyCode::Char('u') => self.emphasize(Emphasis::Underline),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(to_insert) => {
                self.enter_char(to_insert);
            }
            KeyCode::Backspace => {
                self.delete_char();
            }
            KeyCode::Enter => {
                self.submit();
            }
            KeyCode::Left => {
                self.cursor_left();
            }
            KeyCode::Right => {
                self.cursor_right();
            }
            KeyCode::Home => {
                self.char_index = 0;
            }
            KeyCode::End => {
                self.cursor_to_end();
            }
            _ => {}
        }
    }
}

fn prompt_for(state: &ClientState) -> String {
    match state.active_room() {
        Some(room) if state.is_connected() => format!(" {} > {} ", state.username, room.label),
        _ => String::from(" /login {user} {password} "),
    }
}

impl ComponentRender<RenderProps> for InputBox {
    fn render(&self, frame: &mut Frame, props: RenderProps) {
        let input = Paragraph::new(self.input.as_str())
            .style(Style::default().fg(Color::Green))
            .block(
                Block::default()
                    .title(self.prompt.as_str())
                    .borders(Borders::ALL)
                    .fg(props.border_color),
            );
        frame.render_widget(input, props.area);

        frame.set_cursor_position(Position::new(
            props.area.x + self.char_index as u16 + 1,
            props.area.y + 1,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn input_box() -> (InputBox, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (InputBox::new(&ClientState::default(), tx), rx)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(input: &mut InputBox, text: &str) {
        for ch in text.chars() {
            input.handle_key_event(key(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn chat_input_signals_typing() {
        let (mut input, mut rx) = input_box();
        type_str(&mut input, "hi");

        assert_eq!(rx.try_recv().ok(), Some(Action::Typing));
        assert_eq!(rx.try_recv().ok(), Some(Action::Typing));
    }

    #[test]
    fn commands_do_not_signal_typing() {
        let (mut input, mut rx) = input_box();
        type_str(&mut input, "/help");
        input.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(rx.try_recv().ok(), Some(Action::Help));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unknown_command_is_invalid() {
        let (mut input, mut rx) = input_box();
        type_str(&mut input, "/nope");
        input.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(rx.try_recv().ok(), Some(Action::Invalid));
    }

    #[test]
    fn ctrl_b_wraps_draft() {
        let (mut input, mut rx) = input_box();
        type_str(&mut input, "loud");
        input.handle_key_event(key(KeyCode::Char('b'), KeyModifiers::CONTROL));
        input.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));

        let last = std::iter::from_fn(|| rx.try_recv().ok()).last();
        assert_eq!(
            last,
            Some(Action::Send {
                message: String::from("**loud**")
            })
        );
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let (mut input, _rx) = input_box();
        type_str(&mut input, "abc");
        input.handle_key_event(key(KeyCode::Left, KeyModifiers::NONE));
        input.handle_key_event(key(KeyCode::Backspace, KeyModifiers::NONE));

        assert_eq!(input.input, "ac");
        assert_eq!(input.char_index, 1);
    }
}
