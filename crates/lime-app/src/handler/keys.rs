//! Key event handlers per focus and section

use lime_core::Direction;

use crate::input_key::InputKey;
use crate::message::Message;
use crate::navigation::SectionKey;
use crate::state::{AppState, Focus};

/// Convert key events to messages based on the current state
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    if state.config_page.is_renaming() {
        return handle_key_rename(key);
    }

    // Keys that work everywhere
    match key {
        InputKey::CharCtrl('c') => return Some(Message::Quit),
        InputKey::Char('q') | InputKey::Esc => return Some(Message::Quit),
        _ => {}
    }

    if !state.is_ready() {
        return None;
    }

    match key {
        InputKey::Tab | InputKey::BackTab => return Some(Message::ToggleFocus),
        InputKey::Char('1') => return Some(Message::ActivateSection(SectionKey::Qos)),
        InputKey::Char('2') => return Some(Message::ActivateSection(SectionKey::Configuration)),
        // Toolbar
        InputKey::Char('s') => return Some(Message::SaveConfig),
        InputKey::Char('c') => return Some(Message::CopyConfig),
        InputKey::Char('r') => return Some(Message::RunConfig),
        _ => {}
    }

    match state.focus {
        Focus::Navigation => handle_key_navigation(key),
        Focus::Page => match state.active_section() {
            Some(SectionKey::Configuration) => handle_key_configuration(key),
            Some(SectionKey::Qos) => handle_key_qos(key),
            _ => None,
        },
    }
}

fn handle_key_rename(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::RenameCommit),
        InputKey::Esc => Some(Message::RenameCancel),
        InputKey::Backspace => Some(Message::RenameBackspace),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        InputKey::Char(c) => Some(Message::RenameInput(c)),
        _ => None,
    }
}

fn handle_key_navigation(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::NavUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::NavDown),
        InputKey::Enter => Some(Message::NavActivate),
        _ => None,
    }
}

fn handle_key_configuration(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::RowUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::RowDown),
        InputKey::Enter => Some(Message::SelectOnly),
        InputKey::Char(' ') => Some(Message::ToggleSelect),
        InputKey::Char('K') => Some(Message::MoveRow(Direction::Up)),
        InputKey::Char('J') => Some(Message::MoveRow(Direction::Down)),
        InputKey::Char('a') => Some(Message::AddRow),
        InputKey::Char('d') | InputKey::Delete => Some(Message::RemoveRow),
        InputKey::Char('e') => Some(Message::StartRename),
        InputKey::PageUp => Some(Message::PreviewUp),
        InputKey::PageDown => Some(Message::PreviewDown),
        _ => None,
    }
}

fn handle_key_qos(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::JobUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::JobDown),
        InputKey::Char('+') | InputKey::Char('=') => Some(Message::AdjustRate(1)),
        InputKey::Char('-') => Some(Message::AdjustRate(-1)),
        _ => None,
    }
}
