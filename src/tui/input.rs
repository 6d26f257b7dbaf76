//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{Focus, TuiApp};

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut TuiApp, key: KeyEvent) {
    // Global bindings
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::F(5) => {
            app.request_tree_refresh();
            return;
        }
        KeyCode::F(2) => {
            app.results.tree_only = !app.results.tree_only;
            return;
        }
        KeyCode::Char(c @ '1'..='9') if key.modifiers.contains(KeyModifiers::ALT) => {
            app.select_index(c as usize - '1' as usize);
            return;
        }
        KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.select_relative(-1);
            return;
        }
        KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.select_relative(1);
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Form => handle_form_key(app, key),
        Focus::Tree => handle_tree_key(app, key),
    }
}

fn handle_form_key(app: &mut TuiApp, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.request_submit(),
        KeyCode::Left => app.select_relative(-1),
        KeyCode::Right => app.select_relative(1),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.controller.current_form_mut() {
                form.reset();
            }
        }
        _ => {
            let Some(form) = app.controller.current_form_mut() else {
                return;
            };
            match key.code {
                KeyCode::Up => form.focus_prev(),
                KeyCode::Down => form.focus_next(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.insert_char(c),
                _ => {}
            }
        }
    }
}

fn handle_tree_key(app: &mut TuiApp, key: KeyEvent) {
    let state = &mut app.results.tree_state;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.key_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.key_up();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.key_left();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.key_right();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            state.toggle_selected();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ArgValue;
    use crate::console::OperationKey;
    use crate::tui::app::tests::test_app;
    use crate::tui::event::Request;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn esc_and_ctrl_c_quit() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.should_quit);

        let mut app = test_app();
        handle_key(&mut app, with(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn plain_q_is_typed_not_quit() {
        let mut app = test_app();
        app.select_index(0); // Create: focused field is a number
        handle_key(&mut app, key(KeyCode::Down)); // name (text)
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        let sub = app.controller.prepare_submit().unwrap();
        assert_eq!(sub.args["name"], ArgValue::Text("New categoryq".into()));
    }

    #[test]
    fn arrows_switch_operations() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.controller.current(), Some(OperationKey::Update));
        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.controller.current(), Some(OperationKey::GetSubLayer));
    }

    #[test]
    fn alt_digit_selects_tab() {
        let mut app = test_app();
        handle_key(&mut app, with(KeyCode::Char('5'), KeyModifiers::ALT));
        assert_eq!(app.controller.current(), Some(OperationKey::GetLevel));
    }

    #[test]
    fn enter_queues_submit() {
        let mut app = test_app();
        app.drain_requests();
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.drain_requests(), vec![Request::Submit, Request::Submit]);
    }

    #[test]
    fn f5_queues_refresh_and_f2_toggles_filter() {
        let mut app = test_app();
        app.drain_requests();
        handle_key(&mut app, key(KeyCode::F(5)));
        assert_eq!(app.drain_requests(), vec![Request::RefreshTree]);
        handle_key(&mut app, key(KeyCode::F(2)));
        assert!(app.results.tree_only);
    }

    #[test]
    fn space_toggles_checkbox() {
        let mut app = test_app();
        app.select_index(2); // Delete: id, single
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Char(' ')));
        let sub = app.controller.prepare_submit().unwrap();
        assert_eq!(sub.args["single"], ArgValue::Flag(true));
    }

    #[test]
    fn ctrl_r_resets_form() {
        let mut app = test_app();
        app.select_index(4); // Level: id = 7
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Char('3')));
        handle_key(&mut app, with(KeyCode::Char('r'), KeyModifiers::CONTROL));
        let sub = app.controller.prepare_submit().unwrap();
        assert_eq!(sub.args["id"], ArgValue::Text("7".into()));
    }

    #[test]
    fn tab_moves_focus_to_tree() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Tree);
        // Arrow keys now drive the tree, not the tabs.
        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.controller.current(), Some(OperationKey::Create));
    }
}
