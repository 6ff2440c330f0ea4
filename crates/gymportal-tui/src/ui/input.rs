//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};
use gymportal_core::Navigator;

use crate::app::{App, AppState, MAX_SEARCH_LEN, PAGE_SCROLL_SIZE};
use crate::form::{can_add_char, FormAction};
use crate::route::{nav_link, Page};
use crate::screens;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
                false
            }
            _ => false,
        },
        AppState::ShowingMenu => {
            handle_menu_input(app, key);
            false
        }
        AppState::Searching => {
            handle_search_input(app, key);
            false
        }
        AppState::Editing => {
            handle_form_input(app, key);
            false
        }
        AppState::Normal => handle_normal_input(app, key),
        AppState::Quitting => true,
    }
}

fn handle_menu_input(app: &mut App, key: KeyEvent) {
    app.state = AppState::Normal;
    if let KeyCode::Char(c) = key.code {
        if let Some(link) = nav_link(c) {
            app.history.push(link.path);
        }
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.state = AppState::Normal,
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            if can_add_char(app.search_query.chars().count(), MAX_SEARCH_LEN, c) {
                app.search_query.push(c);
            }
        }
        _ => return,
    }
    app.selection = 0;
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match app.form.handle_key(key) {
        FormAction::Submit => submit_form(app),
        FormAction::Cancel => app.state = AppState::Normal,
        FormAction::Changed("type")
            if matches!(app.page, Page::AdminMembershipCreate | Page::AdminMembershipEdit(_)) =>
        {
            screens::on_membership_type_changed(&mut app.form);
        }
        FormAction::Changed(_) | FormAction::None => {}
    }
}

fn submit_form(app: &mut App) {
    match app.page {
        Page::Login => app.submit_login(),
        Page::Contact => app.submit_contact(),
        Page::Profile => app.submit_profile(),
        Page::AdminMembershipCreate | Page::AdminMembershipEdit(_) => app.submit_membership(),
        Page::AdminNotifications => app.submit_notification(),
        _ => {}
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('g') => app.state = AppState::ShowingMenu,
        KeyCode::Char('l') => app.open_login(),
        KeyCode::Char('o') => app.sign_out(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Esc => app.go_back(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.selection = app.list_len().saturating_sub(1),
        _ if !app.guard.can_render() => {}
        KeyCode::Enter | KeyCode::Char('e') if app.page.has_form() => app.state = AppState::Editing,
        KeyCode::Enter => app.activate_selection(),
        KeyCode::Char('/') if matches!(app.page, Page::Blog | Page::Shop | Page::AdminMemberships) => {
            app.state = AppState::Searching;
        }
        KeyCode::Char(c) => handle_page_key(app, c),
        _ => {}
    }
    false
}

/// Letter shortcuts that only mean something on one page.
fn handle_page_key(app: &mut App, c: char) {
    let page = app.page.clone();
    match (&page, c) {
        (Page::Blog | Page::Shop, 'c') => app.cycle_category(),
        (Page::Shop, 'a') => app.add_selected_to_cart(),
        (Page::Shop, 'x') => app.remove_selected_from_cart(),
        (Page::Shop, 'X') => app.clear_cart(),
        (Page::Dashboard, 'p') => app.history.push("/dashboard/profile"),
        (Page::Dashboard, 'a') if app.session.is_admin() => app.history.push("/admin"),
        (Page::AdminMemberships, 'f') => app.cycle_status_filter(),
        (Page::AdminMemberships, 'n') => app.renew_selected_membership(),
        (Page::AdminMemberships, 'a') => app.toggle_selected_auto_renew(),
        (Page::AdminMemberships, 'c') => app.create_membership(),
        (Page::AdminMemberships, 'e') => app.edit_selected_membership(),
        (Page::AdminMemberships, 'x') => app.check_expired_memberships(),
        (Page::AdminNotifications, 't') => app.cycle_notification_kind(),
        (Page::AdminNotifications, ' ') => app.toggle_recipient(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use gymportal_core::auth::MemorySessionStore;
    use gymportal_core::config::Config;
    use gymportal_core::navigation::Navigator;

    fn app() -> App {
        let config = Config {
            api_url: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        App::with_store(config, Arc::new(MemorySessionStore::new())).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_quit_needs_confirmation() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);
        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_menu_navigates_by_letter() {
        let mut app = app();
        app.start();
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.state, AppState::ShowingMenu);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.history.current_path(), "/blog");
    }

    #[tokio::test]
    async fn test_search_typing_and_escape_clears() {
        let mut app = app();
        app.state = AppState::Searching;
        for c in "fuerza".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.search_query, "fuerza");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_query, "fuerz");
        press(&mut app, KeyCode::Esc);
        assert!(app.search_query.is_empty());
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_page_keys_wait_for_guard() {
        let mut app = app();
        app.history.push("/shop");
        app.start();
        assert!(!app.guard.can_render());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Normal);

        app.session.initialize().await;
        app.check_background_tasks();
        assert!(app.guard.can_render());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);
    }

    #[tokio::test]
    async fn test_escape_leaves_login_form() {
        let mut app = app();
        app.history.push("/login");
        app.start();
        app.session.initialize().await;
        app.check_background_tasks();
        assert_eq!(app.state, AppState::Editing);

        press(&mut app, KeyCode::Char('a'));
        assert!(app.form.text("email").ends_with('a'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }
}
