use super::*;

#[test]
fn navigation_wraps_in_both_directions() {
    let mut app = App::new();
    app.prev(3);
    assert_eq!(app.selected, 2);
    app.next(3);
    assert_eq!(app.selected, 0);
    app.next(3);
    assert_eq!(app.selected, 1);
}

#[test]
fn navigation_on_empty_list_does_nothing() {
    let mut app = App::new();
    app.next(0);
    app.prev(0);
    assert_eq!(app.selected, 0);
    assert!(app.follow_playback);
}

#[test]
fn manual_navigation_stops_following_playback() {
    let mut app = App::new();
    app.follow(Some(4));
    assert_eq!(app.selected, 4);

    app.next(10);
    app.follow(Some(7));
    assert_eq!(app.selected, 5);
}

#[test]
fn clamp_selection_after_removals() {
    let mut app = App::new();
    app.selected = 5;
    app.clamp_selection(3);
    assert_eq!(app.selected, 2);
    app.clamp_selection(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn gg_requires_two_presses() {
    let mut app = App::new();
    assert!(!app.press_g());
    assert!(app.press_g());
    assert!(!app.press_g());
    app.reset_prefix();
    assert!(!app.press_g());
}

#[test]
fn select_first_and_last() {
    let mut app = App::new();
    app.select_last(4);
    assert_eq!(app.selected, 3);
    app.select_first();
    assert_eq!(app.selected, 0);
    app.select_last(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn path_prompt_collects_and_hands_back_input() {
    let mut app = App::new();
    app.enter_add_mode();
    assert_eq!(app.mode, InputMode::AddPath);
    for c in "~/Music/x".chars() {
        app.push_char(c);
    }
    app.pop_char();
    assert_eq!(app.take_input(), "~/Music/");
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.input.is_empty());

    app.enter_add_mode();
    app.push_char('a');
    app.cancel_input();
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.input.is_empty());
}
