use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    LaunchOne,
    LaunchBurst,
}

/// `q`, `Esc` or Ctrl+C quit; `1` launches one firework, `2` a burst.
/// Everything else is ignored.
pub fn action_for(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return None;
    };

    if *kind == KeyEventKind::Release {
        return None;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::LaunchOne),
        KeyCode::Char('2') => Some(Action::LaunchBurst),
        _ => None,
    }
}
