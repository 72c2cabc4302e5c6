use crate::error::CliError;

/// What the user asked for via the positional STATE argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Show,
    Set(bool),
}

/// `on`/`off` in any case set the switch; no value (or an empty one) shows it.
pub fn parse_action(state: Option<&str>) -> Result<Action, CliError> {
    match state {
        None | Some("") => Ok(Action::Show),
        Some(s) if s.eq_ignore_ascii_case("on") => Ok(Action::Set(true)),
        Some(s) if s.eq_ignore_ascii_case("off") => Ok(Action::Set(false)),
        Some(other) => Err(CliError::InvalidState {
            value: other.to_owned(),
        }),
    }
}
