use std::str::FromStr;
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Hide,
    NextPage,
    PreviousPage,
    Add(String),
    ConfigReload,
}

/// First word of a socket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Show,
    Hide,
    Next,
    #[strum(to_string = "prev", serialize = "previous")]
    Prev,
    Add,
}

impl FromStr for AppEvent {
    type Err = strum::ParseError;

    /// Parses one socket line, e.g. `show` or `add some text`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        Ok(match verb.parse::<Verb>()? {
            Verb::Show => Self::Show,
            Verb::Hide => Self::Hide,
            Verb::Next => Self::NextPage,
            Verb::Prev => Self::PreviousPage,
            Verb::Add => Self::Add(rest.trim().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_socket_lines() {
        let cases = vec![
            ("show", AppEvent::Show),
            ("  HIDE \n", AppEvent::Hide),
            ("next", AppEvent::NextPage),
            ("prev", AppEvent::PreviousPage),
            ("previous", AppEvent::PreviousPage),
            ("add hello world", AppEvent::Add("hello world".to_string())),
            ("add", AppEvent::Add(String::new())),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<AppEvent>().unwrap(), expected);
        }
        assert!("reload".parse::<AppEvent>().is_err());
        assert!("".parse::<AppEvent>().is_err());
    }

    #[test]
    fn test_verb_display_matches_wire_format() {
        assert_eq!(Verb::Prev.to_string(), "prev");
        assert_eq!(Verb::Add.to_string(), "add");
    }
}
