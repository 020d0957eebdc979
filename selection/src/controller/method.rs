use std::str::FromStr;

use crate::error::SelectionError;

/// Operations reachable through [`super::Selection::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Toggle,
    Open,
    Close,
    Reset,
    Clear,
    Dispose,
    Refresh,
}

impl FromStr for Method {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle" => Ok(Method::Toggle),
            "open" => Ok(Method::Open),
            "close" => Ok(Method::Close),
            "reset" => Ok(Method::Reset),
            "clear" => Ok(Method::Clear),
            "dispose" => Ok(Method::Dispose),
            "refresh" => Ok(Method::Refresh),
            other => Err(SelectionError::InvalidMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        assert_eq!("reset".parse::<Method>().unwrap(), Method::Reset);
        assert_eq!("toggle".parse::<Method>().unwrap(), Method::Toggle);
    }

    #[test]
    fn test_unknown_method_names_the_method() {
        let err = "_saveMemory".parse::<Method>().unwrap_err();
        assert_eq!(err.to_string(), "No method named \"_saveMemory\"");
    }
}
