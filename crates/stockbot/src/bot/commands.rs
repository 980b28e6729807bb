//! Command parsing for the stock quote bot
//!
//! Only slash commands are answered. `/stock <symbol>`, `/<symbol>` and the
//! bare forms `/` and `/stock` (which quote the fallback symbol) are accepted;
//! every other message is ignored without a reply.

/// Command token stripped before the symbol is read, compared upper-cased
const STOCK_TOKEN: &str = "STOCK";

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quote request for a normalized (upper-case) ticker symbol
    Quote { symbol: String },
    /// Not a command; no reply is sent
    Ignored,
}

impl Command {
    /// Parse a command from message text
    ///
    /// `fallback_symbol` is quoted when the command carries no ticker.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockbot::bot::Command;
    ///
    /// assert_eq!(Command::parse("/STOCK/aapl", "PLTR").symbol(), Some("AAPL"));
    /// assert_eq!(Command::parse("/stock", "PLTR").symbol(), Some("PLTR"));
    /// assert_eq!(Command::parse("hello", "PLTR"), Command::Ignored);
    /// ```
    pub fn parse(input: &str, fallback_symbol: &str) -> Self {
        let text = input.trim().to_uppercase();

        if !text.starts_with('/') {
            return Command::Ignored;
        }

        let symbol = strip_command(&text)
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        if symbol.is_empty() {
            return Command::Quote {
                symbol: fallback_symbol.trim().to_uppercase(),
            };
        }

        Command::Quote { symbol }
    }

    /// The requested symbol, if this is a quote command
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Command::Quote { symbol } => Some(symbol),
            Command::Ignored => None,
        }
    }
}

/// Drop leading slashes, whitespace and standalone `stock` tokens.
///
/// `stockx` is a symbol, not the command, so the token must be followed by
/// the end of input, whitespace or another slash. Repeated tokens are all
/// removed so the returned text never starts with the command.
fn strip_command(text: &str) -> &str {
    let mut rest = trim_separators(text);
    while let Some(after) = strip_stock_token(rest) {
        rest = trim_separators(after);
    }
    rest
}

fn trim_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '/' || c.is_whitespace())
}

fn strip_stock_token(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(STOCK_TOKEN)?;
    let at_boundary =
        rest.is_empty() || rest.starts_with('/') || rest.starts_with(char::is_whitespace);
    at_boundary.then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(input: &str) -> Command {
        Command::parse(input, "PLTR")
    }

    fn quote(symbol: &str) -> Command {
        Command::Quote {
            symbol: symbol.to_string(),
        }
    }

    #[test]
    fn test_parse_stock_command() {
        assert_eq!(parse("/stock nvda"), quote("NVDA"));
        assert_eq!(parse("/STOCK/tsla"), quote("TSLA"));
        assert_eq!(parse("/STOCK/aapl"), quote("AAPL"));
        assert_eq!(parse("/Stock   msft  "), quote("MSFT"));
    }

    #[test]
    fn test_parse_bare_symbol() {
        assert_eq!(parse("  /AAPL  "), quote("AAPL"));
        assert_eq!(parse("//goog"), quote("GOOG"));
        assert_eq!(parse("/brk-b"), quote("BRK-B"));
    }

    #[test]
    fn test_parse_fallback() {
        assert_eq!(parse("/"), quote("PLTR"));
        assert_eq!(parse("/stock"), quote("PLTR"));
        assert_eq!(parse("  /STOCK  "), quote("PLTR"));
        assert_eq!(parse("/stock/"), quote("PLTR"));
        assert_eq!(Command::parse("/", "spy"), quote("SPY"));
    }

    #[test]
    fn test_stock_prefix_without_boundary_is_symbol() {
        assert_eq!(parse("/stockx"), quote("STOCKX"));
    }

    #[test]
    fn test_parse_ignored() {
        assert_eq!(parse("hello"), Command::Ignored);
        assert_eq!(parse("stock aapl"), Command::Ignored);
        assert_eq!(parse(""), Command::Ignored);
        assert_eq!(parse("   "), Command::Ignored);
        assert_eq!(parse("aapl/"), Command::Ignored);
    }

    #[test]
    fn test_stock_token_after_separators() {
        assert_eq!(parse("//stock"), quote("PLTR"));
        assert_eq!(parse("/ stock"), quote("PLTR"));
        assert_eq!(parse("/ stock amd"), quote("AMD"));
        assert_eq!(parse("//stock/x"), quote("X"));
        assert_eq!(parse("/stock stock"), quote("PLTR"));
        assert_eq!(parse("/stock/stock/meta"), quote("META"));
        assert_eq!(parse("/ /brk/b"), quote("BRK/B"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let inputs = [
            "/stock nvda",
            "/STOCK/tsla",
            "  /AAPL  ",
            "/",
            "/stock",
            "//goog",
            "/brk-b",
            "/stock 2330.tw",
            "//stock",
            "/ stock",
            "//stock/x",
            "/stock stock",
            "/stockx",
            "/ſtock",
        ];

        for input in inputs {
            let symbol = parse(input).symbol().map(str::to_string).unwrap();
            let again = parse(&format!("/{symbol}"));
            assert_eq!(again.symbol(), Some(symbol.as_str()), "input: {input:?}");
        }
    }

    #[test]
    fn test_symbol_accessor() {
        assert_eq!(parse("/aapl").symbol(), Some("AAPL"));
        assert_eq!(parse("aapl").symbol(), None);
    }

    proptest! {
        #[test]
        fn prop_reparsing_symbol_is_stable(
            input in "/[ /a-zA-Z0-9.\\-]{0,16}(stock|STOCK|Stock)?[ /a-z]{0,6}"
        ) {
            let symbol = parse(&input).symbol().map(str::to_string);
            prop_assert!(symbol.is_some());
            let symbol = symbol.unwrap_or_default();
            let again = parse(&format!("/{symbol}"));
            prop_assert_eq!(again.symbol(), Some(symbol.as_str()));
        }

        #[test]
        fn prop_any_slash_text_is_stable(tail in "[ -~]{0,24}") {
            let input = format!("/{tail}");
            let symbol = parse(&input).symbol().map(str::to_string).unwrap_or_default();
            let again = parse(&format!("/{symbol}"));
            prop_assert_eq!(again.symbol(), Some(symbol.as_str()));
        }
    }
}
