//! Rule-set text parsing.
//!
//! Lexing and literal parsing only: field semantics are checked by
//! `validate`.

mod error;
mod lexer;
mod parser;
mod rule_parts;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, split_lines};
pub use parser::{ParsedRuleSet, parse_rule_set};
pub use rule_parts::{RuleKey, RulePart, RuleParts, parse_rule_parts};
pub use values::{parse_date, parse_date_value, parse_datetime, parse_time};
