//! Filter operator tokens
//!
//! Operator names are case-sensitive and several spellings map to the same
//! operator (`ne`, `neq`, `!eq`). The table is a `logos` lexer; an operator
//! segment is valid only when one token spans all of it.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorToken {
    #[token("eq")]
    Eq,
    #[token("ieq")]
    IEq,
    #[token("ne")]
    #[token("neq")]
    #[token("!eq")]
    Ne,
    #[token("gt")]
    Gt,
    #[token("lt")]
    Lt,
    #[token("ge")]
    #[token("gte")]
    Ge,
    #[token("le")]
    #[token("lte")]
    Le,

    #[token("like")]
    Like,
    #[token("!like")]
    NotLike,
    #[token("$like")]
    StartLike,
    #[token("!$like")]
    NotStartLike,
    #[token("like$")]
    EndLike,
    #[token("!like$")]
    NotEndLike,
    #[token("ilike")]
    ILike,
    #[token("!ilike")]
    NotILike,
    #[token("startsWith")]
    #[token("$ilike")]
    StartILike,
    #[token("!$ilike")]
    NotStartILike,
    #[token("endsWith")]
    #[token("ilike$")]
    EndILike,
    #[token("!ilike$")]
    NotEndILike,

    #[token("token")]
    Token,
    #[token("!token")]
    NotToken,

    #[token("in")]
    In,
    #[token("!in")]
    NotIn,

    #[token("null")]
    Null,
    #[token("!null")]
    NotNull,
    #[token("empty")]
    Empty,
    #[token("!empty")]
    NotEmpty,
}

impl OperatorToken {
    /// Look up an operator segment
    pub fn lex(text: &str) -> Option<Self> {
        let mut lexer = Self::lexer(text);
        let token = lexer.next()?.ok()?;
        if lexer.span().end != text.len() {
            return None;
        }
        Some(token)
    }

    /// Whether the operator takes a value segment
    pub fn requires_value(self) -> bool {
        !matches!(
            self,
            OperatorToken::Null | OperatorToken::NotNull | OperatorToken::Empty | OperatorToken::NotEmpty
        )
    }

    /// Whether the value segment is a `[a,b,c]` list
    pub fn takes_list(self) -> bool {
        matches!(self, OperatorToken::In | OperatorToken::NotIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_map_to_same_operator() {
        assert_eq!(OperatorToken::lex("ne"), Some(OperatorToken::Ne));
        assert_eq!(OperatorToken::lex("neq"), Some(OperatorToken::Ne));
        assert_eq!(OperatorToken::lex("!eq"), Some(OperatorToken::Ne));
        assert_eq!(OperatorToken::lex("gte"), Some(OperatorToken::Ge));
        assert_eq!(OperatorToken::lex("startsWith"), Some(OperatorToken::StartILike));
        assert_eq!(OperatorToken::lex("ilike$"), Some(OperatorToken::EndILike));
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(OperatorToken::lex("like"), Some(OperatorToken::Like));
        assert_eq!(OperatorToken::lex("like$"), Some(OperatorToken::EndLike));
        assert_eq!(OperatorToken::lex("!$ilike"), Some(OperatorToken::NotStartILike));
        assert_eq!(OperatorToken::lex("!empty"), Some(OperatorToken::NotEmpty));
    }

    #[test]
    fn test_rejects_partial_and_unknown() {
        assert_eq!(OperatorToken::lex("eqq"), None);
        assert_eq!(OperatorToken::lex("EQ"), None);
        assert_eq!(OperatorToken::lex("xeq"), None);
        assert_eq!(OperatorToken::lex("eq eq"), None);
        assert_eq!(OperatorToken::lex(""), None);
    }

    #[test]
    fn test_value_requirements() {
        assert!(OperatorToken::Eq.requires_value());
        assert!(!OperatorToken::Null.requires_value());
        assert!(!OperatorToken::NotEmpty.requires_value());
        assert!(OperatorToken::NotIn.takes_list());
    }
}
