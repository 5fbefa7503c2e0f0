//! Restartable lexer.
//!
//! `next_token(input, pos)` scans exactly one token starting at byte offset
//! `pos` and never mutates shared state, so the parser is free to re-read a
//! position as many times as its backtracking needs.

use crate::error::ParseError;
use crate::token::{Span, Token, TokenKind};

/// Two-character symbols are matched before one-character ones, so `<=`
/// wins over `<` and `/\` over `/`.
const TWO_CHAR_SYMBOLS: &[(&str, TokenKind)] = &[
    ("->", TokenKind::Arrow),
    ("=>", TokenKind::FatArrow),
    ("==", TokenKind::DoubleEq),
    ("!=", TokenKind::Neq),
    ("<=", TokenKind::Leq),
    (">=", TokenKind::Geq),
    ("\\/", TokenKind::Or),
    ("/\\", TokenKind::And),
];

const ONE_CHAR_SYMBOLS: &[(u8, TokenKind)] = &[
    (b'=', TokenKind::Eq),
    (b'+', TokenKind::Plus),
    (b'-', TokenKind::Minus),
    (b'*', TokenKind::Star),
    (b'/', TokenKind::Slash),
    (b',', TokenKind::Comma),
    (b'&', TokenKind::Amp),
    (b'\\', TokenKind::Backslash),
    (b'|', TokenKind::Bar),
    (b':', TokenKind::Colon),
    (b'<', TokenKind::Less),
    (b'>', TokenKind::Greater),
    (b'{', TokenKind::LBrace),
    (b'}', TokenKind::RBrace),
    (b'(', TokenKind::LParen),
    (b')', TokenKind::RParen),
];

fn keyword(lexeme: &str) -> Option<TokenKind> {
    match lexeme {
        "let" => Some(TokenKind::Let),
        "letfun" => Some(TokenKind::LetFun),
        "in" => Some(TokenKind::In),
        "if" => Some(TokenKind::If),
        "then" => Some(TokenKind::Then),
        "else" => Some(TokenKind::Else),
        "rand" => Some(TokenKind::Rand),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "Prob" => Some(TokenKind::Prob),
        "not" => Some(TokenKind::Not),
        "dummy" => Some(TokenKind::Dummy),
        _ => None,
    }
}

fn skip_spaces(input: &str, mut pos: usize) -> usize {
    while let Some(c) = input[pos..].chars().next() {
        if !c.is_whitespace() {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

/// Length in bytes of an identifier starting at `pos`, or 0 if none starts
/// there. Identifiers are `[A-Za-z][A-Za-z0-9_]*`.
fn ident_len(bytes: &[u8], pos: usize) -> usize {
    if pos >= bytes.len() || !bytes[pos].is_ascii_alphabetic() {
        return 0;
    }
    let mut len = 1;
    while pos + len < bytes.len()
        && (bytes[pos + len].is_ascii_alphanumeric() || bytes[pos + len] == b'_')
    {
        len += 1;
    }
    len
}

/// Scan the next token at `pos`. Whitespace is skipped first; at end of
/// input an `Eof` token with an empty lexeme is produced.
pub fn next_token(input: &str, pos: usize) -> Result<Token, ParseError> {
    let pos = skip_spaces(input, pos);
    let bytes = input.as_bytes();

    if pos >= bytes.len() {
        return Ok(Token::new(TokenKind::Eof, "", Span::new(pos, pos)));
    }

    // Integer literal; a leading minus sticks to the literal whenever a
    // digit follows it directly.
    if bytes[pos].is_ascii_digit()
        || (bytes[pos] == b'-' && pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit())
    {
        let mut len = 1;
        while pos + len < bytes.len() && bytes[pos + len].is_ascii_digit() {
            len += 1;
        }
        return Ok(Token::new(
            TokenKind::Int,
            &input[pos..pos + len],
            Span::new(pos, pos + len),
        ));
    }

    for (symbol, kind) in TWO_CHAR_SYMBOLS {
        if input[pos..].starts_with(symbol) {
            return Ok(Token::new(*kind, *symbol, Span::new(pos, pos + symbol.len())));
        }
    }

    for (byte, kind) in ONE_CHAR_SYMBOLS {
        if bytes[pos] == *byte {
            return Ok(Token::new(
                *kind,
                &input[pos..pos + 1],
                Span::new(pos, pos + 1),
            ));
        }
    }

    let len = ident_len(bytes, pos);
    if len != 0 {
        let lexeme = &input[pos..pos + len];
        let kind = keyword(lexeme).unwrap_or(TokenKind::Ident);
        return Ok(Token::new(kind, lexeme, Span::new(pos, pos + len)));
    }

    let char_len = input[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
    Err(ParseError::unknown_token(Span::new(pos, pos + char_len)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_at(input: &str, pos: usize) -> Token {
        next_token(input, pos).expect("token")
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(token_at("let a = 1", 0).kind, TokenKind::Let);
        let ident = token_at("let abc = 1", 3);
        assert_eq!(ident.kind, TokenKind::Ident);
        assert_eq!(ident.lexeme, "abc");
        assert_eq!(ident.span, Span::new(4, 7));
    }

    #[test]
    fn restartable_at_any_offset() {
        let input = "if x then 1 else 2";
        assert_eq!(token_at(input, 0).kind, TokenKind::If);
        assert_eq!(token_at(input, 0).kind, TokenKind::If);
        assert_eq!(token_at(input, 2).kind, TokenKind::Ident);
        assert_eq!(token_at(input, 4).kind, TokenKind::Then);
    }

    #[test]
    fn two_char_symbols_win_over_one_char() {
        assert_eq!(token_at("<= 1", 0).kind, TokenKind::Leq);
        assert_eq!(token_at("< 1", 0).kind, TokenKind::Less);
        assert_eq!(token_at("=> x", 0).kind, TokenKind::FatArrow);
        assert_eq!(token_at("= x", 0).kind, TokenKind::Eq);
        assert_eq!(token_at("/\\ y", 0).kind, TokenKind::And);
        assert_eq!(token_at("/ y", 0).kind, TokenKind::Slash);
        assert_eq!(token_at("\\/ y", 0).kind, TokenKind::Or);
        assert_eq!(token_at("\\x", 0).kind, TokenKind::Backslash);
    }

    #[test]
    fn minus_attaches_to_following_digit() {
        let neg = token_at("-3", 0);
        assert_eq!(neg.kind, TokenKind::Int);
        assert_eq!(neg.lexeme, "-3");

        let minus = token_at("- 3", 0);
        assert_eq!(minus.kind, TokenKind::Minus);
    }

    #[test]
    fn eof_has_empty_lexeme_at_input_length() {
        let token = token_at("ab  ", 2);
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.lexeme, "");
        assert_eq!(token.span, Span::new(4, 4));
    }

    #[test]
    fn unknown_character_reports_its_position() {
        let err = next_token("a % b", 1).expect_err("unknown token");
        assert_eq!(err.span.start, 2);
    }

    #[test]
    fn prob_keyword_is_case_sensitive() {
        assert_eq!(token_at("Prob(x)", 0).kind, TokenKind::Prob);
        assert_eq!(token_at("prob(x)", 0).kind, TokenKind::Ident);
    }
}
