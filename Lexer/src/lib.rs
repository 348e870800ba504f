use core::tokens::{keyword_or_identifier, ErrorTokenKind, Token, TokenKind};

/// Scans source text into a stream of [`Token`]s, one at a time, on demand.
///
/// `source` is held as a `Vec<char>` rather than a `&str` so that byte
/// offsets never need to track UTF-8 boundaries: every `Token`'s
/// `lexeme_start`/`lexeme_length` index this buffer directly.
pub struct Lexer {
  source: Vec<char>,
  start: usize,
  current: usize,
  line: usize,
}

impl Lexer {
  pub fn new(source: &str) -> Self {
    Lexer { source: source.chars().collect(), start: 0, current: 0, line: 1 }
  }

  /// Returns a reference to the character buffer backing every token this
  /// lexer has produced or will produce, for reconstructing lexemes later.
  pub fn source_chars(&self) -> &[char] {
    &self.source
  }

  /// Scans and returns the next token, advancing past any leading
  /// whitespace and comments first.
  pub fn scan_token(&mut self) -> Token {
    self.skip_whitespace_and_comments();
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenKind::EOF);
    }

    let c = self.advance();

    if is_alpha(c) {
      return self.identifier();
    }
    if c.is_ascii_digit() {
      return self.number();
    }

    match c {
      '(' => self.make_token(TokenKind::LEFT_PAREN),
      ')' => self.make_token(TokenKind::RIGHT_PAREN),
      '{' => self.make_token(TokenKind::LEFT_BRACE),
      '}' => self.make_token(TokenKind::RIGHT_BRACE),
      ';' => self.make_token(TokenKind::SEMICOLON),
      ',' => self.make_token(TokenKind::COMMA),
      '.' => self.make_token(TokenKind::DOT),
      '-' => self.make_token(TokenKind::MINUS),
      '+' => self.make_token(TokenKind::PLUS),
      '/' => self.make_token(TokenKind::SLASH),
      '*' => self.make_token(TokenKind::STAR),
      '!' => {
        let kind = if self.match_char('=') { TokenKind::BANG_EQUAL } else { TokenKind::BANG };
        self.make_token(kind)
      }
      '=' => {
        let kind = if self.match_char('=') { TokenKind::EQUAL_EQUAL } else { TokenKind::EQUAL };
        self.make_token(kind)
      }
      '<' => {
        let kind = if self.match_char('=') { TokenKind::LESS_EQUAL } else { TokenKind::LESS };
        self.make_token(kind)
      }
      '>' => {
        let kind =
          if self.match_char('=') { TokenKind::GREATER_EQUAL } else { TokenKind::GREATER };
        self.make_token(kind)
      }
      '"' => self.string(),
      _ => self.error_token(ErrorTokenKind::UnexpectedChar),
    }
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn advance(&mut self) -> char {
    let c = self.source[self.current];
    self.current += 1;
    c
  }

  fn peek(&self) -> char {
    if self.is_at_end() {
      '\0'
    } else {
      self.source[self.current]
    }
  }

  fn peek_next(&self) -> char {
    if self.current + 1 >= self.source.len() {
      '\0'
    } else {
      self.source[self.current + 1]
    }
  }

  fn match_char(&mut self, expected: char) -> bool {
    if self.is_at_end() || self.source[self.current] != expected {
      return false;
    }
    self.current += 1;
    true
  }

  fn skip_whitespace_and_comments(&mut self) {
    loop {
      match self.peek() {
        ' ' | '\r' | '\t' => {
          self.advance();
        }
        '\n' => {
          self.line += 1;
          self.advance();
        }
        '/' if self.peek_next() == '/' => {
          while self.peek() != '\n' && !self.is_at_end() {
            self.advance();
          }
        }
        _ => return,
      }
    }
  }

  fn string(&mut self) -> Token {
    while self.peek() != '"' && !self.is_at_end() {
      if self.peek() == '\n' {
        self.line += 1;
      }
      self.advance();
    }

    if self.is_at_end() {
      return self.error_token(ErrorTokenKind::UnterminatedString);
    }

    // Consume the closing quote.
    self.advance();
    self.make_token(TokenKind::STRING)
  }

  fn number(&mut self) -> Token {
    while self.peek().is_ascii_digit() {
      self.advance();
    }

    if self.peek() == '.' && self.peek_next().is_ascii_digit() {
      self.advance();
      while self.peek().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenKind::NUMBER)
  }

  fn identifier(&mut self) -> Token {
    while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
      self.advance();
    }
    let text: String = self.source[self.start..self.current].iter().collect();
    self.make_token(keyword_or_identifier(&text))
  }

  fn make_token(&self, kind: TokenKind) -> Token {
    Token {
      kind,
      lexeme_start: self.start,
      lexeme_length: self.current - self.start,
      line: self.line,
    }
  }

  fn error_token(&self, kind: ErrorTokenKind) -> Token {
    Token { kind: TokenKind::ERROR(kind), lexeme_start: self.start, lexeme_length: 0, line: self.line }
  }
}

fn is_alpha(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scan_all(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut kinds = Vec::new();
    loop {
      let token = lexer.scan_token();
      let done = token.kind == TokenKind::EOF;
      kinds.push(token.kind);
      if done {
        break;
      }
    }
    kinds
  }

  #[test]
  fn scans_arithmetic_expression() {
    let kinds = scan_all("1 + 2 * 3");
    assert_eq!(
      kinds,
      vec![
        TokenKind::NUMBER,
        TokenKind::PLUS,
        TokenKind::NUMBER,
        TokenKind::STAR,
        TokenKind::NUMBER,
        TokenKind::EOF,
      ]
    );
  }

  #[test]
  fn two_char_operators_are_not_split() {
    let kinds = scan_all("a != b >= c");
    assert_eq!(
      kinds,
      vec![
        TokenKind::IDENTIFIER,
        TokenKind::BANG_EQUAL,
        TokenKind::IDENTIFIER,
        TokenKind::GREATER_EQUAL,
        TokenKind::IDENTIFIER,
        TokenKind::EOF,
      ]
    );
  }

  #[test]
  fn keywords_are_recognized_not_identifiers() {
    let kinds = scan_all("true false nil");
    assert_eq!(kinds, vec![TokenKind::TRUE, TokenKind::FALSE, TokenKind::NIL, TokenKind::EOF]);
  }

  #[test]
  fn trailing_dot_with_no_digits_is_two_tokens() {
    let kinds = scan_all("1.");
    assert_eq!(kinds, vec![TokenKind::NUMBER, TokenKind::DOT, TokenKind::EOF]);
  }

  #[test]
  fn unterminated_string_reports_error_token() {
    let mut lexer = Lexer::new("\"abc");
    let token = lexer.scan_token();
    assert!(matches!(token.kind, TokenKind::ERROR(ErrorTokenKind::UnterminatedString)));
  }

  #[test]
  fn unknown_character_reports_error_token() {
    let mut lexer = Lexer::new("@");
    let token = lexer.scan_token();
    assert!(matches!(token.kind, TokenKind::ERROR(ErrorTokenKind::UnexpectedChar)));
  }

  #[test]
  fn line_counting_tracks_newlines_inside_strings() {
    let mut lexer = Lexer::new("\"a\nb\" 1");
    lexer.scan_token();
    let token = lexer.scan_token();
    assert_eq!(token.line, 2);
  }
}
