/// A single unit of lexical structure in a program's source text.
///
/// `lexeme_start`/`lexeme_length` describe a span into the source character
/// buffer that produced the scanner; that buffer must outlive every `Token`
/// derived from it.
#[derive(Debug, Clone, Copy)]
pub struct Token {
  pub kind: TokenKind,
  pub lexeme_start: usize,
  pub lexeme_length: usize,
  pub line: usize,
}

impl Token {
  /// Reconstructs this token's lexeme from the source it was scanned from.
  ///
  /// For `ERROR` tokens, returns the diagnostic text carried by the token
  /// instead of slicing the source (the scanner never advances past the
  /// offending span for those).
  pub fn lexeme(&self, source: &[char]) -> String {
    match &self.kind {
      TokenKind::ERROR(e) => e.message().to_string(),
      _ => source[self.lexeme_start..self.lexeme_start + self.lexeme_length].iter().collect(),
    }
  }
}

/// The closed set of token kinds this language's scanner ever produces.
/// `ERROR` and `EOF` are reserved sentinels.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  // Single-character tokens.
  LEFT_PAREN,
  RIGHT_PAREN,
  LEFT_BRACE,
  RIGHT_BRACE,
  COMMA,
  DOT,
  MINUS,
  PLUS,
  SEMICOLON,
  SLASH,
  STAR,

  // One or two character tokens.
  BANG,
  BANG_EQUAL,
  EQUAL,
  EQUAL_EQUAL,
  GREATER,
  GREATER_EQUAL,
  LESS,
  LESS_EQUAL,

  // Literals.
  IDENTIFIER,
  STRING,
  NUMBER,

  // Keywords.
  AND,
  CLASS,
  ELSE,
  FALSE,
  FOR,
  FUN,
  IF,
  NIL,
  OR,
  PRINT,
  RETURN,
  SUPER,
  THIS,
  TRUE,
  VAR,
  WHILE,

  ERROR(ErrorTokenKind),
  EOF,
}

/// The fixed keyword table, keyed by the identifier's exact text.
pub fn keyword_or_identifier(id: &str) -> TokenKind {
  match id {
    "and" => TokenKind::AND,
    "class" => TokenKind::CLASS,
    "else" => TokenKind::ELSE,
    "false" => TokenKind::FALSE,
    "for" => TokenKind::FOR,
    "fun" => TokenKind::FUN,
    "if" => TokenKind::IF,
    "nil" => TokenKind::NIL,
    "or" => TokenKind::OR,
    "print" => TokenKind::PRINT,
    "return" => TokenKind::RETURN,
    "super" => TokenKind::SUPER,
    "this" => TokenKind::THIS,
    "true" => TokenKind::TRUE,
    "var" => TokenKind::VAR,
    "while" => TokenKind::WHILE,
    _ => TokenKind::IDENTIFIER,
  }
}

/// The diagnostic text a scanner-level `ERROR` token carries as its lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTokenKind {
  UnterminatedString,
  UnexpectedChar,
}

impl ErrorTokenKind {
  pub fn message(&self) -> &'static str {
    match self {
      ErrorTokenKind::UnterminatedString => "Unterminated string.",
      ErrorTokenKind::UnexpectedChar => "Unexpected character.",
    }
  }
}
