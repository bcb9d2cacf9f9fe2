// crates/ldu_foundation/src/stream/token.rs

//! 词法分析

use crate::error::{LduError, LduResult};
use std::fmt;

/// 词法单元
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// 标点符号
    Punct(char),
    /// 裸单词（含数字字面量）
    Word(String),
    /// 引号字符串（已去除引号与转义）
    Str(String),
}

impl Token {
    /// 是否为指定标点
    #[inline]
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, Token::Punct(p) if *p == c)
    }

    /// 单词或字符串的文本
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Word(s) | Token::Str(s) => Some(s),
            Token::Punct(_) => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Punct(c) => write!(f, "'{}'", c),
            Token::Word(w) => write!(f, "{}", w),
            Token::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// 带位置的词法单元
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// 词法单元
    pub token: Token,
    /// 行号（从 1 开始）
    pub line: usize,
    /// 列号（从 1 开始）
    pub column: usize,
}

/// 判断字符是否为标点
#[inline]
pub(crate) fn is_punct(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ';')
}

/// 判断字符是否可出现在裸单词中
#[inline]
pub(crate) fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !is_punct(c) && c != '"'
}

struct Lexer<'s> {
    chars: std::iter::Peekable<std::str::Chars<'s>>,
    line: usize,
    column: usize,
}

impl<'s> Lexer<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.chars.clone();
        it.next();
        it.next()
    }

    /// 跳过空白与注释
    fn skip_trivia(&mut self) -> LduResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    let mut prev = '\0';
                    loop {
                        match self.bump() {
                            Some('/') if prev == '*' => break,
                            Some(c) => prev = c,
                            None => {
                                return Err(LduError::parse(line, column, "注释", "块注释未闭合"))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> LduResult<Option<Spanned>> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = if is_punct(c) {
            self.bump();
            Token::Punct(c)
        } else if c == '"' {
            self.bump();
            let mut s = String::new();
            loop {
                match self.bump() {
                    Some('"') => break,
                    Some('\\') => match self.bump() {
                        Some(e) => s.push(e),
                        None => {
                            return Err(LduError::parse(line, column, "字符串", "转义序列不完整"))
                        }
                    },
                    Some(ch) => s.push(ch),
                    None => return Err(LduError::parse(line, column, "字符串", "字符串未闭合")),
                }
            }
            Token::Str(s)
        } else {
            let mut s = String::new();
            while let Some(ch) = self.peek() {
                if !is_word_char(ch) {
                    break;
                }
                s.push(ch);
                self.bump();
            }
            Token::Word(s)
        };

        Ok(Some(Spanned {
            token,
            line,
            column,
        }))
    }
}

/// 将文本切分为带位置的词法单元
pub fn tokenize(src: &str) -> LduResult<Vec<Spanned>> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        out.push(tok);
    }
    Ok(out)
}
