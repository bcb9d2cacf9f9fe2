// crates/ldu_foundation/src/stream/reader.rs

//! 类型化的 token 读取器
//!
//! 所有读取方法接受一个 `context` 参数（正在读取的字段名），
//! 失败时返回带行列号与字段名的 [`LduError::Parse`]。

use super::token::{tokenize, Spanned, Token};
use crate::error::{LduError, LduResult};
use crate::scalar::{Label, Scalar};
use std::io::Read;

/// token 流读取器
#[derive(Debug, Clone)]
pub struct TokenReader {
    tokens: Vec<Spanned>,
    pos: usize,
    /// 流末尾位置，用于截断错误的定位
    end: (usize, usize),
}

impl TokenReader {
    /// 从文本创建读取器
    pub fn new(src: &str) -> LduResult<Self> {
        let tokens = tokenize(src)?;
        let end = src.lines().enumerate().last().map_or((1, 1), |(i, l)| {
            (i + 1, l.chars().count() + 1)
        });
        Ok(Self {
            tokens,
            pos: 0,
            end,
        })
    }

    /// 从任意 `Read` 源读取全部内容后创建
    pub fn from_reader<R: Read>(mut reader: R) -> LduResult<Self> {
        let mut src = String::new();
        reader.read_to_string(&mut src)?;
        Self::new(&src)
    }

    /// 是否已到流末尾
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// 查看下一个 token（不消费）
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    /// 下一个 token 的位置（行, 列）；流末尾时返回末尾位置
    pub fn position(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .map_or(self.end, |s| (s.line, s.column))
    }

    /// 在当前位置构造解析错误
    pub fn error(&self, context: &str, message: impl Into<String>) -> LduError {
        let (line, column) = self.position();
        LduError::parse(line, column, context, message)
    }

    /// 消费下一个 token
    pub fn next_token(&mut self, context: &str) -> LduResult<Token> {
        match self.tokens.get(self.pos) {
            Some(s) => {
                self.pos += 1;
                Ok(s.token.clone())
            }
            None => Err(self.error(context, "意外的流结束")),
        }
    }

    /// 回退一个 token
    fn put_back(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos -= 1;
    }

    /// 读取指定标点
    pub fn expect_punct(&mut self, c: char, context: &str) -> LduResult<()> {
        let tok = self.next_token(context)?;
        if tok.is_punct(c) {
            Ok(())
        } else {
            self.put_back();
            Err(self.error(context, format!("期望 '{}'，实际为 {}", c, tok)))
        }
    }

    /// 下一个 token 是指定标点时消费并返回 true
    pub fn accept_punct(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|t| t.is_punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// 下一个 token 是否为指定关键字
    pub fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w == keyword)
    }

    /// 读取指定关键字
    pub fn expect_keyword(&mut self, keyword: &str) -> LduResult<()> {
        let tok = self.next_token(keyword)?;
        match &tok {
            Token::Word(w) if w == keyword => Ok(()),
            _ => {
                self.put_back();
                Err(self.error(keyword, format!("期望关键字 '{}'，实际为 {}", keyword, tok)))
            }
        }
    }

    /// 读取单词或引号字符串
    pub fn read_word(&mut self, context: &str) -> LduResult<String> {
        match self.next_token(context)? {
            Token::Word(w) | Token::Str(w) => Ok(w),
            tok => {
                self.put_back();
                Err(self.error(context, format!("期望单词，实际为 {}", tok)))
            }
        }
    }

    /// 读取浮点数
    pub fn read_scalar(&mut self, context: &str) -> LduResult<Scalar> {
        match self.next_token(context)? {
            Token::Word(w) => match w.parse::<Scalar>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    self.put_back();
                    Err(self.error(context, format!("期望浮点数，实际为 '{}'", w)))
                }
            },
            tok => {
                self.put_back();
                Err(self.error(context, format!("期望浮点数，实际为 {}", tok)))
            }
        }
    }

    /// 读取非负整数
    pub fn read_label(&mut self, context: &str) -> LduResult<Label> {
        match self.next_token(context)? {
            Token::Word(w) => match w.parse::<Label>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    self.put_back();
                    Err(self.error(context, format!("期望非负整数，实际为 '{}'", w)))
                }
            },
            tok => {
                self.put_back();
                Err(self.error(context, format!("期望非负整数，实际为 {}", tok)))
            }
        }
    }

    /// 读取布尔值
    ///
    /// 接受 `true/false`、`on/off`、`yes/no`、`1/0`。
    pub fn read_bool(&mut self, context: &str) -> LduResult<bool> {
        let tok = self.next_token(context)?;
        let parsed = match &tok {
            Token::Word(w) => match w.as_str() {
                "true" | "on" | "yes" | "1" => Some(true),
                "false" | "off" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        match parsed {
            Some(b) => Ok(b),
            None => {
                self.put_back();
                Err(self.error(context, format!("期望布尔值，实际为 {}", tok)))
            }
        }
    }

    /// 读取列表，逐项调用 `item`
    ///
    /// 支持 `N(...)`、`(...)` 与 `N{v}` 三种形式。带长度前缀时校验元素个数。
    pub fn read_list<T, F>(&mut self, context: &str, item: F) -> LduResult<Vec<T>>
    where
        T: Clone,
        F: FnMut(&mut Self) -> LduResult<T>,
    {
        self.read_list_impl(context, None, item)
    }

    /// 读取长度必须为 `expected` 的列表
    ///
    /// 长度前缀在分配内存之前与 `expected` 比较。
    pub fn read_list_exact<T, F>(&mut self, context: &str, expected: Label, item: F) -> LduResult<Vec<T>>
    where
        T: Clone,
        F: FnMut(&mut Self) -> LduResult<T>,
    {
        let values = self.read_list_impl(context, Some(expected), item)?;
        if values.len() != expected {
            return Err(self.error(
                context,
                format!("期望 {} 个元素，实际读取 {} 个", expected, values.len()),
            ));
        }
        Ok(values)
    }

    fn read_list_impl<T, F>(
        &mut self,
        context: &str,
        expected: Option<Label>,
        mut item: F,
    ) -> LduResult<Vec<T>>
    where
        T: Clone,
        F: FnMut(&mut Self) -> LduResult<T>,
    {
        let size = match self.peek() {
            Some(Token::Word(_)) => Some(self.read_label(context)?),
            _ => None,
        };

        if let (Some(n), Some(e)) = (size, expected) {
            if n != e {
                return Err(self.error(
                    context,
                    format!("列表长度前缀为 {}，期望 {}", n, e),
                ));
            }
        }

        if let Some(n) = size {
            if self.accept_punct('{') {
                let value = item(self)?;
                self.expect_punct('}', context)?;
                let mut values = Vec::new();
                if values.try_reserve_exact(n).is_err() {
                    return Err(self.error(context, format!("列表长度 {} 超出可分配范围", n)));
                }
                values.resize(n, value);
                return Ok(values);
            }
        }

        self.expect_punct('(', context)?;
        // 每个元素至少占一个 token
        let remaining = self.tokens.len() - self.pos;
        let mut values = Vec::with_capacity(size.unwrap_or(0).min(remaining));
        while !self.accept_punct(')') {
            if self.is_eof() {
                return Err(self.error(context, "列表未闭合"));
            }
            values.push(item(self)?);
        }

        if let Some(n) = size {
            if n != values.len() {
                return Err(self.error(
                    context,
                    format!("列表长度前缀为 {}，实际读取 {} 个元素", n, values.len()),
                ));
            }
        }
        Ok(values)
    }

    /// 读取浮点数列表
    pub fn read_scalar_list(&mut self, context: &str) -> LduResult<Vec<Scalar>> {
        self.read_list(context, |r| r.read_scalar(context))
    }

    /// 读取长度为 `expected` 的浮点数列表
    pub fn read_scalar_list_exact(&mut self, context: &str, expected: Label) -> LduResult<Vec<Scalar>> {
        self.read_list_exact(context, expected, |r| r.read_scalar(context))
    }

    /// 读取整数列表
    pub fn read_label_list(&mut self, context: &str) -> LduResult<Vec<Label>> {
        self.read_list(context, |r| r.read_label(context))
    }

    /// 消费可选的 `;`
    pub fn skip_semicolon(&mut self) {
        self.accept_punct(';');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_typed_values() {
        let mut r = TokenReader::new("PCG \"p field\" 1.5e-3 42 true off").unwrap();
        assert_eq!(r.read_word("solver").unwrap(), "PCG");
        assert_eq!(r.read_word("field").unwrap(), "p field");
        assert_eq!(r.read_scalar("res").unwrap(), 1.5e-3);
        assert_eq!(r.read_label("iter").unwrap(), 42);
        assert!(r.read_bool("converged").unwrap());
        assert!(!r.read_bool("singular").unwrap());
        assert!(r.is_eof());
    }

    #[test]
    fn test_list_forms() {
        let mut r = TokenReader::new("3(1 2 3) (4 5) 2{0.5} 0()").unwrap();
        assert_eq!(r.read_scalar_list("a").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(r.read_scalar_list("b").unwrap(), vec![4.0, 5.0]);
        assert_eq!(r.read_scalar_list("c").unwrap(), vec![0.5, 0.5]);
        assert!(r.read_scalar_list("d").unwrap().is_empty());
    }

    #[test]
    fn test_list_length_mismatch() {
        let mut r = TokenReader::new("3(1 2)").unwrap();
        let err = r.read_scalar_list("diag").unwrap_err();
        assert!(err.to_string().contains("diag"));
    }

    #[test]
    fn test_huge_size_prefix_is_parse_error() {
        // 超大长度前缀不得触发分配失败
        let mut r = TokenReader::new("18446744073709551615(1 2 3)").unwrap();
        assert!(matches!(
            r.read_scalar_list("diag"),
            Err(LduError::Parse { .. })
        ));

        let mut r = TokenReader::new("18446744073709551615{1}").unwrap();
        assert!(matches!(
            r.read_scalar_list("diag"),
            Err(LduError::Parse { .. })
        ));
    }

    #[test]
    fn test_exact_list_checks_prefix_first() {
        let mut r = TokenReader::new("3(1 2 3)").unwrap();
        assert_eq!(r.read_scalar_list_exact("diag", 3).unwrap(), vec![1.0, 2.0, 3.0]);

        // 前缀不符时在读取 `{` 之前报错
        let mut r = TokenReader::new("1000000000000{1}").unwrap();
        match r.read_scalar_list_exact("diag", 3) {
            Err(LduError::Parse { context, column, .. }) => {
                assert_eq!(context, "diag");
                assert_eq!(column, 14);
            }
            other => panic!("unexpected: {:?}", other),
        };

        let mut r = TokenReader::new("(1 2)").unwrap();
        assert!(r.read_scalar_list_exact("diag", 3).is_err());
        let mut r = TokenReader::new("2{4}").unwrap();
        assert_eq!(r.read_scalar_list_exact("diag", 2).unwrap(), vec![4.0, 4.0]);
    }

    #[test]
    fn test_truncated_list() {
        let mut r = TokenReader::new("3(1 2").unwrap();
        assert!(matches!(
            r.read_scalar_list("upper"),
            Err(LduError::Parse { .. })
        ));
    }

    #[test]
    fn test_error_position_points_at_bad_token() {
        let mut r = TokenReader::new("(a\n  b)").unwrap();
        r.expect_punct('(', "list").unwrap();
        r.read_word("first").unwrap();
        match r.read_scalar("second") {
            Err(LduError::Parse { line, column, context, .. }) => {
                assert_eq!((line, column), (2, 3));
                assert_eq!(context, "second");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_eof_error() {
        let mut r = TokenReader::new("").unwrap();
        assert!(r.read_word("solverName").is_err());
    }

    #[test]
    fn test_label_rejects_negative() {
        let mut r = TokenReader::new("-1").unwrap();
        assert!(r.read_label("nIterations").is_err());
    }

    #[test]
    fn test_keywords() {
        let mut r = TokenReader::new("nCells 4;").unwrap();
        assert!(r.peek_keyword("nCells"));
        r.expect_keyword("nCells").unwrap();
        assert_eq!(r.read_label("nCells").unwrap(), 4);
        r.skip_semicolon();
        assert!(r.is_eof());
    }
}
