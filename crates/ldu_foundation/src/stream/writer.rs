// crates/ldu_foundation/src/stream/writer.rs

//! token 流写出器
//!
//! 浮点数以最短可往返表示写出，读回后逐位一致。

use super::token::is_word_char;
use crate::error::LduResult;
use crate::scalar::{Label, Scalar};
use std::io::Write;

/// token 流写出器
#[derive(Debug)]
pub struct TokenWriter<W: Write> {
    out: W,
    /// 下一个 token 前是否需要空格
    need_space: bool,
}

impl<W: Write> TokenWriter<W> {
    /// 包装输出流
    pub fn new(out: W) -> Self {
        Self {
            out,
            need_space: false,
        }
    }

    /// 取回内部输出流
    pub fn into_inner(self) -> W {
        self.out
    }

    fn separator(&mut self) -> LduResult<()> {
        if self.need_space {
            self.out.write_all(b" ")?;
        }
        self.need_space = true;
        Ok(())
    }

    /// 写出单词；含非法字符或为空时加引号
    pub fn write_word(&mut self, word: &str) -> LduResult<()> {
        self.separator()?;
        // 以 `//` 或 `/*` 开头的裸词会被当作注释
        let comment_like = word.starts_with("//") || word.starts_with("/*");
        if !word.is_empty() && word.chars().all(is_word_char) && !comment_like {
            self.out.write_all(word.as_bytes())?;
        } else {
            let escaped = word.replace('\\', "\\\\").replace('"', "\\\"");
            write!(self.out, "\"{}\"", escaped)?;
        }
        Ok(())
    }

    /// 写出关键字
    pub fn write_keyword(&mut self, keyword: &str) -> LduResult<()> {
        self.write_word(keyword)
    }

    /// 写出浮点数
    pub fn write_scalar(&mut self, value: Scalar) -> LduResult<()> {
        self.separator()?;
        let mag = value.abs();
        if value == 0.0 || (1e-4..1e16).contains(&mag) {
            write!(self.out, "{}", value)?;
        } else {
            write!(self.out, "{:e}", value)?;
        }
        Ok(())
    }

    /// 写出整数
    pub fn write_label(&mut self, value: Label) -> LduResult<()> {
        self.separator()?;
        write!(self.out, "{}", value)?;
        Ok(())
    }

    /// 写出布尔值
    pub fn write_bool(&mut self, value: bool) -> LduResult<()> {
        self.write_word(if value { "true" } else { "false" })
    }

    /// 写出 `(`
    pub fn begin_list(&mut self) -> LduResult<()> {
        self.separator()?;
        self.out.write_all(b"(")?;
        self.need_space = false;
        Ok(())
    }

    /// 写出 `)`
    pub fn end_list(&mut self) -> LduResult<()> {
        self.out.write_all(b")")?;
        self.need_space = true;
        Ok(())
    }

    /// 写出带长度前缀的列表 `N(v0 v1 ...)`
    fn write_sized_list<T: Copy>(
        &mut self,
        values: &[T],
        mut item: impl FnMut(&mut Self, T) -> LduResult<()>,
    ) -> LduResult<()> {
        self.write_label(values.len())?;
        self.out.write_all(b"(")?;
        self.need_space = false;
        for &v in values {
            item(self, v)?;
        }
        self.end_list()
    }

    /// 写出浮点数列表
    pub fn write_scalar_list(&mut self, values: &[Scalar]) -> LduResult<()> {
        self.write_sized_list(values, |w, v| w.write_scalar(v))
    }

    /// 写出整数列表
    pub fn write_label_list(&mut self, values: &[Label]) -> LduResult<()> {
        self.write_sized_list(values, |w, v| w.write_label(v))
    }

    /// 写出 `;`
    pub fn end_statement(&mut self) -> LduResult<()> {
        self.out.write_all(b";")?;
        self.need_space = true;
        Ok(())
    }

    /// 换行
    pub fn newline(&mut self) -> LduResult<()> {
        self.out.write_all(b"\n")?;
        self.need_space = false;
        Ok(())
    }

    /// 刷新输出流
    pub fn flush(&mut self) -> LduResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::TokenReader;

    fn written(f: impl FnOnce(&mut TokenWriter<Vec<u8>>) -> LduResult<()>) -> String {
        let mut w = TokenWriter::new(Vec::new());
        f(&mut w).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn test_tuple_layout() {
        let s = written(|w| {
            w.begin_list()?;
            w.write_word("PCG")?;
            w.write_word("p")?;
            w.write_scalar(0.5)?;
            w.write_label(3)?;
            w.write_bool(true)?;
            w.end_list()
        });
        assert_eq!(s, "(PCG p 0.5 3 true)");
    }

    #[test]
    fn test_sized_list_layout() {
        let s = written(|w| {
            w.write_keyword("diag")?;
            w.write_scalar_list(&[1.0, -2.0])
        });
        assert_eq!(s, "diag 2(1 -2)");
    }

    #[test]
    fn test_word_quoting() {
        let s = written(|w| {
            w.write_word("my field")?;
            w.write_word("")?;
            w.write_word("a(b")
        });
        assert_eq!(s, r#""my field" "" "a(b""#);
    }

    #[test]
    fn test_comment_like_words_are_quoted() {
        let s = written(|w| {
            w.write_word("/*p")?;
            w.write_word("//q")?;
            w.write_word("a/*b")
        });
        assert_eq!(s, r#""/*p" "//q" a/*b"#);

        let mut r = TokenReader::new(&s).unwrap();
        assert_eq!(r.read_word("field").unwrap(), "/*p");
        assert_eq!(r.read_word("field").unwrap(), "//q");
        assert_eq!(r.read_word("field").unwrap(), "a/*b");
        assert!(r.is_eof());
    }

    #[test]
    fn test_scalar_bit_exact_round_trip() {
        let values = [
            0.0,
            -0.0,
            1.0 / 3.0,
            1e-300,
            f64::MIN_POSITIVE,
            6.02214076e23,
            -123.456,
            f64::MAX,
        ];
        let s = written(|w| w.write_scalar_list(&values));
        let back = TokenReader::new(&s).unwrap().read_scalar_list("v").unwrap();
        for (a, b) in values.iter().zip(back.iter()) {
            assert_eq!(a.to_bits(), b.to_bits(), "{} vs {}", a, b);
        }
    }
}
