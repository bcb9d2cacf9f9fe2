// crates/ldu_core/src/matrix/io.rs

//! 矩阵流格式
//!
//! ```text
//! lower 2(-2 -3)
//! diag 3(4 5 6)
//! upper 2(-1 -1)
//! ```
//!
//! 块按 lower、diag、upper 顺序出现，任一块可缺省（读入后为未分配）。
//! 对称矩阵只写出实际分配的那一个三角，读回后别名关系不变。

use super::{LduMatrix, OffDiag};
use crate::addressing::LduAddressing;
use ldu_foundation::stream::{TokenReader, TokenWriter};
use ldu_foundation::{LduResult, Scalar};
use std::io::Write;

const BLOCKS: [&str; 3] = ["lower", "diag", "upper"];

impl<'a> LduMatrix<'a> {
    /// 写出已分配的系数块
    pub fn write<W: Write>(&self, w: &mut TokenWriter<W>) -> LduResult<()> {
        let (lower, upper): (Option<&[Scalar]>, Option<&[Scalar]>) = match &self.off_diag {
            OffDiag::Unallocated => (None, None),
            OffDiag::Lower(v) => (Some(v.as_slice()), None),
            OffDiag::Upper(v) => (None, Some(v.as_slice())),
            OffDiag::Both { lower, upper } => (Some(lower.as_slice()), Some(upper.as_slice())),
        };

        let blocks = [
            ("lower", lower),
            ("diag", self.diag.as_deref()),
            ("upper", upper),
        ];
        for (keyword, values) in blocks {
            if let Some(values) = values {
                w.write_keyword(keyword)?;
                w.write_scalar_list(values)?;
                w.newline()?;
            }
        }
        Ok(())
    }

    /// 按给定寻址读取矩阵
    ///
    /// # 错误
    ///
    /// 块长度与寻址不符、块重复或顺序错误、数值解析失败。
    pub fn read(addr: &'a LduAddressing, r: &mut TokenReader) -> LduResult<Self> {
        let mut values: [Option<Vec<Scalar>>; 3] = [None, None, None];

        for (slot, keyword) in BLOCKS.iter().enumerate() {
            if !r.peek_keyword(keyword) {
                continue;
            }
            r.expect_keyword(keyword)?;
            let expected = if *keyword == "diag" {
                addr.n_cells()
            } else {
                addr.n_faces()
            };
            let list = r.read_scalar_list_exact(keyword, expected)?;
            r.skip_semicolon();
            values[slot] = Some(list);
        }

        if let Some(keyword) = BLOCKS.iter().find(|k| r.peek_keyword(k)) {
            return Err(r.error(keyword, "系数块重复或顺序错误（应为 lower diag upper）"));
        }

        let [lower, diag, upper] = values;
        let off_diag = match (lower, upper) {
            (None, None) => OffDiag::Unallocated,
            (Some(lower), None) => OffDiag::Lower(lower),
            (None, Some(upper)) => OffDiag::Upper(upper),
            (Some(lower), Some(upper)) => OffDiag::Both { lower, upper },
        };

        Ok(Self {
            addr,
            diag,
            off_diag,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{LduAddressing, LduMatrix, MatrixType};
    use ldu_foundation::stream::{TokenReader, TokenWriter};
    use ldu_foundation::LduError;

    fn chain3() -> LduAddressing {
        LduAddressing::new(3, vec![0, 1], vec![1, 2]).unwrap()
    }

    fn to_text(m: &LduMatrix<'_>) -> String {
        let mut w = TokenWriter::new(Vec::new());
        m.write(&mut w).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn test_write_layout() {
        let addr = chain3();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().copy_from_slice(&[4.0, 5.0, 6.0]);
        m.upper_mut().copy_from_slice(&[-1.0, -1.0]);
        m.lower_mut().copy_from_slice(&[-2.0, -3.0]);
        assert_eq!(
            to_text(&m),
            "lower 2(-2 -3)\ndiag 3(4 5 6)\nupper 2(-1 -1)\n"
        );
    }

    #[test]
    fn test_symmetric_round_trip_keeps_alias() {
        let addr = chain3();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().copy_from_slice(&[2.0, 2.0, 2.0]);
        m.upper_mut().copy_from_slice(&[-0.1, 1.0e-20]);

        let text = to_text(&m);
        assert!(!text.contains("lower"));

        let mut r = TokenReader::new(&text).unwrap();
        let back = LduMatrix::read(&addr, &mut r).unwrap();
        assert!(r.is_eof());
        assert_eq!(back.matrix_type(), MatrixType::Symmetric);
        assert!(back.has_upper() && !back.has_lower());
        assert_eq!(back.lower(), m.upper());
        assert_eq!(back.diag(), m.diag());
    }

    #[test]
    fn test_read_absent_blocks() {
        let addr = chain3();
        let mut r = TokenReader::new("lower 2(1 2)").unwrap();
        let m = LduMatrix::read(&addr, &mut r).unwrap();
        assert!(!m.has_diag());
        assert!(m.has_lower());

        let mut r = TokenReader::new("").unwrap();
        let m = LduMatrix::read(&addr, &mut r).unwrap();
        assert_eq!(m.matrix_type(), MatrixType::Empty);
    }

    #[test]
    fn test_read_uniform_list() {
        let addr = chain3();
        let mut r = TokenReader::new("diag 3{1.5}").unwrap();
        let m = LduMatrix::read(&addr, &mut r).unwrap();
        assert_eq!(m.diag(), &[1.5; 3]);
    }

    #[test]
    fn test_read_size_mismatch_reports_field() {
        let addr = chain3();
        let mut r = TokenReader::new("diag 2(1 2)").unwrap();
        match LduMatrix::read(&addr, &mut r) {
            Err(LduError::Parse { context, line, .. }) => {
                assert_eq!(context, "diag");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected: {:?}", other),
        };
    }

    #[test]
    fn test_read_huge_size_prefix_is_parse_error() {
        let addr = chain3();
        for text in ["diag 18446744073709551615(1 2 3)", "diag 18446744073709551615{1}"] {
            let mut r = TokenReader::new(text).unwrap();
            let result = LduMatrix::read(&addr, &mut r);
            assert!(
                matches!(result, Err(LduError::Parse { ref context, .. }) if context == "diag"),
                "{}: {:?}",
                text,
                result
            );
        }
    }

    #[test]
    fn test_read_rejects_out_of_order_blocks() {
        let addr = chain3();
        let mut r = TokenReader::new("diag 3(1 2 3)\nlower 2(1 2)").unwrap();
        assert!(matches!(
            LduMatrix::read(&addr, &mut r),
            Err(LduError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_read_rejects_bad_number() {
        let addr = chain3();
        let mut r = TokenReader::new("diag 3(1 x 3)").unwrap();
        assert!(matches!(
            LduMatrix::read(&addr, &mut r),
            Err(LduError::Parse { .. })
        ));
    }
}
