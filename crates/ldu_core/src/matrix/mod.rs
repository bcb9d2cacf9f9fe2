// crates/ldu_core/src/matrix/mod.rs

//! LduMatrix - 基于面的稀疏矩阵
//!
//! 系数分三个数组存放：`diag`（每单元一个）、`lower` 与 `upper`（每面一个）。
//! 三者均按需分配。
//!
//! # 对称别名
//!
//! 只分配了一个非对角数组时，矩阵视为对称，只读访问另一个三角返回同一份数据：
//!
//! | 已分配 | `lower()` | `upper()` |
//! |--------|-----------|-----------|
//! | lower  | lower     | lower     |
//! | upper  | upper     | upper     |
//! | 两者   | lower     | upper     |
//!
//! 可变访问尚未分配的三角时，从另一三角复制（若存在）或零初始化，矩阵随之变为非对称。
//!
//! # 契约
//!
//! 只读访问器在数组未分配时 panic（编程错误），`try_*` 版本返回
//! [`LduError::Unallocated`]。
//!
//! ```
//! use ldu_core::{LduAddressing, LduMatrix};
//!
//! let addr = LduAddressing::new(2, vec![0], vec![1]).unwrap();
//! let mut m = LduMatrix::new(&addr);
//! m.upper_mut()[0] = -1.0;
//! assert_eq!(m.lower(), &[-1.0]);   // 对称别名
//!
//! m.lower_mut()[0] = -3.0;          // 复制后独立
//! assert_eq!(m.upper(), &[-1.0]);
//! assert_eq!(m.lower(), &[-3.0]);
//! ```

mod arith;
mod io;
mod ops;

use crate::addressing::LduAddressing;
use ldu_foundation::{LduError, LduResult, Scalar};
use std::fmt;

/// 非对角系数的存储状态
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum OffDiag {
    /// 未分配
    #[default]
    Unallocated,
    /// 仅 lower（对称，`upper()` 别名到 lower）
    Lower(Vec<Scalar>),
    /// 仅 upper（对称，`lower()` 别名到 upper）
    Upper(Vec<Scalar>),
    /// 两者独立
    Both {
        lower: Vec<Scalar>,
        upper: Vec<Scalar>,
    },
}

impl OffDiag {
    /// 按 (lower, upper) 视图返回，对称时两者为同一切片
    pub(crate) fn pair(&self) -> Option<(&[Scalar], &[Scalar])> {
        match self {
            Self::Unallocated => None,
            Self::Lower(v) | Self::Upper(v) => Some((v.as_slice(), v.as_slice())),
            Self::Both { lower, upper } => Some((lower.as_slice(), upper.as_slice())),
        }
    }
}

/// 矩阵结构类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixType {
    /// 无任何系数
    Empty,
    /// 仅对角
    Diagonal,
    /// 对角 + 单个非对角数组
    Symmetric,
    /// 对角 + 两个非对角数组
    Asymmetric,
    /// 有非对角系数但缺少对角
    Incomplete,
}

impl MatrixType {
    /// 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Diagonal => "diagonal",
            Self::Symmetric => "symmetric",
            Self::Asymmetric => "asymmetric",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// LDU 稀疏矩阵
///
/// 借用外部的 [`LduAddressing`]，多个矩阵可共享同一寻址。
#[derive(Debug, Clone)]
pub struct LduMatrix<'a> {
    addr: &'a LduAddressing,
    diag: Option<Vec<Scalar>>,
    off_diag: OffDiag,
}

#[track_caller]
fn unallocated(accessor: &'static str) -> ! {
    panic!("{}", LduError::unallocated(accessor))
}

#[track_caller]
fn assert_same_size(operation: &str, addr: &LduAddressing, other: &LduAddressing) {
    assert_eq!(
        (addr.n_cells(), addr.n_faces()),
        (other.n_cells(), other.n_faces()),
        "{}: 寻址规模 (单元数, 面数) 不一致",
        operation
    );
}

impl<'a> LduMatrix<'a> {
    /// 创建空矩阵（不分配任何系数）
    pub fn new(addr: &'a LduAddressing) -> Self {
        Self {
            addr,
            diag: None,
            off_diag: OffDiag::Unallocated,
        }
    }

    /// 由另一个矩阵构造
    ///
    /// `reuse = true` 时接管 `other` 的系数数组（`other` 变为空矩阵），
    /// 否则深拷贝。分配状态（包括对称别名）保持不变。
    ///
    /// # Panics
    ///
    /// `addr` 与 `other` 的单元数或面数不同。
    #[track_caller]
    pub fn from_matrix(addr: &'a LduAddressing, other: &mut LduMatrix<'_>, reuse: bool) -> Self {
        assert_same_size("LduMatrix::from_matrix", addr, other.addr);
        if !reuse {
            return Self::copy_from(addr, other);
        }
        Self {
            addr,
            diag: other.diag.take(),
            off_diag: std::mem::take(&mut other.off_diag),
        }
    }

    /// 深拷贝另一个矩阵的已分配系数
    ///
    /// # Panics
    ///
    /// `addr` 与 `other` 的单元数或面数不同。
    #[track_caller]
    pub fn copy_from(addr: &'a LduAddressing, other: &LduMatrix<'_>) -> Self {
        assert_same_size("LduMatrix::copy_from", addr, other.addr);
        Self {
            addr,
            diag: other.diag.clone(),
            off_diag: other.off_diag.clone(),
        }
    }

    /// 寻址
    #[inline]
    pub fn addressing(&self) -> &'a LduAddressing {
        self.addr
    }

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.addr.n_cells()
    }

    /// 面数
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.addr.n_faces()
    }

    // ------------------------------------------------------------------
    // 分配状态
    // ------------------------------------------------------------------

    /// 是否已分配对角
    #[inline]
    pub fn has_diag(&self) -> bool {
        self.diag.is_some()
    }

    /// 是否已分配 lower 数组（不含别名）
    #[inline]
    pub fn has_lower(&self) -> bool {
        matches!(self.off_diag, OffDiag::Lower(_) | OffDiag::Both { .. })
    }

    /// 是否已分配 upper 数组（不含别名）
    #[inline]
    pub fn has_upper(&self) -> bool {
        matches!(self.off_diag, OffDiag::Upper(_) | OffDiag::Both { .. })
    }

    /// 释放全部系数
    pub fn clear(&mut self) {
        self.diag = None;
        self.off_diag = OffDiag::Unallocated;
    }

    // ------------------------------------------------------------------
    // 可变访问（按需分配）
    // ------------------------------------------------------------------

    /// 对角系数，未分配时零初始化
    pub fn diag_mut(&mut self) -> &mut [Scalar] {
        let n = self.addr.n_cells();
        self.diag.get_or_insert_with(|| vec![0.0; n]).as_mut_slice()
    }

    /// lower 系数，未分配时从 upper 复制或零初始化
    pub fn lower_mut(&mut self) -> &mut [Scalar] {
        let n = self.addr.n_faces();
        self.off_diag = match std::mem::take(&mut self.off_diag) {
            OffDiag::Unallocated => OffDiag::Lower(vec![0.0; n]),
            OffDiag::Upper(upper) => OffDiag::Both {
                lower: upper.clone(),
                upper,
            },
            allocated => allocated,
        };
        match &mut self.off_diag {
            OffDiag::Lower(lower) | OffDiag::Both { lower, .. } => lower.as_mut_slice(),
            _ => unreachable!("lower 已分配"),
        }
    }

    /// upper 系数，未分配时从 lower 复制或零初始化
    pub fn upper_mut(&mut self) -> &mut [Scalar] {
        let n = self.addr.n_faces();
        self.off_diag = match std::mem::take(&mut self.off_diag) {
            OffDiag::Unallocated => OffDiag::Upper(vec![0.0; n]),
            OffDiag::Lower(lower) => OffDiag::Both {
                upper: lower.clone(),
                lower,
            },
            allocated => allocated,
        };
        match &mut self.off_diag {
            OffDiag::Upper(upper) | OffDiag::Both { upper, .. } => upper.as_mut_slice(),
            _ => unreachable!("upper 已分配"),
        }
    }

    /// 同时可变访问 lower 与 upper（两者均会被分配为独立数组）
    pub fn lower_upper_mut(&mut self) -> (&mut [Scalar], &mut [Scalar]) {
        self.lower_mut();
        self.upper_mut();
        match &mut self.off_diag {
            OffDiag::Both { lower, upper } => (lower.as_mut_slice(), upper.as_mut_slice()),
            _ => unreachable!("lower 与 upper 均已分配"),
        }
    }

    // ------------------------------------------------------------------
    // 只读访问
    // ------------------------------------------------------------------

    /// 对角系数
    pub fn try_diag(&self) -> LduResult<&[Scalar]> {
        self.diag
            .as_deref()
            .ok_or(LduError::unallocated("LduMatrix::diag()"))
    }

    /// lower 系数；仅 upper 已分配时返回 upper
    pub fn try_lower(&self) -> LduResult<&[Scalar]> {
        match &self.off_diag {
            OffDiag::Lower(v) | OffDiag::Upper(v) | OffDiag::Both { lower: v, .. } => {
                Ok(v.as_slice())
            }
            OffDiag::Unallocated => Err(LduError::unallocated("LduMatrix::lower()")),
        }
    }

    /// upper 系数；仅 lower 已分配时返回 lower
    pub fn try_upper(&self) -> LduResult<&[Scalar]> {
        match &self.off_diag {
            OffDiag::Lower(v) | OffDiag::Upper(v) | OffDiag::Both { upper: v, .. } => {
                Ok(v.as_slice())
            }
            OffDiag::Unallocated => Err(LduError::unallocated("LduMatrix::upper()")),
        }
    }

    /// 对角系数
    ///
    /// # Panics
    ///
    /// 对角未分配。
    #[track_caller]
    pub fn diag(&self) -> &[Scalar] {
        match self.diag.as_deref() {
            Some(d) => d,
            None => unallocated("LduMatrix::diag()"),
        }
    }

    /// lower 系数，对称时别名到 upper
    ///
    /// # Panics
    ///
    /// lower 与 upper 均未分配。
    #[track_caller]
    pub fn lower(&self) -> &[Scalar] {
        match self.off_diag.pair() {
            Some((lower, _)) => lower,
            None => unallocated("LduMatrix::lower()"),
        }
    }

    /// upper 系数，对称时别名到 lower
    ///
    /// # Panics
    ///
    /// lower 与 upper 均未分配。
    #[track_caller]
    pub fn upper(&self) -> &[Scalar] {
        match self.off_diag.pair() {
            Some((_, upper)) => upper,
            None => unallocated("LduMatrix::upper()"),
        }
    }

    /// (lower, upper) 视图，均未分配时为 `None`
    pub(crate) fn off_diag_pair(&self) -> Option<(&[Scalar], &[Scalar])> {
        self.off_diag.pair()
    }

    // ------------------------------------------------------------------
    // 结构判定
    // ------------------------------------------------------------------

    /// 仅有对角
    pub fn is_diagonal(&self) -> bool {
        self.has_diag() && matches!(self.off_diag, OffDiag::Unallocated)
    }

    /// 对角 + 恰好一个非对角数组
    pub fn is_symmetric(&self) -> bool {
        self.has_diag() && matches!(self.off_diag, OffDiag::Lower(_) | OffDiag::Upper(_))
    }

    /// 对角 + 两个非对角数组
    pub fn is_asymmetric(&self) -> bool {
        self.has_diag() && matches!(self.off_diag, OffDiag::Both { .. })
    }

    /// 结构类型
    pub fn matrix_type(&self) -> MatrixType {
        match (self.has_diag(), &self.off_diag) {
            (false, OffDiag::Unallocated) => MatrixType::Empty,
            (false, _) => MatrixType::Incomplete,
            (true, OffDiag::Unallocated) => MatrixType::Diagonal,
            (true, OffDiag::Lower(_) | OffDiag::Upper(_)) => MatrixType::Symmetric,
            (true, OffDiag::Both { .. }) => MatrixType::Asymmetric,
        }
    }
}
