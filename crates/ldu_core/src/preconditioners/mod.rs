// crates/ldu_core/src/preconditioners/mod.rs

//! 预条件器
//!
//! 预条件器的核心操作是 `precondition`: wA = M⁻¹ * rA。
//!
//! # 可选预条件器
//!
//! | 名称       | 对称矩阵 | 非对称矩阵 |
//! |------------|----------|------------|
//! | `none`     | ✓        | ✓          |
//! | `diagonal` | ✓        | ✓          |
//! | `DIC`      | ✓        |            |
//! | `DILU`     |          | ✓          |
//!
//! 选择表按矩阵是否对称区分，未知名称返回 [`LduError::UnknownSelection`]。

mod diagonal;
mod dic;
mod dilu;

pub use diagonal::{DiagonalPreconditioner, NoPreconditioner};
pub use dic::DicPreconditioner;
pub use dilu::DiluPreconditioner;

use crate::matrix::LduMatrix;
use ldu_foundation::{LduError, LduResult, Scalar};

/// 预条件器 trait
pub trait LduPreconditioner {
    /// 应用预条件器: wA = M⁻¹ * rA
    fn precondition(&self, w_a: &mut [Scalar], r_a: &[Scalar]);

    /// 预条件器名称
    fn name(&self) -> &'static str;
}

/// 预条件器构造函数
pub type PreconditionerFactory =
    for<'a> fn(&'a LduMatrix<'a>) -> LduResult<Box<dyn LduPreconditioner + 'a>>;

fn new_none<'a>(_matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduPreconditioner + 'a>> {
    Ok(Box::new(NoPreconditioner))
}

fn new_diagonal<'a>(matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduPreconditioner + 'a>> {
    Ok(Box::new(DiagonalPreconditioner::new(matrix)?))
}

fn new_dic<'a>(matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduPreconditioner + 'a>> {
    Ok(Box::new(DicPreconditioner::new(matrix)?))
}

fn new_dilu<'a>(matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduPreconditioner + 'a>> {
    Ok(Box::new(DiluPreconditioner::new(matrix)?))
}

/// 对称矩阵可用的预条件器
pub const SYMMETRIC: &[(&str, PreconditionerFactory)] = &[
    ("none", new_none),
    ("diagonal", new_diagonal),
    ("DIC", new_dic),
];

/// 非对称矩阵可用的预条件器
pub const ASYMMETRIC: &[(&str, PreconditionerFactory)] = &[
    ("none", new_none),
    ("diagonal", new_diagonal),
    ("DILU", new_dilu),
];

/// 按名称为矩阵选择预条件器
///
/// 根据 `matrix.is_symmetric()` 使用对称或非对称选择表。
pub fn select<'a>(
    name: &str,
    matrix: &'a LduMatrix<'a>,
) -> LduResult<Box<dyn LduPreconditioner + 'a>> {
    let (kind, table) = if matrix.is_symmetric() {
        ("对称矩阵预条件器", SYMMETRIC)
    } else {
        ("非对称矩阵预条件器", ASYMMETRIC)
    };

    match table.iter().find(|(key, _)| *key == name) {
        Some((_, factory)) => factory(matrix),
        None => Err(LduError::unknown_selection(
            kind,
            name,
            table.iter().map(|(key, _)| key.to_string()).collect(),
        )),
    }
}
