// crates/ldu_foundation/src/scalar.rs

//! 标量类型与数值常量
//!
//! 线性系统核心统一使用双精度。常量为双精度取值，
//! 残差判据（奇异性、相对容差）依赖这些取值，修改会改变收敛行为。

/// 计算用标量类型
pub type Scalar = f64;

/// 单元/面索引类型
pub type Label = usize;

/// 小量
pub const SMALL: Scalar = 1.0e-15;

/// 极小量，奇异性判据的阈值
pub const VSMALL: Scalar = 1.0e-300;

/// 极小量的平方根
pub const ROOT_VSMALL: Scalar = 1.0e-150;

/// 大量
pub const GREAT: Scalar = 1.0e15;

/// 极大量
pub const VGREAT: Scalar = 1.0e300;

/// 对值取模后比较是否小于阈值
#[inline]
pub fn is_negligible(value: Scalar, threshold: Scalar) -> bool {
    value.abs() < threshold
}
