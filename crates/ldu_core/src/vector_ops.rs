// crates/ldu_core/src/vector_ops.rs

//! 向量运算（BLAS Level 1 风格）
//!
//! 迭代求解器使用的局部（单分区）向量运算。跨分区归约见 [`crate::parallel`]。
//!
//! 启用 `parallel` 特性时，逐元素运算通过 rayon 并行执行；
//! 归约（`sum_*`）始终顺序累加，保证结果与线程数无关。
//!
//! # 函数列表
//!
//! - [`sum_prod`]: 点积 x·y
//! - [`sum_mag`]: Σ|x|
//! - [`sum_sqr`]: Σx²
//! - [`axpy`]: y = α*x + y
//! - [`xpay`]: y = x + α*y
//! - [`hadamard`]: z = x .* y

use ldu_foundation::Scalar;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 点积 x·y
#[inline]
pub fn sum_prod(x: &[Scalar], y: &[Scalar]) -> Scalar {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * yi).sum()
}

/// 绝对值之和 Σ|x|
#[inline]
pub fn sum_mag(x: &[Scalar]) -> Scalar {
    x.iter().map(|v| v.abs()).sum()
}

/// 平方和 Σx²
#[inline]
pub fn sum_sqr(x: &[Scalar]) -> Scalar {
    x.iter().map(|v| v * v).sum()
}

/// 求和 Σx
#[inline]
pub fn sum(x: &[Scalar]) -> Scalar {
    x.iter().sum()
}

/// AXPY: y = α*x + y
#[inline]
pub fn axpy(alpha: Scalar, x: &[Scalar], y: &mut [Scalar]) {
    debug_assert_eq!(x.len(), y.len());

    #[cfg(feature = "parallel")]
    y.par_iter_mut()
        .zip(x.par_iter())
        .for_each(|(yi, &xi)| *yi += alpha * xi);

    #[cfg(not(feature = "parallel"))]
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

/// XPAY: y = x + α*y
#[inline]
pub fn xpay(x: &[Scalar], alpha: Scalar, y: &mut [Scalar]) {
    debug_assert_eq!(x.len(), y.len());

    #[cfg(feature = "parallel")]
    y.par_iter_mut()
        .zip(x.par_iter())
        .for_each(|(yi, &xi)| *yi = xi + alpha * *yi);

    #[cfg(not(feature = "parallel"))]
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi = xi + alpha * *yi;
    }
}

/// 逐元素乘法: z = x .* y
#[inline]
pub fn hadamard(x: &[Scalar], y: &[Scalar], z: &mut [Scalar]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len(), z.len());

    #[cfg(feature = "parallel")]
    z.par_iter_mut()
        .zip(x.par_iter().zip(y.par_iter()))
        .for_each(|(zi, (&xi, &yi))| *zi = xi * yi);

    #[cfg(not(feature = "parallel"))]
    for ((zi, &xi), &yi) in z.iter_mut().zip(x.iter()).zip(y.iter()) {
        *zi = xi * yi;
    }
}

/// 缩放: x = α*x
#[inline]
pub fn scale(alpha: Scalar, x: &mut [Scalar]) {
    for xi in x.iter_mut() {
        *xi *= alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reductions() {
        let x = [1.0, -2.0, 3.0];
        let y = [4.0, 5.0, 6.0];
        assert_eq!(sum_prod(&x, &y), 12.0);
        assert_eq!(sum_mag(&x), 6.0);
        assert_eq!(sum_sqr(&x), 14.0);
        assert_eq!(sum(&x), 2.0);
    }

    #[test]
    fn test_axpy_xpay() {
        let x = [1.0, 2.0, 3.0];
        let mut y = [4.0, 5.0, 6.0];
        axpy(2.0, &x, &mut y);
        assert_eq!(y, [6.0, 9.0, 12.0]);

        xpay(&x, 0.5, &mut y);
        assert_eq!(y, [4.0, 6.5, 9.0]);
    }

    #[test]
    fn test_hadamard_and_scale() {
        let mut z = [0.0; 3];
        hadamard(&[1.0, 2.0, 3.0], &[2.0, 2.0, -1.0], &mut z);
        assert_eq!(z, [2.0, 4.0, -3.0]);
        scale(-1.0, &mut z);
        assert_eq!(z, [-2.0, -4.0, 3.0]);
    }
}
