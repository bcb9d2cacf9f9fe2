// crates/ldu_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `LduError` 枚举和 `LduResult` 类型别名。
//!
//! # 错误分类
//!
//! 1. **契约违反**: 访问未分配的系数数组（`Unallocated`），属于调用方的编程错误
//! 2. **输入格式错误**: 流解析失败（`Parse`、`SizeMismatch`），携带位置和字段上下文
//! 3. **选择错误**: 运行时按名称选择求解器/预条件器失败（`UnknownSelection`）
//!
//! 奇异矩阵和未收敛**不是**错误，它们通过 `SolverPerformance` 的字段返回。
//!
//! # 示例
//!
//! ```
//! use ldu_foundation::error::{LduError, LduResult};
//!
//! fn read_size(n: usize) -> LduResult<()> {
//!     LduError::check_size("diag", 4, n)
//! }
//! assert!(read_size(4).is_ok());
//! assert!(read_size(3).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type LduResult<T> = Result<T, LduError>;

/// LDU 核心错误类型
#[derive(Error, Debug)]
pub enum LduError {
    // ========================================================================
    // IO 与解析
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 流解析错误
    #[error("解析错误: 第{line}行第{column}列 [{context}]: {message}")]
    Parse {
        /// 行号（从 1 开始）
        line: usize,
        /// 列号（从 1 开始）
        column: usize,
        /// 正在读取的字段
        context: String,
        /// 错误信息
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    // ========================================================================
    // 矩阵
    // ========================================================================
    /// 无效的 LDU 寻址
    #[error("无效的 LDU 寻址: {message}")]
    InvalidAddressing {
        /// 具体错误信息
        message: String,
    },

    /// 访问未分配的系数数组
    #[error("{accessor} 系数未分配")]
    Unallocated {
        /// 出错的访问器名称
        accessor: &'static str,
    },

    /// 矩阵类型组合不支持该运算
    #[error("不支持的矩阵运算 {operation}: {lhs} 与 {rhs}")]
    IncompatibleMatrices {
        /// 运算名称
        operation: &'static str,
        /// 左操作数类型
        lhs: String,
        /// 右操作数类型
        rhs: String,
    },

    // ========================================================================
    // 运行时选择与并行
    // ========================================================================
    /// 未知的运行时选择键
    #[error("未知的{kind} '{name}'，可选项: {valid:?}")]
    UnknownSelection {
        /// 选择类别（如 "对称矩阵求解器"）
        kind: String,
        /// 请求的名称
        name: String,
        /// 可用名称列表
        valid: Vec<String>,
    },

    /// 并行通信错误
    #[error("并行通信错误: {0}")]
    Communication(String),

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl LduError {
    /// 解析错误
    pub fn parse(
        line: usize,
        column: usize,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            line,
            column,
            context: context.into(),
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 无效寻址
    pub fn invalid_addressing(message: impl Into<String>) -> Self {
        Self::InvalidAddressing {
            message: message.into(),
        }
    }

    /// 未分配访问
    pub fn unallocated(accessor: &'static str) -> Self {
        Self::Unallocated { accessor }
    }

    /// 矩阵类型不兼容
    pub fn incompatible(
        operation: &'static str,
        lhs: impl Into<String>,
        rhs: impl Into<String>,
    ) -> Self {
        Self::IncompatibleMatrices {
            operation,
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// 未知选择
    pub fn unknown_selection(
        kind: impl Into<String>,
        name: impl Into<String>,
        valid: Vec<String>,
    ) -> Self {
        Self::UnknownSelection {
            kind: kind.into(),
            name: name.into(),
            valid,
        }
    }

    /// 通信错误
    pub fn communication(message: impl Into<String>) -> Self {
        Self::Communication(message.into())
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl LduError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> LduResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> LduResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

impl From<std::io::Error> for LduError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// 条件不满足时提前返回错误
///
/// ```
/// use ldu_foundation::{ensure, LduError, LduResult};
///
/// fn positive(v: i32) -> LduResult<()> {
///     ensure!(v > 0, LduError::invalid_input("必须为正"));
///     Ok(())
/// }
/// assert!(positive(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

/// 解包 `Option`，为 `None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr) => {
        match $opt {
            Some(v) => v,
            None => return Err($err.into()),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = LduError::parse(3, 7, "initialResidual", "期望浮点数");
        let msg = err.to_string();
        assert!(msg.contains("第3行"));
        assert!(msg.contains("第7列"));
        assert!(msg.contains("initialResidual"));
    }

    #[test]
    fn test_unallocated_names_accessor() {
        let err = LduError::unallocated("LduMatrix::diag()");
        assert!(err.to_string().contains("LduMatrix::diag()"));
    }

    #[test]
    fn test_unknown_selection_lists_valid() {
        let err = LduError::unknown_selection(
            "对称矩阵求解器",
            "GAMG",
            vec!["PCG".into(), "smoothSolver".into()],
        );
        let msg = err.to_string();
        assert!(msg.contains("GAMG"));
        assert!(msg.contains("PCG"));
    }

    #[test]
    fn test_check_size() {
        assert!(LduError::check_size("lower", 10, 10).is_ok());
        assert!(matches!(
            LduError::check_size("lower", 10, 5),
            Err(LduError::SizeMismatch { expected: 10, actual: 5, .. })
        ));
    }

    #[test]
    fn test_check_index() {
        assert!(LduError::check_index("Cell", 5, 10).is_ok());
        match LduError::check_index("upperAddr", 10, 10) {
            Err(err @ LduError::IndexOutOfBounds { index: 10, len: 10, .. }) => {
                assert!(err.to_string().contains("upperAddr"));
            }
            other => panic!("unexpected: {:?}", other),
        };
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: LduError = io_err.into();
        assert!(matches!(err, LduError::Io { source: Some(_), .. }));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> LduResult<()> {
            ensure!(value > 0, LduError::invalid_input("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> LduResult<i32> {
            let v = require!(opt, LduError::internal("missing"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
