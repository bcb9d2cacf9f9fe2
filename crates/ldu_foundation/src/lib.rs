// crates/ldu_foundation/src/lib.rs

//! LDU Foundation Layer
//!
//! 零依赖基础层（仅依赖 thiserror），为线性系统核心提供基础抽象。
//!
//! # 模块概览
//!
//! - [`scalar`]: 标量/标签类型与数值常量（`SMALL`、`VSMALL` 等）
//! - [`error`]: 统一错误类型 `LduError`
//! - [`stream`]: 文本 token 流读写（字典风格 ASCII 格式）
//!
//! # 示例
//!
//! ```
//! use ldu_foundation::stream::{TokenReader, TokenWriter};
//!
//! let mut w = TokenWriter::new(Vec::new());
//! w.write_scalar_list(&[1.0, 2.5]).unwrap();
//! let text = String::from_utf8(w.into_inner()).unwrap();
//!
//! let mut r = TokenReader::new(&text).unwrap();
//! assert_eq!(r.read_scalar_list("values").unwrap(), vec![1.0, 2.5]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod scalar;
pub mod stream;

/// 层级标识
pub const LAYER: u8 = 1;

// 重导出常用类型
pub use error::{LduError, LduResult};
pub use scalar::{Label, Scalar, GREAT, ROOT_VSMALL, SMALL, VGREAT, VSMALL};
pub use stream::{Token, TokenReader, TokenWriter};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{LduError, LduResult};
    pub use crate::scalar::{Label, Scalar, GREAT, SMALL, VSMALL};
    pub use crate::stream::{TokenReader, TokenWriter};
    pub use crate::{ensure, require};
}
