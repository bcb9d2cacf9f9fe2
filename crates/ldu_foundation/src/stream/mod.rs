// crates/ldu_foundation/src/stream/mod.rs

//! 文本 token 流
//!
//! 字典风格的 ASCII 格式，是矩阵、寻址和求解性能记录的序列化载体：
//!
//! ```text
//! // 注释
//! nCells 4
//! lowerAddr 3(0 1 2)
//! (PCG p 1 0.2 5 true false)
//! ```
//!
//! - 单词：除空白、标点、引号外的连续字符（数字也以单词形式出现）
//! - 字符串：双引号包围，支持 `\"` 与 `\\` 转义
//! - 标点：`( ) { } [ ] ;`
//! - 列表：`N(v0 v1 ...)`、`(v0 v1 ...)` 或统一值 `N{v}`

mod reader;
mod token;
mod writer;

pub use reader::TokenReader;
pub use token::{tokenize, Spanned, Token};
pub use writer::TokenWriter;
