// apps/ldu_cli/src/commands/mod.rs

//! 子命令实现

pub mod demo;
pub mod info;
pub mod solve;

use ldu_config::SolverControls;
use ldu_core::MatrixType;

/// 未提供配置文件时按矩阵结构选择的求解器
pub fn default_controls(matrix_type: MatrixType) -> SolverControls {
    match matrix_type {
        MatrixType::Symmetric => SolverControls::new("PCG").with_preconditioner("DIC"),
        _ => SolverControls::new("PBiCGStab").with_preconditioner("DILU"),
    }
}
