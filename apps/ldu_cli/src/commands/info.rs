// apps/ldu_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示系统文件的寻址规模、矩阵结构与对角占优情况。

use crate::system;
use anyhow::{Context, Result};
use clap::Args;
use ldu_core::{LduMatrix, MatrixType};
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 系统文件路径
    #[arg(short, long)]
    pub system: PathBuf,
}

/// 对角占优统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dominance {
    /// |D| >= Σ|offdiag| 的行数
    weak: usize,
    /// |D| > Σ|offdiag| 的行数
    strict: usize,
}

fn dominance(matrix: &LduMatrix<'_>) -> Option<Dominance> {
    let diag = matrix.try_diag().ok()?;
    let mut sum_off = vec![0.0; matrix.n_cells()];
    matrix.sum_mag_off_diag(&mut sum_off);

    let mut result = Dominance { weak: 0, strict: 0 };
    for (d, off) in diag.iter().zip(&sum_off) {
        if d.abs() >= *off {
            result.weak += 1;
        }
        if d.abs() > *off {
            result.strict += 1;
        }
    }
    Some(result)
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== 系统信息: {} ===", args.system.display());

    let (addr, mut reader) = system::open(&args.system)?;
    let matrix = LduMatrix::read(&addr, &mut reader)
        .with_context(|| format!("{}: 矩阵系数无效", args.system.display()))?;
    let fields = system::read_fields(&mut reader, addr.n_cells())
        .with_context(|| format!("{}: 场数据无效", args.system.display()))?;

    println!("=== 寻址 ===");
    println!("单元数: {}", addr.n_cells());
    println!("面数: {}", addr.n_faces());
    let max_neighbours = (0..addr.n_cells())
        .map(|c| {
            let owner = addr.owner_start_addr();
            let losort = addr.losort_start_addr();
            (owner[c + 1] - owner[c]) + (losort[c + 1] - losort[c])
        })
        .max()
        .unwrap_or(0);
    println!("最大邻居数: {}", max_neighbours);

    println!("\n=== 矩阵 ===");
    println!("结构: {}", matrix.matrix_type());
    println!(
        "已分配: diag={} lower={} upper={}",
        matrix.has_diag(),
        matrix.has_lower(),
        matrix.has_upper()
    );
    if let Some(d) = dominance(&matrix) {
        println!(
            "对角占优行: {}/{} (严格 {})",
            d.weak,
            addr.n_cells(),
            d.strict
        );
    }
    match matrix.matrix_type() {
        MatrixType::Symmetric => println!("可用求解器: PCG, PBiCGStab, smoothSolver"),
        MatrixType::Asymmetric => println!("可用求解器: PBiCGStab, smoothSolver"),
        MatrixType::Diagonal => println!("可用求解器: diagonal"),
        _ => println!("可用求解器: 无（缺少对角系数）"),
    }

    println!("\n=== 场 ===");
    println!("source: {} 个值", fields.source.len());
    match &fields.psi {
        Some(psi) => println!("psi: {} 个值", psi.len()),
        None => println!("psi: 未提供（从零开始）"),
    }

    Ok(())
}
