// apps/ldu_cli/src/commands/demo.rs

//! 演示命令
//!
//! 在 nx × ny 结构网格上组装扩散（可选迎风对流）算子，
//! 以构造解生成源项，然后用每个适用的求解器求解并比较误差。

use crate::system;
use anyhow::{Context, Result};
use clap::Args;
use ldu_config::SolverControls;
use ldu_core::{LduAddressing, LduMatrix, SolverRegistry};
use ldu_foundation::Scalar;
use std::path::PathBuf;
use tracing::info;

/// 演示参数
#[derive(Args)]
pub struct DemoArgs {
    /// x 方向单元数
    #[arg(long, default_value = "20")]
    pub nx: usize,

    /// y 方向单元数
    #[arg(long, default_value = "20")]
    pub ny: usize,

    /// 加入迎风对流项，得到非对称矩阵
    #[arg(long)]
    pub asymmetric: bool,

    /// 对流强度（仅 --asymmetric 时使用）
    #[arg(long, default_value = "0.5")]
    pub convection: Scalar,

    /// 收敛容差
    #[arg(long, default_value = "1e-8")]
    pub tolerance: Scalar,

    /// 将组装好的系统写入文件，可供 solve 命令使用
    #[arg(long)]
    pub write: Option<PathBuf>,
}

/// 结构网格的面寻址
pub fn grid_addressing(nx: usize, ny: usize) -> Result<LduAddressing> {
    let id = |i: usize, j: usize| j * nx + i;
    let mut pairs = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            if i + 1 < nx {
                pairs.push((id(i, j), id(i + 1, j)));
            }
            if j + 1 < ny {
                pairs.push((id(i, j), id(i, j + 1)));
            }
        }
    }
    LduAddressing::from_pairs(nx * ny, pairs).context("网格寻址构造失败")
}

/// 组装算子：单位扩散系数，边界单元附加 Dirichlet 耦合
pub fn assemble(addr: &LduAddressing, nx: usize, ny: usize, convection: Scalar) -> LduMatrix<'_> {
    let mut m = LduMatrix::new(addr);
    if convection == 0.0 {
        m.upper_mut().fill(-1.0);
    } else {
        let (lower, upper) = m.lower_upper_mut();
        lower.fill(-1.0 - convection);
        upper.fill(-1.0);
    }
    m.neg_sum_diag();

    let diag = m.diag_mut();
    for j in 0..ny {
        for i in 0..nx {
            let boundary_faces = usize::from(i == 0)
                + usize::from(i + 1 == nx)
                + usize::from(j == 0)
                + usize::from(j + 1 == ny);
            diag[j * nx + i] += boundary_faces as Scalar;
        }
    }
    m
}

/// 求解器及其预条件器/光顺器组合
fn combinations(symmetric: bool) -> Vec<SolverControls> {
    let registry = SolverRegistry::default();
    let names = if symmetric {
        registry.symmetric_names()
    } else {
        registry.asymmetric_names()
    };
    let ilu = if symmetric { "DIC" } else { "DILU" };

    let mut result = Vec::new();
    for name in names {
        match name.as_str() {
            "smoothSolver" => {
                for smoother in ["GaussSeidel", "symGaussSeidel"] {
                    result.push(SolverControls::new(name.as_str()).with_smoother(smoother));
                }
            }
            _ => {
                for precon in ["none", "diagonal", ilu] {
                    result.push(SolverControls::new(name.as_str()).with_preconditioner(precon));
                }
            }
        }
    }
    result
}

/// 执行演示命令
pub fn execute(args: DemoArgs) -> Result<()> {
    let convection = if args.asymmetric { args.convection } else { 0.0 };
    let addr = grid_addressing(args.nx, args.ny)?;
    let matrix = assemble(&addr, args.nx, args.ny, convection);

    info!(
        "=== 演示: {}×{} 网格, {} 单元, {} 面, {} 矩阵 ===",
        args.nx,
        args.ny,
        addr.n_cells(),
        addr.n_faces(),
        matrix.matrix_type()
    );

    let exact: Vec<Scalar> = (0..addr.n_cells())
        .map(|c| {
            let x = (c % args.nx) as Scalar / args.nx as Scalar;
            let y = (c / args.nx) as Scalar / args.ny as Scalar;
            1.0 + x * (1.0 - y)
        })
        .collect();
    let mut source = vec![0.0; addr.n_cells()];
    matrix.amul(&exact, &mut source);

    if let Some(path) = &args.write {
        system::write_system(path, &matrix, &source, None)?;
        info!("系统已写入 {}", path.display());
    }

    println!(
        "{:<28} {:>14} {:>14} {:>8} {:>12}",
        "solver", "initial", "final", "iters", "max error"
    );
    for controls in combinations(matrix.is_symmetric()) {
        let controls = controls
            .with_tolerance(args.tolerance, 0.0)
            .with_iterations(0, 10_000);
        let mut psi = vec![0.0; addr.n_cells()];
        let perf = matrix.solve("psi", &mut psi, &source, &controls)?;

        let label = if controls.solver == "smoothSolver" {
            format!("{} ({})", controls.solver, controls.smoother)
        } else {
            perf.solver_name.clone()
        };
        let error = psi
            .iter()
            .zip(&exact)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, Scalar::max);
        println!(
            "{:<28} {:>14.6e} {:>14.6e} {:>8} {:>12.3e}",
            label, perf.initial_residual, perf.final_residual, perf.n_iterations, error
        );
    }

    Ok(())
}
