//! # 插值 B 样条
//!
//! 构造通过全部数据点的 k 次 B 样条。
//!
//! ## 节点选取
//! - 奇数次: 内部节点取数据点 `x[m+1 .. n-m-1]`，m = (k-1)/2 (not-a-knot)
//! - 偶数次: 内部节点取相邻数据点的中点，两端各舍去 k/2 个
//! - 两端节点重复 k+1 次
//!
//! 系数由带状配置矩阵求解（列主元消去），求值使用 de Boor 基函数递推。
//!
//! ## 依赖关系
//! - 被 `background/interpolate.rs` 使用
//! - 无外部模块依赖

/// 插值 B 样条
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coeffs: Vec<f64>,
}

impl BSpline {
    /// 构造插值样条
    ///
    /// `xs` 必须严格递增且 `xs.len() > degree`。配置矩阵奇异时返回 None。
    pub fn interpolate(xs: &[f64], ys: &[f64], degree: usize) -> Option<Self> {
        let n = xs.len();
        if n <= degree || ys.len() != n || degree == 0 {
            return None;
        }

        let knots = not_a_knot_knots(xs, degree);

        let mut spline = BSpline {
            degree,
            knots,
            coeffs: Vec::new(),
        };

        // 每行: (起始列, k+1 个非零基函数值)
        let rows: Vec<(usize, Vec<f64>)> = xs
            .iter()
            .map(|&x| {
                let span = spline.find_span(x);
                (span - degree, spline.basis_functions(x, span))
            })
            .collect();

        let lower = rows
            .iter()
            .enumerate()
            .map(|(i, (start, _))| i.saturating_sub(*start))
            .max()
            .unwrap_or(0);
        let upper = rows
            .iter()
            .enumerate()
            .map(|(i, (start, _))| (start + degree).saturating_sub(i))
            .max()
            .unwrap_or(0);

        let mut system = BandedSystem::new(n, lower, upper);
        for (i, (start, values)) in rows.iter().enumerate() {
            for (j, value) in values.iter().enumerate() {
                system.set(i, start + j, *value);
            }
        }

        spline.coeffs = system.solve(ys.to_vec())?;
        Some(spline)
    }

    /// 样条次数
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// 求值（调用方保证 x 在数据范围内）
    pub fn eval(&self, x: f64) -> f64 {
        let span = self.find_span(x);
        let basis = self.basis_functions(x, span);
        let first = span - self.degree;

        basis
            .iter()
            .enumerate()
            .map(|(j, b)| self.coeffs[first + j] * b)
            .sum()
    }

    /// 查找 x 所在的节点区间 l，满足 t[l] <= x < t[l+1]，右端点归入最后一个区间
    fn find_span(&self, x: f64) -> usize {
        let n_basis = self.knots.len() - self.degree - 1;
        if x >= self.knots[n_basis] {
            return n_basis - 1;
        }

        let span = self.knots.partition_point(|t| *t <= x).saturating_sub(1);
        span.clamp(self.degree, n_basis - 1)
    }

    /// 在区间 span 上计算 k+1 个非零基函数
    fn basis_functions(&self, x: f64, span: usize) -> Vec<f64> {
        let k = self.degree;
        let t = &self.knots;

        let mut n = vec![0.0; k + 1];
        let mut left = vec![0.0; k + 1];
        let mut right = vec![0.0; k + 1];
        n[0] = 1.0;

        for j in 1..=k {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;

            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom == 0.0 { 0.0 } else { n[r] / denom };
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }

        n
    }
}

/// 生成 not-a-knot 风格的节点向量
fn not_a_knot_knots(xs: &[f64], k: usize) -> Vec<f64> {
    let n = xs.len();
    let first = xs[0];
    let last = xs[n - 1];

    let interior: Vec<f64> = if k % 2 == 1 {
        let m = (k - 1) / 2;
        xs[m + 1..n - m - 1].to_vec()
    } else {
        let m = k / 2;
        (m..n - 1 - m).map(|i| (xs[i] + xs[i + 1]) / 2.0).collect()
    };

    let mut knots = Vec::with_capacity(n + k + 1);
    knots.extend(std::iter::repeat(first).take(k + 1));
    knots.extend(interior);
    knots.extend(std::iter::repeat(last).take(k + 1));
    knots
}

/// 带状线性方程组
///
/// 行 i 存储列 `[i - lower, i + lower + upper]`，为列主元交换后的填充预留空间。
struct BandedSystem {
    n: usize,
    lower: usize,
    reach: usize,
    width: usize,
    data: Vec<f64>,
}

impl BandedSystem {
    fn new(n: usize, lower: usize, upper: usize) -> Self {
        let reach = lower + upper;
        let width = lower + reach + 1;
        BandedSystem {
            n,
            lower,
            reach,
            width,
            data: vec![0.0; n * width],
        }
    }

    fn in_band(&self, i: usize, j: usize) -> bool {
        j + self.lower >= i && j <= i + self.reach
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        if self.in_band(i, j) {
            self.data[i * self.width + j + self.lower - i]
        } else {
            0.0
        }
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(self.in_band(i, j));
        let idx = i * self.width + j + self.lower - i;
        self.data[idx] = value;
    }

    /// 高斯消去（列主元），奇异时返回 None
    fn solve(mut self, mut b: Vec<f64>) -> Option<Vec<f64>> {
        let n = self.n;

        for p in 0..n {
            let last_row = (p + self.lower).min(n - 1);
            let last_col = (p + self.reach).min(n - 1);

            let (pivot, max) = (p..=last_row)
                .map(|r| (r, self.get(r, p).abs()))
                .fold((p, 0.0_f64), |best, cur| if cur.1 > best.1 { cur } else { best });

            if max == 0.0 || !max.is_finite() {
                return None;
            }

            if pivot != p {
                for c in p..=last_col {
                    let a = self.get(p, c);
                    let other = self.get(pivot, c);
                    self.set(p, c, other);
                    self.set(pivot, c, a);
                }
                b.swap(p, pivot);
            }

            let diag = self.get(p, p);
            for r in p + 1..=last_row {
                let factor = self.get(r, p) / diag;
                if factor == 0.0 {
                    continue;
                }
                for c in p..=last_col {
                    let value = self.get(r, c) - factor * self.get(p, c);
                    self.set(r, c, value);
                }
                b[r] -= factor * b[p];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let last_col = (i + self.reach).min(n - 1);
            let sum: f64 = (i + 1..=last_col).map(|c| self.get(i, c) * x[c]).sum();
            x[i] = (b[i] - sum) / self.get(i, i);
        }

        Some(x)
    }
}
