//! # 吸收峰检测
//!
//! 在透过率曲线上寻找局部极小值（吸收峰）。
//!
//! ## 算法概述
//! 1. 按光谱原始行顺序寻找局部极小值（平台取中点，首尾样本不算）
//! 2. 最小间距过滤：按深度从深到浅依次保留，删除距离小于 `min_separation` 的邻峰
//! 3. 显著度过滤：向两侧走到第一个比峰更低的点（或边界/窗口），
//!    两侧最高点中较低者与峰值之差即为显著度
//! 4. 按波数降序排序并截断为 `max_count` 个
//!
//! 行顺序是检测的一部分：重排光谱会改变“相邻”关系，从而改变结果。
//!
//! ## 参考
//! - scipy.signal.find_peaks (distance, prominence, wlen)
//!
//! ## 依赖关系
//! - 被 `pipeline.rs` 调用
//! - 使用 `models/` 的 Spectrum, PeakCandidate

use crate::config::DetectionConfig;
use crate::models::{PeakCandidate, Spectrum};

/// 峰检测参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakParams {
    pub min_separation: usize,
    pub min_prominence: f64,
    pub max_count: usize,
    pub window: Option<usize>,
}

impl PeakParams {
    pub fn new(detection: &DetectionConfig, max_count: usize) -> Self {
        Self {
            min_separation: detection.min_separation,
            min_prominence: detection.min_prominence,
            max_count,
            window: detection.window,
        }
    }
}

/// 检测吸收峰
///
/// 返回按波数降序排列、最多 `max_count` 个峰；没有峰时返回空列表。
pub fn detect_peaks(spectrum: &Spectrum, params: &PeakParams) -> Vec<PeakCandidate> {
    let t = spectrum.transmittance();
    let wn = spectrum.wavenumber();

    let minima = local_minima(t);
    let spaced = select_by_separation(t, &minima, params.min_separation);

    let mut peaks: Vec<PeakCandidate> = spaced
        .into_iter()
        .filter_map(|index| {
            let prominence = prominence(t, index, params.window);
            (prominence >= params.min_prominence).then_some(PeakCandidate {
                index,
                wavenumber: wn[index],
                transmittance: t[index],
                prominence,
                rank: 0,
            })
        })
        .collect();

    // 稳定排序：波数相同的峰保持行顺序
    peaks.sort_by(|a, b| b.wavenumber.total_cmp(&a.wavenumber));
    peaks.truncate(params.max_count);

    for (i, peak) in peaks.iter_mut().enumerate() {
        peak.rank = i + 1;
    }

    peaks
}

/// 局部极小值的行号（升序）
///
/// 平台（连续相等的极小值）取中点，偶数宽度时偏左。
pub fn local_minima(t: &[f64]) -> Vec<usize> {
    let mut minima = Vec::new();
    if t.len() < 3 {
        return minima;
    }

    let last = t.len() - 1;
    let mut i = 1;
    while i < last {
        if t[i - 1] > t[i] {
            let mut ahead = i + 1;
            while ahead < last && t[ahead] == t[i] {
                ahead += 1;
            }
            if t[ahead] > t[i] {
                let right_edge = ahead - 1;
                minima.push((i + right_edge) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    minima
}

/// 按最小间距过滤峰，更深的峰优先
///
/// `peaks` 必须升序。返回保留的行号（升序）。
pub fn select_by_separation(t: &[f64], peaks: &[usize], min_separation: usize) -> Vec<usize> {
    if min_separation <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }

    // 按深度升序（透过率降序）的稳定排序，从尾部开始处理
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| t[peaks[b]].total_cmp(&t[peaks[a]]));

    let mut keep = vec![true; peaks.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }

        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < min_separation {
            keep[k - 1] = false;
            k -= 1;
        }

        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < min_separation {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// 计算某个极小值的显著度
///
/// `window` 限制向两侧搜索的范围（向上取奇数后各取一半）。
pub fn prominence(t: &[f64], peak: usize, window: Option<usize>) -> f64 {
    let (lo, hi) = match window {
        Some(w) if w > 1 => {
            let w = if w % 2 == 0 { w + 1 } else { w };
            let half = w / 2;
            (peak.saturating_sub(half), (peak + half).min(t.len() - 1))
        }
        _ => (0, t.len() - 1),
    };

    let value = t[peak];

    let mut left_max = value;
    let mut i = peak;
    loop {
        if t[i] < value {
            break;
        }
        left_max = left_max.max(t[i]);
        if i == lo {
            break;
        }
        i -= 1;
    }

    let mut right_max = value;
    let mut i = peak;
    while i <= hi && t[i] >= value {
        right_max = right_max.max(t[i]);
        i += 1;
    }

    left_max.min(right_max) - value
}
