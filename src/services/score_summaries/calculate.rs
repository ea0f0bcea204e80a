//! 成绩汇总计算
//!
//! 输入一个汇总范围（科目/学年/学期/年级）下的全部评价方式与成绩，输出每名学生的汇总行。
//! 纯计算，不访问存储。

use std::collections::{BTreeMap, HashSet};

use crate::models::evaluation_methods::entities::EvaluationMethod;
use crate::models::score_summaries::entities::{AchievementLevel, NewScoreSummary};
use crate::models::scores::entities::Score;
use crate::utils::round2;

/// 9 等级累计百分比上限
const GRADE_BAND_CUTOFFS: [i64; 9] = [4, 11, 23, 40, 60, 77, 89, 96, 100];

/// 计算范围内所有学生的汇总
///
/// 参与排名的是在该范围内至少有一条成绩的学生；缺考的评价方式按 0 分计。
pub fn aggregate(methods: &[EvaluationMethod], scores: &[Score]) -> Vec<NewScoreSummary> {
    let method_ids: HashSet<i64> = methods.iter().map(|m| m.id).collect();
    let weight_sum: f64 = methods.iter().map(|m| m.weight).sum();

    let mut totals: BTreeMap<i64, f64> = BTreeMap::new();
    for score in scores
        .iter()
        .filter(|s| method_ids.contains(&s.evaluation_method_id))
    {
        *totals.entry(score.student_id).or_insert(0.0) += score.weighted_score;
    }
    if totals.is_empty() {
        return Vec::new();
    }

    let totals: Vec<(i64, f64)> = totals
        .into_iter()
        .map(|(student_id, total)| (student_id, round2(total)))
        .collect();
    let (average, deviation) = mean_and_deviation(totals.iter().map(|(_, t)| *t));
    let n = totals.len() as i64;

    let mut rows: Vec<NewScoreSummary> = totals
        .iter()
        .map(|&(student_id, total)| {
            let higher = totals.iter().filter(|(_, t)| *t > total).count() as i64;
            let ties = totals.iter().filter(|(_, t)| *t == total).count() as i64;
            let rank = higher + 1;
            NewScoreSummary {
                student_id,
                total_score: total,
                subject_average: average,
                standard_deviation: deviation,
                rank: rank as i32,
                student_count: n as i32,
                grade_band: grade_band(rank, ties, n),
                achievement_level: achievement_level(total, weight_sum),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.rank.cmp(&b.rank).then(a.student_id.cmp(&b.student_id)));
    rows
}

/// 平均分与总体标准差，均保留两位小数
pub fn mean_and_deviation(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (round2(mean), round2(variance.sqrt()))
}

/// 等级（1..=9）
///
/// 并列者取并列区间的中点名次 `rank + (ties - 1) / 2` 计算累计百分比。
/// 比较改写为整数形式 `(2 * rank + ties - 1) * 50 <= cutoff * n`。
pub fn grade_band(rank: i64, ties: i64, student_count: i64) -> i32 {
    if student_count <= 0 {
        return 9;
    }
    let scaled = (2 * rank + ties - 1) * 50;
    GRADE_BAND_CUTOFFS
        .iter()
        .position(|cutoff| scaled <= cutoff * student_count)
        .map(|i| i as i32 + 1)
        .unwrap_or(9)
}

/// 成就等级：总分占全部权重之和的百分比
pub fn achievement_level(total: f64, weight_sum: f64) -> AchievementLevel {
    if weight_sum <= 0.0 {
        return AchievementLevel::E;
    }
    let percent = total / weight_sum * 100.0;
    match percent {
        p if p >= 90.0 => AchievementLevel::A,
        p if p >= 80.0 => AchievementLevel::B,
        p if p >= 70.0 => AchievementLevel::C,
        p if p >= 60.0 => AchievementLevel::D,
        _ => AchievementLevel::E,
    }
}
