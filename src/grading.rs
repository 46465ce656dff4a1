//! Score ladders shared by subject rows and the overall summary.

/// Seven-step grade label. The same thresholds apply to one subject score and
/// to a student's average.
pub fn grade_level(score: f64) -> &'static str {
    match score {
        s if s >= 95.0 => "优秀+",
        s if s >= 90.0 => "优秀",
        s if s >= 85.0 => "良好+",
        s if s >= 80.0 => "良好",
        s if s >= 75.0 => "中等+",
        s if s >= 70.0 => "中等",
        s if s >= 60.0 => "及格",
        _ => "需努力",
    }
}

/// Colour for bars and the overall grade badge.
pub fn score_color(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "#10b981", // green
        s if s >= 80.0 => "#f59e0b", // amber
        s if s >= 70.0 => "#3b82f6", // blue
        s if s >= 60.0 => "#8b5cf6", // purple
        _ => "#ef4444",              // red
    }
}

/// Coarser five-step wording used on evaluation sheets.
pub fn evaluation_level(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "优秀",
        s if s >= 80.0 => "良好",
        s if s >= 70.0 => "合格",
        s if s >= 60.0 => "及格",
        _ => "待提高",
    }
}
