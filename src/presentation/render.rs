// JSON rendering of dashboard views
use crate::domain::dashboard::{LecturerOverview, StudentDashboard};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum DashboardView {
    Student(StudentDashboard),
    Lecturer(LecturerOverview),
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn render_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::RankedTaskList;

    fn overview() -> LecturerOverview {
        LecturerOverview {
            title: "CPR Cohort Overview".to_string(),
            subject_id: "SUBJECT1".to_string(),
            subject_name: "CPR".to_string(),
            student_count: 2,
            session_count: 20,
            average_score_percent: 61.5,
            top_tasks: RankedTaskList::default(),
        }
    }

    #[test]
    fn test_render_tags_view_and_uses_camel_case() {
        let mut out = Vec::new();
        render_json(&mut out, &DashboardView::Lecturer(overview())).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["view"], "lecturer");
        assert_eq!(json["studentCount"], 2);
        assert_eq!(json["averageScorePercent"], 61.5);
        assert_eq!(json["topTasks"]["topBest"], serde_json::json!([]));
    }
}
