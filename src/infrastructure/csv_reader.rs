// CSV reader - Best-effort parsing of header + rows into tagged fields
//
// Quotes only toggle the "inside quotes" state; a doubled quote (`""`) closes
// and reopens the quoted region rather than producing a literal quote.
use crate::domain::task::TaskRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A parsed cell: a number when the whole trimmed text is numeric, text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && !trimmed.is_empty() => FieldValue::Number(value),
            _ => FieldValue::Text(trimmed.to_string()),
        }
    }

    /// Numeric value, with text treated as zero.
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Number(value) => *value,
            FieldValue::Text(_) => 0.0,
        }
    }
}

/// Kind a consumer expects for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    name: String,
    raw: String,
    value: FieldValue,
}

/// One data line, paired with the header names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    cells: Vec<Cell>,
}

impl CsvRow {
    /// Coerced value for `name`. Duplicate headers resolve to the last column.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.cell(name).map(|c| &c.value)
    }

    /// Trimmed text exactly as it appeared in the file.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.cell(name).map(|c| c.raw.as_str())
    }

    /// Value for `name` read as the declared kind. Missing columns read as
    /// empty text or zero.
    pub fn typed(&self, name: &str, kind: FieldKind) -> FieldValue {
        match kind {
            FieldKind::Text => FieldValue::Text(self.text(name)),
            FieldKind::Number => FieldValue::Number(self.get(name).map_or(0.0, FieldValue::as_f64)),
        }
    }

    pub fn text(&self, name: &str) -> String {
        self.raw(name).unwrap_or_default().to_string()
    }

    pub fn number(&self, name: &str) -> f64 {
        self.typed(name, FieldKind::Number).as_f64()
    }

    fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().rev().find(|c| c.name == name)
    }
}

/// Parses CSV text. Never fails: short rows pad with empty text, extra values are dropped.
pub fn parse(csv_text: &str) -> Vec<CsvRow> {
    let mut lines = csv_text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line.split(',').map(|h| h.trim().to_string()).collect();

    lines.map(|line| parse_line(line, &headers)).collect()
}

fn parse_line(line: &str, headers: &[String]) -> CsvRow {
    let values = split_fields(line);
    let cells = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let raw = values.get(i).cloned().unwrap_or_default();
            Cell {
                name: name.clone(),
                value: FieldValue::coerce(&raw),
                raw,
            }
        })
        .collect();
    CsvRow { cells }
}

fn split_fields(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());
    values
}

const TEXT_COLUMNS: [&str; 6] = ["taskId", "taskCode", "taskTitle", "stepId", "stepTitle", "type"];

/// Maps a row onto the task-record schema.
///
/// Text columns keep their raw text, so digit-only ids stay strings.
/// Returns the record and whether score or time had to be clamped.
pub fn task_record_from_row(row: &CsvRow) -> (TaskRecord, bool) {
    let [task_id, task_code, task_title, step_id, step_title, task_type] =
        TEXT_COLUMNS.map(|name| row.text(name));

    let mut task = TaskRecord::new(task_id, task_title, row.number("maxScore"));
    task.task_code = task_code;
    task.step_id = step_id;
    task.step_title = step_title;
    task.task_type = task_type;

    let start_time = row
        .raw("startTime")
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|t| t.with_timezone(&Utc));
    let clamped = task.record_attempt(row.number("obtainedScore"), row.number("completionTime"), start_time);
    (task, clamped)
}

/// Maps a scenario template row, filling gaps the way templates are authored:
/// positional ids, a placeholder title and a max score of at least one.
pub fn template_task_from_row(row: &CsvRow, position: usize) -> TaskRecord {
    let (mut task, _) = task_record_from_row(row);
    if task.task_id.is_empty() {
        task.task_id = format!("T{}", position + 1);
    }
    if task.task_code.is_empty() {
        task.task_code = format!("TASK{}", position + 1);
    }
    if task.task_title.is_empty() {
        task.task_title = "Task Title".to_string();
    }
    if task.max_score <= 0.0 {
        task.max_score = 1.0;
    }
    task
}

/// Parses an exported session file into task records.
pub fn read_task_records(csv_text: &str) -> Vec<TaskRecord> {
    parse(csv_text)
        .iter()
        .map(|row| {
            let (task, clamped) = task_record_from_row(row);
            if clamped {
                tracing::debug!("Clamped score or time for task {}", task.task_id);
            }
            task
        })
        .collect()
}

/// Parses a subject's master task list. Catalog rows carry no attempt, so
/// default scores and times are expected and not reported.
pub fn read_task_list(csv_text: &str) -> Vec<TaskRecord> {
    parse(csv_text)
        .iter()
        .map(|row| task_record_from_row(row).0)
        .collect()
}

/// Parses a scenario template into tasks ready for synthesis.
pub fn read_template_tasks(csv_text: &str) -> Vec<TaskRecord> {
    parse(csv_text)
        .iter()
        .enumerate()
        .map(|(i, row)| template_task_from_row(row, i))
        .collect()
}
