use crate::record::types::{CaptureTime, EntityName};
use crate::series::vocab::{Mode, Skill};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub at: CaptureTime,
    pub value: i64,
}

/// One skill/mode pair over time, ascending by capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub skill: Skill,
    pub mode: Mode,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last value minus first value. For rank a negative gain is an improvement.
    pub fn gain(&self) -> Option<i64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some(last.value - first.value)
    }
}

/// What a renderer needs to draw a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart<'a> {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: &'a Series,
}

impl<'a> Chart<'a> {
    pub fn new(entity: &EntityName, series: &'a Series) -> Self {
        Self {
            title: format!("{} {} {}", entity, series.skill, series.mode),
            x_label: "Date".to_string(),
            y_label: capitalize(series.mode.as_str()),
            series,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
