//! Plan serializer: one table per day, rendered to xlsx on demand.
//!
//! [`serialize_plan`] is pure and builds an in-memory [`PlanDocument`].
//! [`PlanDocument::to_xlsx`] renders it to workbook bytes; where the bytes go
//! (HTTP body, file on disk) is the caller's business.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use thiserror::Error;

use super::generate::{DayPlan, WorkoutPlan};

/// Column headers of a training-day sheet, in order.
pub const PLAN_COLUMNS: [&str; 5] = ["Region", "Exercise", "Sets", "Reps", "Equipment"];

/// Header of the placeholder sheet written for a rest day.
pub const REST_DAY_HEADER: &str = "Message";

/// Marker row written for a rest day.
pub const REST_DAY_MARKER: &str = "Rest Day";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

/// One named table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn for_day(day: &DayPlan) -> Self {
        if day.is_rest() {
            return Self {
                name: day.label.clone(),
                header: vec![REST_DAY_HEADER.to_owned()],
                rows: vec![vec![Cell::from(REST_DAY_MARKER)]],
            };
        }

        let rows = day
            .exercises
            .iter()
            .map(|e| {
                vec![
                    Cell::from(e.region.label()),
                    Cell::from(e.name.as_str()),
                    Cell::from(e.sets),
                    Cell::from(e.reps),
                    Cell::from(e.equipment.as_str()),
                ]
            })
            .collect();

        Self {
            name: day.label.clone(),
            header: PLAN_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
            rows,
        }
    }
}

/// A tabular rendering of a plan: one sheet per day, in day order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDocument {
    pub sheets: Vec<Sheet>,
}

/// Turn a plan into one sheet per day.
///
/// Rest days become a single-row placeholder sheet, never a zero-row table.
pub fn serialize_plan(plan: &WorkoutPlan) -> PlanDocument {
    PlanDocument {
        sheets: plan.days.iter().map(Sheet::for_day).collect(),
    }
}

impl PlanDocument {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Render the document as an xlsx workbook held in memory.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (col, title) in sheet.header.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, title, &bold)?;
            }

            for (r, row) in sheet.rows.iter().enumerate() {
                let r = r as u32 + 1;
                for (col, cell) in row.iter().enumerate() {
                    match cell {
                        Cell::Text(s) => worksheet.write_string(r, col as u16, s)?,
                        Cell::Integer(n) => worksheet.write_number(r, col as u16, *n as f64)?,
                    };
                }
            }

            worksheet.autofit();
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use fitcoach_db::models::BodyRegion;

    use super::super::generate::PrescribedExercise;
    use super::*;

    fn two_day_plan() -> WorkoutPlan {
        WorkoutPlan {
            days: vec![
                DayPlan {
                    label: "Day 1".into(),
                    exercises: vec![PrescribedExercise {
                        region: BodyRegion::Legs,
                        name: "Squat".into(),
                        sets: 3,
                        reps: 10,
                        equipment: "Barbell".into(),
                    }],
                },
                DayPlan {
                    label: "Day 2".into(),
                    exercises: vec![],
                },
            ],
        }
    }

    #[test]
    fn one_sheet_per_day_in_order() {
        let doc = serialize_plan(&two_day_plan());
        let names: Vec<_> = doc.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Day 1", "Day 2"]);
    }

    #[test]
    fn training_day_uses_fixed_columns() {
        let doc = serialize_plan(&two_day_plan());
        let day1 = doc.sheet("Day 1").unwrap();
        assert_eq!(day1.header, PLAN_COLUMNS);
        assert_eq!(
            day1.rows,
            vec![vec![
                Cell::from("Legs"),
                Cell::from("Squat"),
                Cell::Integer(3),
                Cell::Integer(10),
                Cell::from("Barbell"),
            ]]
        );
    }

    #[test]
    fn rest_day_is_a_single_placeholder_row() {
        let doc = serialize_plan(&two_day_plan());
        let day2 = doc.sheet("Day 2").unwrap();
        assert_eq!(day2.header, [REST_DAY_HEADER]);
        assert_eq!(day2.rows, vec![vec![Cell::from(REST_DAY_MARKER)]]);
    }

    #[test]
    fn renders_a_zip_container() {
        let bytes = serialize_plan(&two_day_plan()).to_xlsx().unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx is a zip archive");
    }
}
