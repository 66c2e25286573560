use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::dashboard::view_model::DashboardViewModel;

pub const SHEET_NAME: &str = "Attendance";
pub const EXPORT_FILE_NAME: &str = "WeeklyAttendance.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const HEADER: [&str; 3] = ["Day", "Present", "Absent"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no chart data to export")]
    NoChartData,
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub day: String,
    pub present: u32,
    pub absent: u32,
}

/// One sheet, one row per chart label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    pub name: &'static str,
    pub header: [&'static str; 3],
    pub rows: Vec<SheetRow>,
}

impl AttendanceSheet {
    pub fn from_view_model(vm: &DashboardViewModel) -> Result<Self, ExportError> {
        if !vm.has_chart_data() {
            return Err(ExportError::NoChartData);
        }

        let rows = vm
            .rows()
            .map(|(day, present, absent)| SheetRow {
                day: day.to_string(),
                present,
                absent,
            })
            .collect();

        Ok(Self {
            name: SHEET_NAME,
            header: HEADER,
            rows,
        })
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.name)?;

        for (col, title) in self.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        for (idx, row) in self.rows.iter().enumerate() {
            let line = idx as u32 + 1;
            worksheet.write_string(line, 0, &row.day)?;
            worksheet.write_number(line, 1, row.present)?;
            worksheet.write_number(line, 2, row.absent)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct SpreadsheetFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export_weekly(vm: &DashboardViewModel) -> Result<SpreadsheetFile, ExportError> {
    let sheet = AttendanceSheet::from_view_model(vm)?;
    Ok(SpreadsheetFile {
        file_name: EXPORT_FILE_NAME,
        content_type: XLSX_CONTENT_TYPE,
        bytes: sheet.to_xlsx()?,
    })
}
