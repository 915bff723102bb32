//! Employee list CSV, shaped for spreadsheet tools (UTF-8 with BOM).

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use workforce_core::payload::EmployeeRow;

const BOM: &str = "\u{feff}";

pub const COLUMNS: [&str; 10] = [
    "Employee",
    "Employee Number",
    "Employee Name",
    "Branch",
    "Department",
    "Designation",
    "Type",
    "Nationality",
    "Nationality Group",
    "Date of Joining",
];

/// `Employees_<company>_<YYYYMMDD>.csv`, with path separators replaced.
pub fn export_file_name(company: &str, as_on: NaiveDate) -> String {
    let company: String = company
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("Employees_{}_{}.csv", company, as_on.format("%Y%m%d"))
}

pub fn employees_csv(rows: &[EmployeeRow]) -> io::Result<Vec<u8>> {
    let mut buf = BOM.as_bytes().to_vec();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(COLUMNS)?;
        for r in rows {
            let text = |v: &Option<String>| v.clone().unwrap_or_default();
            wtr.write_record([
                r.employee.clone(),
                text(&r.employee_number),
                text(&r.employee_name),
                text(&r.branch),
                text(&r.department),
                text(&r.designation),
                r.type_label().to_string(),
                text(&r.nationality),
                text(&r.nationality_group),
                text(&r.date_of_joining),
            ])?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

/// Write the export into `dir` and return its path.
pub fn write_export(
    dir: &Path,
    company: &str,
    as_on: NaiveDate,
    rows: &[EmployeeRow],
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(company, as_on));
    std::fs::write(&path, employees_csv(rows)?)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "employee export written");
    Ok(path)
}
