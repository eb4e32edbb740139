//! CSV export of the currently loaded user list.

use std::path::Path;

use crate::api::User;
use crate::error::Result;

/// File the export is written to, in the working directory.
pub const EXPORT_FILE: &str = "users.csv";

const CSV_HEADER: &str = "ID,Name,Email";

/// Render the list as CSV text: the header line, then one line per record
/// in the given order. Fields are written as-is; a comma inside a value
/// shifts the columns.
pub fn csv_text(users: &[User]) -> String {
    let mut lines = Vec::with_capacity(users.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for user in users {
        lines.push(format!("{},{},{}", user.id, user.name, user.email));
    }
    lines.join("\n")
}

/// Write the list as CSV to `path`.
pub fn write_csv(users: &[User], path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, csv_text(users))?;
    Ok(())
}
