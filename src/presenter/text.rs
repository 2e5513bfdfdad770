use std::io::Write;

use crate::finder::LicenseResult;

/// Aligned three-column report. Record-level errors show inline as notes
/// under the offending row.
pub fn present<I, W>(results: I, writer: &mut W) -> std::io::Result<()>
where
    I: IntoIterator<Item = LicenseResult>,
    W: Write,
{
    let results: Vec<LicenseResult> = results.into_iter().collect();
    if results.is_empty() {
        return writeln!(writer, "No libraries found.");
    }

    let lib_width = column_width("Library", results.iter().map(|r| r.library.len()));
    let license_width = column_width(
        "License",
        results.iter().map(|r| r.license.as_deref().unwrap_or("").len()),
    );

    writeln!(
        writer,
        "{:<lib_width$}  {:<license_width$}  {}",
        "Library", "License", "URL"
    )?;
    for result in &results {
        writeln!(
            writer,
            "{:<lib_width$}  {:<license_width$}  {}",
            result.library,
            result.license.as_deref().unwrap_or(""),
            result.url.as_deref().unwrap_or(""),
        )?;
        for error in &result.errors {
            writeln!(writer, "{:<lib_width$}  note: {}", "", error)?;
        }
    }
    Ok(())
}

fn column_width(header: &str, widths: impl Iterator<Item = usize>) -> usize {
    widths.chain(std::iter::once(header.len())).max().unwrap_or(0)
}
