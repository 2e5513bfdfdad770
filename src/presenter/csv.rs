use std::io::Write;

use crate::finder::LicenseResult;

pub fn present<I, W>(results: I, writer: &mut W) -> std::io::Result<()>
where
    I: IntoIterator<Item = LicenseResult>,
    W: Write,
{
    writeln!(writer, "library,url,path,license,type,errors")?;
    for result in results {
        let path = result
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            quote(&result.library),
            quote(result.url.as_deref().unwrap_or("")),
            quote(&path),
            quote(result.license.as_deref().unwrap_or("")),
            quote(&result.category.to_string()),
            quote(&result.errors.join("; ")),
        )?;
    }
    Ok(())
}

/// RFC 4180 quoting: only fields containing a comma, quote or newline are
/// wrapped, with embedded quotes doubled.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
