use std::io::Write;

use crate::finder::LicenseResult;

pub fn present<I, W>(results: I, writer: &mut W) -> std::io::Result<()>
where
    I: IntoIterator<Item = LicenseResult>,
    W: Write,
{
    let results: Vec<LicenseResult> = results.into_iter().collect();
    serde_json::to_writer_pretty(&mut *writer, &results)?;
    writeln!(writer)
}
