use std::io::Write;

use crate::finder::LicenseResult;

pub fn present<I, W>(results: I, writer: &mut W) -> std::io::Result<()>
where
    I: IntoIterator<Item = LicenseResult>,
    W: Write,
{
    writeln!(writer, "# License Report")?;
    writeln!(writer)?;
    for result in results {
        writeln!(
            writer,
            "- **{}**: `{}`",
            result.library,
            result.license.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::presenter::test_support::{render, sample};
    use crate::presenter::Format;

    #[test]
    fn test_markdown_report() {
        let out = render(Format::Markdown, sample());
        assert!(out.starts_with("# License Report\n\n"));
        assert!(out.contains("- **github.com/org/alpha**: `MIT`"));
        assert!(out.contains("- **example.com/org/beta**: ``"));
    }
}
