//! Output presenters.
//!
//! Each presenter consumes the whole result sequence it is handed - a
//! presenter that stops early would leave the producer blocked on a full
//! channel - and writes one report to the given writer.

use std::io::Write;

use crate::finder::LicenseResult;

mod csv;
mod json;
mod markdown;
mod spdx;
mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Csv,
    Json,
    Markdown,
    Spdx,
}

/// Drain `results` and write the report in the requested format.
pub fn present<I, W>(format: Format, results: I, writer: &mut W) -> std::io::Result<()>
where
    I: IntoIterator<Item = LicenseResult>,
    W: Write,
{
    match format {
        Format::Text => text::present(results, writer),
        Format::Csv => csv::present(results, writer),
        Format::Json => json::present(results, writer),
        Format::Markdown => markdown::present(results, writer),
        Format::Spdx => spdx::present(results, writer),
    }
}
