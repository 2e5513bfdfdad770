//! SPDX-2.3 tag-value output.
//! https://spdx.github.io/spdx-spec/v2.3/SPDX-tag-value-format/

use std::io::Write;

use chrono::Utc;
use uuid::Uuid;

use crate::finder::LicenseResult;

pub fn present<I, W>(results: I, writer: &mut W) -> std::io::Result<()>
where
    I: IntoIterator<Item = LicenseResult>,
    W: Write,
{
    writeln!(writer, "SPDXVersion: SPDX-2.3")?;
    writeln!(writer, "DataLicense: CC0-1.0")?;
    writeln!(writer, "SPDXID: SPDXRef-DOCUMENT")?;
    writeln!(writer, "DocumentName: go-license-auditor-report")?;
    writeln!(writer, "DocumentNamespace: urn:uuid:{}", Uuid::new_v4())?;
    writeln!(
        writer,
        "Creator: Tool: go-license-auditor (github.com/go-license-auditor/go-license-auditor)"
    )?;
    writeln!(writer, "Created: {}", Utc::now().format("%Y-%m-%dT%H:%M:%SZ"))?;
    writeln!(writer)?;

    for result in results {
        writeln!(writer, "##### Package: {}", result.library)?;
        writeln!(writer)?;
        writeln!(writer, "PackageName: {}", result.library)?;
        writeln!(writer, "SPDXID: SPDXRef-Package-{}", sanitize_spdx_id(&result.library))?;
        writeln!(
            writer,
            "PackageDownloadLocation: {}",
            download_location(result.url.as_deref())
        )?;
        writeln!(writer, "FilesAnalyzed: false")?;

        let concluded = match result.license.as_deref() {
            Some(license) if is_valid_spdx_license_id(license) => license.to_string(),
            _ => "NOASSERTION".to_string(),
        };
        writeln!(writer, "LicenseConcluded: {concluded}")?;
        writeln!(writer, "LicenseDeclared: {concluded}")?;
        writeln!(
            writer,
            "PackageLicenseComments: Source path: {}",
            result
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )?;
        writeln!(writer, "PackageCopyrightText: NOASSERTION")?;
        writeln!(writer)?;
    }
    Ok(())
}

fn download_location(url: Option<&str>) -> String {
    let Some(url) = url else {
        return "NOASSERTION".to_string();
    };
    let is_vcs = url.contains("github.com")
        || url.contains("gitlab.com")
        || url.contains("bitbucket.org")
        || url.ends_with(".git");
    if is_vcs && !url.starts_with("git+") {
        format!("git+{url}")
    } else {
        url.to_string()
    }
}

/// SPDXID strings allow only letters, numbers, "." and "-".
fn sanitize_spdx_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '-' })
        .collect()
}

/// Simplified check against the short list of identifiers this tool can
/// conclude; complex expressions are never concluded.
fn is_valid_spdx_license_id(id: &str) -> bool {
    let lower = id.to_lowercase();
    if lower.contains(" and ") || lower.contains(" or ") {
        return false;
    }
    matches!(
        lower.as_str(),
        "mit" | "mit-0"
            | "apache-2.0"
            | "mpl-2.0"
            | "gpl-2.0"
            | "gpl-3.0"
            | "lgpl-2.1"
            | "lgpl-3.0"
            | "agpl-3.0"
            | "bsd-2-clause"
            | "bsd-3-clause"
            | "isc"
            | "zlib"
            | "unlicense"
            | "cc0-1.0"
            | "wtfpl"
    )
}
