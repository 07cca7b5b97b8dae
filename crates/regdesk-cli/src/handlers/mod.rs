//! Command handlers.
//!
//! Handlers are thin: they translate flags into core form sessions and
//! port calls on the composed context, and print the results. Registry
//! errors are surfaced verbatim.

pub mod agents;
pub mod central;
pub mod models;
pub mod servers;
pub mod session;

use anyhow::Result;

use regdesk_core::{PageRequest, VerificationFailure, VerificationState};

use crate::commands::ListArgs;

/// Build a page request from the shared list flags.
pub fn page_request(args: &ListArgs) -> PageRequest {
    let mut request = PageRequest::first()
        .with_page(args.page)
        .with_size(args.size);
    if let Some(search) = &args.search {
        request = request.with_search(search.clone());
    }
    if let Some(sort_by) = &args.sort_by {
        request = request.with_sort(sort_by.clone(), args.sort_dir.unwrap_or_default());
    }
    request
}

/// Turn a failed verification into a command error.
pub fn verification_error(
    state: VerificationState,
    failure: Option<&VerificationFailure>,
) -> anyhow::Error {
    debug_assert_ne!(state, VerificationState::Ok);
    match failure {
        Some(f) => {
            let mut message = format!("connection test failed: {}", f.message);
            if let Some(status) = f.status {
                message.push_str(&format!(" (HTTP {status})"));
            }
            anyhow::anyhow!(message)
        }
        None => anyhow::anyhow!("connection test did not pass"),
    }
}

/// Ask for confirmation on stdin unless `--yes` was given.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    eprint!("{prompt} [y/N] ");
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

/// Print a JSON value, or write it to a file when `out` is given.
pub fn emit_json(value: &serde_json::Value, out: Option<&std::path::Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))?;
            println!("wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regdesk_core::SortDir;

    #[test]
    fn test_page_request_from_flags() {
        let args = ListArgs {
            search: Some("  gpt ".to_string()),
            page: 3,
            size: 10,
            sort_by: Some("provider".to_string()),
            sort_dir: Some(SortDir::Desc),
        };

        let request = page_request(&args);
        assert_eq!(request.page, 3);
        assert_eq!(request.size, 10);
        assert_eq!(request.search.as_deref(), Some("gpt"));
        assert_eq!(request.sort_by.as_deref(), Some("provider"));
        assert_eq!(request.sort_dir, Some(SortDir::Desc));
    }

    #[test]
    fn test_verification_error_includes_status() {
        let failure = VerificationFailure {
            message: "refused".to_string(),
            status: Some(502),
            details: None,
        };
        let error = verification_error(VerificationState::Failed, Some(&failure));
        let text = error.to_string();
        assert!(text.contains("refused"));
        assert!(text.contains("502"));
    }
}
