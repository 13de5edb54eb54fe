//! Build script for notecue - embeds build date and git commit hash
//!
//! Default builds emit `NOTECUE_BUILD_DATE` and `VERGEN_GIT_SHA`.
//! Builds with `--features release` emit the build date only, so the
//! version string stays clean.

use std::process::Command;

/// Current date as YYYY-MM-DD, or "unknown" when `date` is unavailable
fn build_date() -> String {
    match Command::new("date").args(["+%Y-%m-%d"]).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => "unknown".to_string(),
    }
}

fn main() {
    println!("cargo:rustc-env=NOTECUE_BUILD_DATE={}", build_date());

    #[cfg(not(feature = "release"))]
    {
        use vergen_gitcl::{Emitter, GitclBuilder};

        let emitted = GitclBuilder::default()
            .sha(true)
            .build()
            .map_err(|e| e.to_string())
            .and_then(|git| {
                Emitter::default()
                    .add_instructions(&git)
                    .and_then(|emitter| emitter.emit())
                    .map_err(|e| e.to_string())
            });

        // Outside a git checkout the SHA falls back to "unknown"
        if let Err(e) = emitted {
            println!("cargo:warning=Failed to get git info: {}", e);
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
        }
    }
}
