//! Main entry point for LookoutCli

#![deny(warnings, missing_docs, trivial_casts, unused_qualifications)]
#![forbid(unsafe_code)]

use lookout_cli::application::APP;

/// Boot LookoutCli
fn main() {
    abscissa_core::boot(&APP);
}
