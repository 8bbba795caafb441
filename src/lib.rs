/// LibraryDB Assessment - automated grading of a SQL coursework database
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `assessment-core`: Expected-state model, probe trait and assessment engine
/// - `assessment-client`: MySQL implementation of the database probe
/// - `librarydb-grader`: Command-line grader that runs the LibraryDB assignment

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!version().is_empty());
    }
}
