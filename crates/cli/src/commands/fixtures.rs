//! Mock dataset checks.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use dashdesk_admin::marketplace::{MockDataError, MockFixture};

/// Errors from `fixtures check`.
#[derive(Debug, Error)]
pub enum FixturesError {
    /// The file could not be read or is not valid YAML for the dataset.
    #[error(transparent)]
    Load(#[from] MockDataError),

    /// The dataset parsed but is inconsistent.
    #[error("{0} problems found")]
    Problems(usize),
}

/// Load a dataset and report every consistency problem.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or has any problem.
pub fn check(file: Option<&Path>) -> Result<(), FixturesError> {
    let fixture = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading mock dataset");
            MockFixture::from_path(path)?
        }
        None => {
            info!("Loading bundled mock dataset");
            MockFixture::bundled()?
        }
    };

    for (entity, count) in fixture.counts() {
        info!("  {entity}: {count}");
    }

    let problems = fixture.problems();
    if !problems.is_empty() {
        error!("Dataset is inconsistent:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(FixturesError::Problems(problems.len()));
    }

    info!("Dataset OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_dataset_passes() {
        assert!(check(None).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = check(Some(Path::new("/nonexistent/mock.yaml")));
        assert!(matches!(err, Err(FixturesError::Load(_))));
    }
}
