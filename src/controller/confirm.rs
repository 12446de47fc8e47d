// ABOUTME: Confirmation step required before destructive operations
// ABOUTME: Interactive terminal prompt plus non-interactive answers

use tracing::warn;

pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Asks on the terminal; defaults to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation prompt failed, treating as no: {}", e);
                false
            }
        }
    }
}

/// Answers yes without asking, for `--yes` and scripted use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sees_prompt() {
        let declines_jobs = |prompt: &str| !prompt.contains("job");
        assert!(!declines_jobs.confirm("Delete this job?"));
        assert!(declines_jobs.confirm("Delete this contact?"));
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("anything"));
    }
}
