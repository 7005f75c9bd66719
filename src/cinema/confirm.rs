//! Yes/no confirmation for destructive favorite changes.
//!
//! The controller asks through [`ConfirmIntent`]; closures implement it, and
//! the TUI answers from its confirm overlay via [`Deferred`].

/// A destructive action awaiting a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    RemoveFavorite { id: String, name: String },
    ClearFavorites { count: usize },
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        match self {
            ConfirmPrompt::RemoveFavorite { name, .. } => {
                format!("Remove '{}' from favorites?", name)
            }
            ConfirmPrompt::ClearFavorites { count } => {
                format!("Clear all {} favorites? This cannot be undone.", count)
            }
        }
    }
}

/// Decides whether a destructive action goes ahead.
pub trait ConfirmIntent {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool;
}

impl<F> ConfirmIntent for F
where
    F: FnMut(&ConfirmPrompt) -> bool,
{
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool {
        self(prompt)
    }
}

/// Answers every prompt with yes. Used once the user has already confirmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmed;

impl ConfirmIntent for Confirmed {
    fn confirm(&mut self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

/// Records the prompt and declines, so the caller can ask the user later.
#[derive(Debug, Default)]
pub struct Deferred {
    pub prompt: Option<ConfirmPrompt>,
}

impl ConfirmIntent for Deferred {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool {
        self.prompt = Some(prompt.clone());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_intent() {
        let mut asked = 0;
        let mut intent = |_: &ConfirmPrompt| {
            asked += 1;
            false
        };
        assert!(!intent.confirm(&ConfirmPrompt::ClearFavorites { count: 2 }));
        assert_eq!(asked, 1);
    }

    #[test]
    fn test_deferred_captures_prompt() {
        let mut deferred = Deferred::default();
        let prompt = ConfirmPrompt::RemoveFavorite {
            id: "a".into(),
            name: "Alpha".into(),
        };
        assert!(!deferred.confirm(&prompt));
        assert_eq!(deferred.prompt, Some(prompt));
    }

    #[test]
    fn test_message_names_channel() {
        let prompt = ConfirmPrompt::RemoveFavorite {
            id: "a".into(),
            name: "Alpha".into(),
        };
        assert!(prompt.message().contains("Alpha"));
    }
}
