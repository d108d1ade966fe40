//! Pure projection of session history into a display list
//!
//! The UI layer re-reads history after every submit and maps it through
//! here; no session state is owned or mutated on the rendering side.

use scibot_core::session::{Role, Turn};

/// Who a display line is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Bot,
}

/// One line of the rendered transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub speaker: Speaker,
    pub text: String,
}

/// Map session history to a display list, in insertion order
pub fn project(turns: &[Turn]) -> Vec<DisplayLine> {
    turns
        .iter()
        .map(|turn| DisplayLine {
            speaker: match turn.role {
                Role::User => Speaker::You,
                Role::Model => Speaker::Bot,
            },
            text: turn.text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_preserves_order_and_attribution() {
        let turns = vec![
            Turn::new(Role::User, "Why is the sky blue?"),
            Turn::new(Role::Model, "Because of Rayleigh scattering..."),
            Turn::new(Role::User, "And sunsets?"),
        ];

        let lines = project(&turns);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].speaker, Speaker::You);
        assert_eq!(lines[0].text, "Why is the sky blue?");
        assert_eq!(lines[1].speaker, Speaker::Bot);
        assert_eq!(lines[2].speaker, Speaker::You);
    }

    #[test]
    fn test_project_empty_history() {
        assert!(project(&[]).is_empty());
    }
}
