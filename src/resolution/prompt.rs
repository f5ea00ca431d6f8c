use dialoguer::{Confirm, Input};

use crate::errors::{KioskError, Result};
use crate::types::{parse_date, Person, RecordId};

/// Asks the operator to pick one of several people matching a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisambiguationRequest {
    /// The name as typed in the submitted record.
    pub name: String,
    /// One label per candidate, in match order; choice `n` picks `choices[n - 1]`.
    pub choices: Vec<String>,
}

impl DisambiguationRequest {
    pub fn new(name: &str, matches: &[&Person]) -> Self {
        Self {
            name: name.to_string(),
            choices: matches
                .iter()
                .map(|person| format!("{} ({})", person.name, person.birth_date))
                .collect(),
        }
    }

    /// Renders the numbered list shown to the operator.
    pub fn prompt_text(&self) -> String {
        let mut out = format!("Multiple matches found for '{}':\n", self.name);
        for (i, choice) in self.choices.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, choice));
        }
        out.push_str("Enter number to select or cancel to leave unresolved.");
        out
    }
}

/// Minimal person entry offered when a referenced name matches nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub birth_date: String,
    pub gender: String,
}

impl PersonDraft {
    /// Creates a draft with the name pre-filled.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Checks that the draft can become a person: a non-empty name and a
    /// birth date that is empty or `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(KioskError::Validation {
                message: "name must not be empty".to_string(),
            });
        }
        let birth_date = self.birth_date.trim();
        if !birth_date.is_empty() && parse_date(birth_date).is_none() {
            return Err(KioskError::Validation {
                message: format!("birth date '{birth_date}' is not YYYY-MM-DD"),
            });
        }
        Ok(())
    }

    /// Builds the person record for this draft.
    pub fn into_person(self, id: RecordId) -> Person {
        Person {
            birth_date: self.birth_date.trim().to_string(),
            gender: self.gender.trim().to_string(),
            ..Person::new(id, self.name.trim())
        }
    }
}

/// Decisions the resolver cannot make on its own.
///
/// Any front end (terminal, GUI, scripted test driver) answers these.
pub trait Prompter {
    /// Asks for the number of the intended match. Returns the raw answer,
    /// or `None` when the operator cancels.
    fn choose_match(&mut self, request: &DisambiguationRequest) -> Result<Option<String>>;

    /// Asks whether a person should be created for an unknown name.
    fn confirm_create(&mut self, name: &str) -> Result<bool>;

    /// Lets the operator complete a draft. Returns `None` to skip.
    fn quick_add(&mut self, draft: PersonDraft) -> Result<Option<PersonDraft>>;
}

/// Interactive prompts on the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn choose_match(&mut self, request: &DisambiguationRequest) -> Result<Option<String>> {
        eprintln!("{}", request.prompt_text());
        let answer: String = Input::new()
            .with_prompt("Number (empty to cancel)")
            .allow_empty(true)
            .interact_text()?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer.to_string()))
        }
    }

    fn confirm_create(&mut self, name: &str) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(format!("'{name}' is not in the system. Add them now?"))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn quick_add(&mut self, draft: PersonDraft) -> Result<Option<PersonDraft>> {
        eprintln!("Quick add: {}", draft.name);
        let name: String = Input::new()
            .with_prompt("Full name")
            .with_initial_text(draft.name.clone())
            .interact_text()?;
        let birth_date: String = Input::new()
            .with_prompt("Birth date (YYYY-MM-DD)")
            .with_initial_text(draft.birth_date.clone())
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                let input = input.trim();
                if input.is_empty() || parse_date(input).is_some() {
                    Ok(())
                } else {
                    Err("use YYYY-MM-DD")
                }
            })
            .interact_text()?;
        let gender: String = Input::new()
            .with_prompt("Gender")
            .with_initial_text(draft.gender.clone())
            .allow_empty(true)
            .interact_text()?;

        let add = Confirm::new()
            .with_prompt(format!("Add {}?", name.trim()))
            .default(true)
            .interact()?;
        if !add {
            return Ok(None);
        }
        Ok(Some(PersonDraft {
            name,
            birth_date,
            gender,
        }))
    }
}

/// Answers every request negatively: cancels picks, declines creation.
///
/// Used when no operator is present; ambiguous and unknown names simply end
/// up unresolved.
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn choose_match(&mut self, _request: &DisambiguationRequest) -> Result<Option<String>> {
        Ok(None)
    }

    fn confirm_create(&mut self, _name: &str) -> Result<bool> {
        Ok(false)
    }

    fn quick_add(&mut self, _draft: PersonDraft) -> Result<Option<PersonDraft>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_numbers_choices() {
        let a = Person {
            birth_date: "1950-01-01".to_string(),
            ..Person::new(1, "Alice Smith")
        };
        let b = Person::new(2, "Alice Jones");
        let request = DisambiguationRequest::new("Alice", &[&a, &b]);
        let text = request.prompt_text();
        assert!(text.contains("'Alice'"));
        assert!(text.contains("1. Alice Smith (1950-01-01)"));
        assert!(text.contains("2. Alice Jones ()"));
    }

    #[test]
    fn test_draft_validation() {
        assert!(PersonDraft::new("Carol").validate().is_ok());
        assert!(PersonDraft::new("  ").validate().is_err());
        let bad_date = PersonDraft {
            birth_date: "1990/02/03".to_string(),
            ..PersonDraft::new("Carol")
        };
        assert!(matches!(
            bad_date.validate(),
            Err(KioskError::Validation { .. })
        ));
    }

    #[test]
    fn test_draft_into_person_trims() {
        let draft = PersonDraft {
            name: " Carol ".to_string(),
            birth_date: "1990-02-03 ".to_string(),
            gender: "F".to_string(),
        };
        let person = draft.into_person(RecordId::Number(9));
        assert_eq!(person.name, "Carol");
        assert_eq!(person.birth_date, "1990-02-03");
        assert_eq!(person.id, RecordId::Number(9));
    }
}
