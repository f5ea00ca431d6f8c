/// Reference resolution module.
///
/// Resolves free-text person names in submitted records against the people
/// collection, asking a `Prompter` whenever a decision is ambiguous.
mod prompt;
mod resolver;

pub use prompt::{
    DisambiguationRequest, NonInteractivePrompter, PersonDraft, Prompter, TerminalPrompter,
};
pub use resolver::ReferenceResolver;
