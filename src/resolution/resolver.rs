use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::search::SearchEngine;
use crate::store::RecordStore;
use crate::types::*;

use super::prompt::{DisambiguationRequest, PersonDraft, Prompter};

/// Links free-text person names in submitted records to person records.
///
/// Names are looked up by partial match. A single hit links directly,
/// several hits go to the operator, and names nobody matches are offered
/// for creation once every field has been processed. The submitted record's
/// text is never rewritten; the outcome is reported separately.
pub struct ReferenceResolver<'a, S, P: ?Sized> {
    people: &'a mut S,
    prompter: &'a mut P,
}

/// A name that matched nobody, with the field it was first seen in.
struct Missing {
    field: String,
    name: String,
}

impl<'a, S, P> ReferenceResolver<'a, S, P>
where
    S: RecordStore<Person>,
    P: Prompter + ?Sized,
{
    /// Creates a resolver that looks up and creates people in `people` and
    /// hands open decisions to `prompter`.
    pub fn new(people: &'a mut S, prompter: &'a mut P) -> Self {
        Self { people, prompter }
    }

    /// Resolves every name-reference field of `record`.
    pub fn resolve_record<R: Record>(&mut self, record: &R) -> Result<ResolutionReport> {
        self.resolve_fields(&record.name_references())
    }

    /// Resolves one comma-separated name list.
    pub fn resolve_text(&mut self, field: &str, text: &str) -> Result<ResolutionReport> {
        self.resolve_fields(&[(field, split_names(text))])
    }

    /// Resolves `(field, names)` pairs in order.
    ///
    /// # Errors
    ///
    /// Prompt failures and store failures while creating a person (such as
    /// `DuplicateId`) abort the pass.
    pub fn resolve_fields(&mut self, fields: &[(&str, Vec<String>)]) -> Result<ResolutionReport> {
        let mut report = ResolutionReport::default();
        let mut missing: Vec<Missing> = Vec::new();

        for (field, names) in fields {
            for name in names {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }

                let engine = SearchEngine::default().with_people(self.people.get_all());
                let matches = engine.find_people_by_name(name, false);
                let chosen = match matches.len() {
                    0 => None,
                    1 => Some(matches[0].id.clone()),
                    _ => choose_among(&mut *self.prompter, name, &matches)?,
                };

                match chosen {
                    Some(person_id) => {
                        debug!(field = *field, name, %person_id, "resolved reference");
                        report.resolved.push(ResolvedReference {
                            field: field.to_string(),
                            name: name.to_string(),
                            person_id,
                        });
                    }
                    None => {
                        debug!(field = *field, name, "reference left unresolved");
                        missing.push(Missing {
                            field: field.to_string(),
                            name: name.to_string(),
                        });
                    }
                }
            }
        }

        self.offer_creation(dedupe(missing), &mut report)?;
        Ok(report)
    }

    /// Offers to create a person for each missing name.
    fn offer_creation(&mut self, missing: Vec<Missing>, report: &mut ResolutionReport) -> Result<()> {
        for Missing { field, name } in missing {
            // Only people created earlier in this pass may link without asking.
            let engine = SearchEngine::default().with_people(self.people.get_all());
            let created_earlier = engine
                .find_people_by_name(&name, true)
                .into_iter()
                .find(|person| report.created.contains(&person.id));
            if let Some(person) = created_earlier {
                report.resolved.push(ResolvedReference {
                    field,
                    name,
                    person_id: person.id.clone(),
                });
                continue;
            }

            if !self.prompter.confirm_create(&name)? {
                report.unresolved.push(name);
                continue;
            }

            let Some(draft) = self.prompter.quick_add(PersonDraft::new(&name))? else {
                report.unresolved.push(name);
                continue;
            };

            if let Err(err) = draft.validate() {
                warn!(name = name.as_str(), error = %err, "quick-add draft rejected");
                report.unresolved.push(name);
                continue;
            }

            let person_id = self.people.next_id();
            self.people.add(draft.into_person(person_id.clone()))?;
            info!(name = name.as_str(), %person_id, "created person from reference");

            report.created.push(person_id.clone());
            report.resolved.push(ResolvedReference {
                field,
                name,
                person_id,
            });
        }
        Ok(())
    }
}

/// Asks the operator until they pick a valid number or cancel.
fn choose_among<P: Prompter + ?Sized>(
    prompter: &mut P,
    name: &str,
    matches: &[&Person],
) -> Result<Option<RecordId>> {
    let request = DisambiguationRequest::new(name, matches);
    loop {
        let Some(answer) = prompter.choose_match(&request)? else {
            return Ok(None);
        };
        match parse_choice(&answer, matches.len()) {
            Some(index) => return Ok(Some(matches[index].id.clone())),
            None => debug!(name, answer = answer.as_str(), "rejected selection"),
        }
    }
}

/// Turns a 1-based answer into an index, rejecting anything out of range.
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    let number: usize = answer.trim().parse().ok()?;
    if (1..=count).contains(&number) {
        Some(number - 1)
    } else {
        None
    }
}

/// Keeps the first spelling of each name, ignoring case.
fn dedupe(missing: Vec<Missing>) -> Vec<Missing> {
    let mut seen = HashSet::new();
    missing
        .into_iter()
        .filter(|entry| seen.insert(entry.name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_bounds() {
        assert_eq!(parse_choice("1", 2), Some(0));
        assert_eq!(parse_choice(" 2 ", 2), Some(1));
        assert_eq!(parse_choice("0", 2), None);
        assert_eq!(parse_choice("3", 2), None);
        assert_eq!(parse_choice("-1", 2), None);
        assert_eq!(parse_choice("two", 2), None);
    }

    #[test]
    fn test_dedupe_ignores_case() {
        let missing = vec![
            Missing {
                field: "parents".to_string(),
                name: "Carol".to_string(),
            },
            Missing {
                field: "children".to_string(),
                name: "carol".to_string(),
            },
        ];
        let kept = dedupe(missing);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].field, "parents");
    }
}
