use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use family_kiosk::config::DEFAULT_DATA_DIR;
use family_kiosk::display::*;
use family_kiosk::errors::{KioskError, Result};
use family_kiosk::kiosk::Kiosk;
use family_kiosk::resolution::{NonInteractivePrompter, Prompter, TerminalPrompter};
use family_kiosk::search::PhotoField;
use family_kiosk::types::*;

/// Browse and curate a family archive stored as JSON files.
#[derive(Parser)]
#[command(name = "family-kiosk", about = "Browse and curate a family archive")]
struct Cli {
    /// Directory holding the collection files
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Never prompt; ambiguous or unknown names stay unresolved
    #[arg(long, global = true)]
    no_prompt: bool,
    /// Output query results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, config and empty collection files
    Init,
    /// Show record counts
    Status,
    /// Find people by name or nickname
    People {
        query: String,
        /// Match the whole name instead of a substring
        #[arg(short, long)]
        exact: bool,
    },
    /// Find pets by name
    Pets {
        query: String,
        #[arg(short, long)]
        exact: bool,
    },
    /// Find quizzes by question or answer text
    Quizzes {
        query: String,
        #[arg(short, long)]
        exact: bool,
    },
    /// Find photos by a field (file, tags, date, desc or any other key)
    Photos {
        value: String,
        /// Field to search
        #[arg(short, long, default_value = "tags")]
        by: String,
        /// Force whole-value matching
        #[arg(short, long, conflicts_with = "partial")]
        exact: bool,
        /// Force substring matching
        #[arg(short, long)]
        partial: bool,
    },
    /// List photos dated within an inclusive range
    PhotosBetween { start: String, end: String },
    /// List stories dated within an inclusive range
    StoriesBetween { start: String, end: String },
    /// Print one record as JSON
    Show { collection: String, id: String },
    /// Add a person and resolve the people they reference
    AddPerson(PersonArgs),
    /// Add a pet and resolve its owners
    AddPet(PetArgs),
    /// Add a story and resolve who it is about
    AddStory(StoryArgs),
    /// Add a photo and resolve its tags
    AddPhoto(PhotoArgs),
    /// Add a quiz question
    AddQuiz(QuizArgs),
    /// Merge a JSON object into a record
    Update {
        collection: String,
        id: String,
        /// JSON object with the fields to change
        patch: String,
    },
    /// Delete a record
    Delete { collection: String, id: String },
}

#[derive(Args)]
struct PersonArgs {
    /// Record id (default: next free number)
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    nickname: String,
    #[arg(long, default_value = "")]
    birth_date: String,
    #[arg(long, default_value = "")]
    death_date: String,
    #[arg(long, default_value = "")]
    gender: String,
    /// Previous names, comma separated
    #[arg(long, default_value = "")]
    prev_names: String,
    #[arg(long)]
    deceased: bool,
    /// Parents, comma separated
    #[arg(long, default_value = "")]
    parents: String,
    #[arg(long, default_value = "")]
    spouses: String,
    #[arg(long, default_value = "")]
    children: String,
    #[arg(long, default_value = "")]
    ex_spouses: String,
    /// Adopted children and stepchildren, comma separated
    #[arg(long, default_value = "")]
    nonbio_children: String,
    /// Story titles, comma separated
    #[arg(long, default_value = "")]
    stories: String,
    #[arg(long, default_value = "")]
    photo_tags: String,
}

#[derive(Args)]
struct PetArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    species: String,
    #[arg(long, default_value = "")]
    breed: String,
    /// Owners, comma separated
    #[arg(long, default_value = "")]
    owners: String,
    #[arg(long, default_value = "")]
    birth_date: String,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args)]
struct StoryArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    title: String,
    /// People the story is about, comma separated
    #[arg(long, default_value = "")]
    about: String,
    #[arg(long, default_value = "")]
    text: String,
    #[arg(long, default_value = "")]
    date: String,
}

#[derive(Args)]
struct PhotoArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    file: String,
    #[arg(long)]
    date: Option<String>,
    /// People in the photo, comma separated
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    desc: Option<String>,
}

#[derive(Args)]
struct QuizArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    question: String,
    #[arg(long)]
    answer: String,
    #[arg(long, default_value = "")]
    alt_answer: String,
    #[arg(long, default_value = "")]
    about: String,
    /// Mark as a joke question
    #[arg(long)]
    joke: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "family_kiosk=warn",
        1 => "family_kiosk=info",
        _ => "family_kiosk=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir;
    let json = cli.json;
    let mut prompter: Box<dyn Prompter> = if cli.no_prompt {
        Box::new(NonInteractivePrompter)
    } else {
        Box::new(TerminalPrompter)
    };

    match cli.command {
        Commands::Init => {
            let kiosk = Kiosk::init(&data_dir)?;
            println!("Initialized archive at {}", kiosk.data_dir().display());
        }
        Commands::Status => {
            let kiosk = Kiosk::open(&data_dir)?;
            let stats = kiosk.stats();
            if json {
                println!("{}", format_as_json(&stats));
            } else {
                println!("Family Kiosk Status ({})", data_dir.display());
                println!("  People:  {}", stats.people);
                println!("  Pets:    {}", stats.pets);
                println!("  Stories: {}", stats.stories);
                println!("  Photos:  {}", stats.photos);
                println!("  Quizzes: {}", stats.quizzes);
            }
        }
        Commands::People { query, exact } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let results = kiosk.search().find_people_by_name(&query, exact);
            print_results(&query, json, &results, format_people);
        }
        Commands::Pets { query, exact } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let results = kiosk.search().find_pets_by_name(&query, exact);
            print_results(&query, json, &results, format_pets);
        }
        Commands::Quizzes { query, exact } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let results = kiosk.search().find_quizzes_by_text(&query, exact);
            print_results(&query, json, &results, format_quizzes);
        }
        Commands::Photos {
            value,
            by,
            exact,
            partial,
        } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let exact = if exact {
                true
            } else if partial {
                false
            } else {
                PhotoField::from_str(&by).is_some_and(|field| field.default_exact())
            };
            let results = kiosk.search().get_photo_by(&by, Some(&value), exact);
            print_results(&value, json, &results, format_photos);
        }
        Commands::PhotosBetween { start, end } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let results = kiosk.search().get_photos_by_date_range(&start, &end)?;
            print_results(&format!("{start}..{end}"), json, &results, format_photos);
        }
        Commands::StoriesBetween { start, end } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let results = kiosk.search().get_stories_by_date_range(&start, &end)?;
            print_results(&format!("{start}..{end}"), json, &results, format_stories);
        }
        Commands::Show { collection, id } => {
            let kiosk = Kiosk::open(&data_dir)?;
            let collection = parse_collection(&collection)?;
            let id = RecordId::parse(&id);
            match kiosk.get_json(collection, &id)? {
                Some(record) => println!("{}", format_as_json(&record)),
                None => {
                    return Err(KioskError::NotFound {
                        collection: collection.as_str().to_string(),
                        id: id.to_string(),
                    })
                }
            }
        }
        Commands::AddPerson(args) => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let id = record_id(args.id.as_deref(), &kiosk, Collection::People);
            let person = Person {
                nickname: args.nickname,
                birth_date: args.birth_date,
                death_date: args.death_date,
                gender: args.gender,
                prev_names: args.prev_names,
                deceased: args.deceased,
                parents: args.parents,
                spouses: args.spouses,
                children: args.children,
                ex_spouses: args.ex_spouses,
                nonbio_children: args.nonbio_children,
                stories: args.stories,
                photo_tags: args.photo_tags,
                ..Person::new(id.clone(), args.name)
            };
            let report = kiosk.add_person(person, prompter.as_mut())?;
            println!("Added person #{}", id);
            print!("{}", format_report(&report));
        }
        Commands::AddPet(args) => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let id = record_id(args.id.as_deref(), &kiosk, Collection::Pets);
            let pet = Pet {
                species: args.species,
                breed: args.breed,
                owners: args.owners,
                birth_date: args.birth_date,
                notes: args.notes,
                ..Pet::new(id.clone(), args.name)
            };
            let report = kiosk.add_pet(pet, prompter.as_mut())?;
            println!("Added pet #{}", id);
            print!("{}", format_report(&report));
        }
        Commands::AddStory(args) => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let id = record_id(args.id.as_deref(), &kiosk, Collection::Stories);
            let story = Story {
                about: args.about,
                text: args.text,
                date: args.date,
                ..Story::new(id.clone(), args.title)
            };
            let report = kiosk.add_story(story, prompter.as_mut())?;
            println!("Added story #{}", id);
            print!("{}", format_report(&report));
        }
        Commands::AddPhoto(args) => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let id = record_id(args.id.as_deref(), &kiosk, Collection::Photos);
            let photo = Photo {
                date: args.date,
                tags: args.tags.as_deref().map(split_names),
                desc: args.desc,
                ..Photo::new(id.clone(), args.file)
            };
            let report = kiosk.add_photo(photo, prompter.as_mut())?;
            println!("Added photo #{}", id);
            print!("{}", format_report(&report));
        }
        Commands::AddQuiz(args) => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let id = record_id(args.id.as_deref(), &kiosk, Collection::Quizzes);
            let quiz = Quiz {
                alt_answer: args.alt_answer,
                about: args.about,
                joke: args.joke,
                ..Quiz::new(id.clone(), args.question, args.answer)
            };
            kiosk.add_quiz(quiz)?;
            println!("Added quiz #{}", id);
        }
        Commands::Update {
            collection,
            id,
            patch,
        } => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let collection = parse_collection(&collection)?;
            let partial: Map<String, Value> =
                serde_json::from_str(&patch).map_err(|e| KioskError::Validation {
                    message: format!("update must be a JSON object: {e}"),
                })?;
            let id = RecordId::parse(&id);
            kiosk.update(collection, &id, &partial)?;
            println!("Updated {} #{}", collection, id);
        }
        Commands::Delete { collection, id } => {
            let mut kiosk = Kiosk::open(&data_dir)?;
            let collection = parse_collection(&collection)?;
            let id = RecordId::parse(&id);
            kiosk.delete(collection, &id)?;
            println!("Deleted {} #{}", collection, id);
        }
    }
    Ok(())
}

/// Prints query results as text or JSON.
fn print_results<T: serde::Serialize>(
    query: &str,
    json: bool,
    results: &[&T],
    format: fn(&[&T]) -> String,
) {
    if json {
        println!("{}", format_as_json(results));
    } else if results.is_empty() {
        println!("No results found for '{}'", query);
    } else {
        println!("{}", format(results));
    }
}

fn parse_collection(name: &str) -> Result<Collection> {
    Collection::from_str(name).ok_or_else(|| KioskError::Validation {
        message: format!(
            "unknown collection '{}'; expected people, pets, stories, photos or quizzes",
            name
        ),
    })
}

/// Uses the given id, or the next free number in the collection.
fn record_id(id: Option<&str>, kiosk: &Kiosk, collection: Collection) -> RecordId {
    match id {
        Some(id) => RecordId::parse(id),
        None => kiosk.next_id(collection),
    }
}
