//! The interactive menu loop.
//!
//! Every prompt reads one line. End of input at any prompt ends the shell
//! normally; a command that was only partly entered is dropped.

use std::io::{self, BufRead, Write};

use concept_breakdown_core::{
    CategoryCommand, CategoryId, CategoryKey, Command, ComponentCommand, ComponentKey,
    ComponentTarget, ConceptCommand, ConceptId, EntityKind, NewConcept, Persistence, Session,
};

use crate::render::{render_listing, render_tables};

const MENU: &str = "\
##Choose an action:
1: Add Concept/Component/Category
2: Update Concept/Component/Category
3: Remove Concept/Component/Category
4: Print Database
5: Recommend a Diagram
6: Display Concepts as Table
7: Exit
";

const HELP: &str = "\
Enter a menu number or one of the words:
  add, update, remove, print, recommend, table, help, exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Update,
    Remove,
    Print,
    Recommend,
    Table,
    Help,
    Exit,
}

impl Action {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "add" => Some(Action::Add),
            "2" | "update" => Some(Action::Update),
            "3" | "remove" => Some(Action::Remove),
            "4" | "print" => Some(Action::Print),
            "5" | "recommend" => Some(Action::Recommend),
            "6" | "table" => Some(Action::Table),
            "7" | "exit" | "quit" => Some(Action::Exit),
            "help" | "?" => Some(Action::Help),
            _ => None,
        }
    }
}

/// Drives a loaded [`Session`] from line-oriented input.
pub struct Shell<'a, P, R, W> {
    session: &'a mut Session<P>,
    input: R,
    out: W,
}

impl<'a, P: Persistence, R: BufRead, W: Write> Shell<'a, P, R, W> {
    pub fn new(session: &'a mut Session<P>, input: R, out: W) -> Self {
        Self {
            session,
            input,
            out,
        }
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "\n{MENU}\n##Enter option number: ")?;
            self.out.flush()?;
            let line = match self.read_line() {
                Ok(line) => line,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(err) => return Err(err),
            };
            if line.is_empty() {
                continue;
            }
            let Some(action) = Action::parse(&line) else {
                writeln!(self.out, "Unknown command. Please try again.")?;
                continue;
            };
            if action == Action::Exit {
                writeln!(self.out, "Exiting program.")?;
                return Ok(());
            }
            match self.dispatch(action) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    fn dispatch(&mut self, action: Action) -> io::Result<()> {
        match action {
            Action::Add => self.add(),
            Action::Update => self.update(),
            Action::Remove => self.remove(),
            Action::Print => {
                let listing = self.session.store().map(render_listing);
                self.write_view(listing)
            }
            Action::Table => {
                let tables = self.session.store().map(render_tables);
                self.write_view(tables)
            }
            Action::Recommend => match self.session.recommend_diagram() {
                Some(name) => writeln!(self.out, "Recommended Diagram for Visualization: {name}"),
                None => writeln!(self.out, "No diagram types are configured."),
            },
            Action::Help => write!(self.out, "{HELP}"),
            Action::Exit => Ok(()),
        }
    }

    fn add(&mut self) -> io::Result<()> {
        let Some(kind) =
            self.prompt_kind("What would you like to add? (Concept/Component/Category): ")?
        else {
            return Ok(());
        };
        let command: Command = match kind {
            EntityKind::Concept => {
                let id = self.prompt_id("Enter Concept ID: ")?;
                let topic = self.prompt("Enter Concept Topic: ")?;
                let category = self.prompt("Enter Concept Category: ")?;
                let details = self.prompt("Enter Concept Details: ")?;
                if !self.has_category_topic(&category) {
                    return writeln!(
                        self.out,
                        "Category does not exist. Please create the category first."
                    );
                }
                ConceptCommand::Add(
                    NewConcept::new(topic, CategoryKey::topic(category), details).with_id(id),
                )
                .into()
            }
            EntityKind::Component => {
                let concept =
                    self.prompt_optional_id("Enter Concept ID (blank for the latest concept): ")?;
                let target = match concept {
                    Some(id) if !self.has_concept(ConceptId(id)) => {
                        return writeln!(
                            self.out,
                            "Concept does not exist. Please create the concept first."
                        );
                    }
                    Some(id) => ComponentTarget::Concept(ConceptId(id)),
                    None => ComponentTarget::LastConcept,
                };
                let topic = self.prompt("Enter Component Topic: ")?;
                let details = self.prompt("Enter Component Details: ")?;
                ComponentCommand::Add {
                    target,
                    topic,
                    details,
                }
                .into()
            }
            EntityKind::Category => {
                let id = self.prompt_id("Enter Category ID: ")?;
                let topic = self.prompt("Enter Category Topic: ")?;
                CategoryCommand::Add {
                    id: CategoryId(id),
                    topic,
                }
                .into()
            }
        };
        self.submit(command)
    }

    fn update(&mut self) -> io::Result<()> {
        let Some(kind) =
            self.prompt_kind("What would you like to update? (Concept/Component/Category): ")?
        else {
            return Ok(());
        };
        let command: Command = match kind {
            EntityKind::Concept => {
                let id = ConceptId(self.prompt_id("Enter Concept ID for update: ")?);
                if !self.has_concept(id) {
                    return writeln!(self.out, "Concept with ID {id} not found.");
                }
                let topic = self.prompt("Enter new Topic: ")?;
                let details = self.prompt("Enter new Details: ")?;
                ConceptCommand::Update { id, topic, details }.into()
            }
            EntityKind::Component => {
                let concept = ConceptId(self.prompt_id("Enter Concept ID of the component: ")?);
                if !self.has_concept(concept) {
                    return writeln!(self.out, "Concept with ID {concept} not found.");
                }
                let old_topic = self.prompt("Enter old Component Topic for update: ")?;
                let topic = self.prompt("Enter new Topic: ")?;
                let details = self.prompt("Enter new Details: ")?;
                ComponentCommand::Update {
                    key: ComponentKey::topic_in(concept, old_topic),
                    topic,
                    details,
                }
                .into()
            }
            EntityKind::Category => {
                let id = CategoryId(self.prompt_id("Enter Category ID for update: ")?);
                let topic = self.prompt("Enter new Topic: ")?;
                CategoryCommand::Update { id, topic }.into()
            }
        };
        self.submit(command)
    }

    fn remove(&mut self) -> io::Result<()> {
        let Some(kind) =
            self.prompt_kind("What would you like to remove? (Concept/Component/Category): ")?
        else {
            return Ok(());
        };
        let command: Command = match kind {
            EntityKind::Concept => ConceptCommand::Delete {
                id: ConceptId(self.prompt_id("Enter Concept ID to remove: ")?),
            }
            .into(),
            EntityKind::Component => ComponentCommand::Delete {
                key: ComponentKey::topic(self.prompt("Enter Component Topic to remove: ")?),
            }
            .into(),
            EntityKind::Category => CategoryCommand::Delete {
                id: CategoryId(self.prompt_id("Enter Category ID to remove: ")?),
            }
            .into(),
        };
        self.submit(command)
    }

    fn submit(&mut self, command: Command) -> io::Result<()> {
        match self.session.apply(command) {
            Ok(change) => {
                writeln!(self.out, "{change}")?;
                writeln!(self.out, "Data saved successfully.")
            }
            Err(err) => writeln!(self.out, "Error: {err}"),
        }
    }

    fn write_view(&mut self, view: Option<String>) -> io::Result<()> {
        match view {
            Some(view) => write!(self.out, "{view}"),
            None => writeln!(self.out, "No data loaded."),
        }
    }

    fn has_category_topic(&self, topic: &str) -> bool {
        self.session
            .store()
            .is_some_and(|store| store.find_category_by_topic(topic).is_some())
    }

    fn has_concept(&self, id: ConceptId) -> bool {
        self.session
            .store()
            .is_some_and(|store| store.find_concept(id).is_some())
    }

    /// Reads one trimmed line. End of input is `UnexpectedEof`.
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        writeln!(self.out, "{label}")?;
        self.out.flush()?;
        self.read_line()
    }

    /// Prompts until a positive integer is entered.
    fn prompt_id(&mut self, label: &str) -> io::Result<i64> {
        loop {
            let line = self.prompt(label)?;
            match parse_id(&line) {
                Some(id) => return Ok(id),
                None => writeln!(self.out, "That's not a number. Please enter a number.")?,
            }
        }
    }

    /// Like [`prompt_id`](Self::prompt_id), but a blank line yields `None`.
    fn prompt_optional_id(&mut self, label: &str) -> io::Result<Option<i64>> {
        loop {
            let line = self.prompt(label)?;
            if line.is_empty() {
                return Ok(None);
            }
            match parse_id(&line) {
                Some(id) => return Ok(Some(id)),
                None => writeln!(self.out, "That's not a number. Please enter a number.")?,
            }
        }
    }

    fn prompt_kind(&mut self, label: &str) -> io::Result<Option<EntityKind>> {
        let line = self.prompt(label)?;
        match line.parse::<EntityKind>() {
            Ok(kind) => Ok(Some(kind)),
            Err(_) => {
                writeln!(self.out, "Invalid type.")?;
                Ok(None)
            }
        }
    }
}

fn parse_id(input: &str) -> Option<i64> {
    input.parse::<i64>().ok().filter(|id| *id > 0)
}
