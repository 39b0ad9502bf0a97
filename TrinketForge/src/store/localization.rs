//! Localized string table
//!
//! The game reads display strings from an XML tree replicated per language:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root>
//!   <language id="english">
//!     <entry id="str_inventory_title_trinketstarweave_pendant"><![CDATA[Starweave Pendant]]></entry>
//!   </language>
//! </root>
//! ```
//!
//! Only `language` and `entry` elements are read back; anything else in the
//! file is dropped on rewrite.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event};

use crate::degrade::{Degradation, DegradationReason};
use crate::error::{Error, Result};

/// Languages a new string table is created with.
pub const LANGUAGES: [&str; 13] = [
    "english",
    "french",
    "german",
    "spanish",
    "brazilian",
    "russian",
    "polish",
    "czech",
    "italian",
    "schinese",
    "koreanb",
    "koreana",
    "japanese",
];

const ROOT: &str = "root";
const LANGUAGE: &[u8] = b"language";
const ENTRY: &[u8] = b"entry";

/// What a string is for. Decides what happens when its id already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Rarity display name. Existing text is kept.
    RarityName,
    /// Trinket title. Existing text is replaced.
    TrinketTitle,
}

impl EntryKind {
    /// Whether an existing entry gets the new text.
    #[must_use]
    pub fn overwrites(self, overwrite_rarity_names: bool) -> bool {
        match self {
            Self::RarityName => overwrite_rarity_names,
            Self::TrinketTitle => true,
        }
    }
}

/// What an upsert changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The id was added to at least one language.
    Inserted,
    /// The id existed and its text was replaced.
    Overwritten,
    /// Nothing changed.
    Unchanged,
}

/// One localized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedEntry {
    pub id: String,
    pub text: String,
}

/// Entries of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: String,
    pub entries: Vec<LocalizedEntry>,
}

impl Language {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }

    fn entry_mut(&mut self, id: &str) -> Option<&mut LocalizedEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

/// The whole string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTable {
    languages: Vec<Language>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::bootstrap()
    }
}

impl StringTable {
    /// A table with every supported language and no entries.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self {
            languages: LANGUAGES.iter().map(|id| Language::new(*id)).collect(),
        }
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Text of `id` in `language`.
    #[must_use]
    pub fn text(&self, language: &str, id: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|l| l.id == language)?
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.text.as_str())
    }

    /// Whether any language has `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.languages
            .iter()
            .any(|l| l.entries.iter().any(|e| e.id == id))
    }

    /// Add `id` to every language, or update it where it already exists and
    /// `overwrite` is set.
    pub fn upsert(&mut self, id: &str, text: &str, overwrite: bool) -> UpsertOutcome {
        let mut outcome = UpsertOutcome::Unchanged;
        for language in &mut self.languages {
            match language.entry_mut(id) {
                Some(entry) if overwrite && entry.text != text => {
                    entry.text = text.to_string();
                    if outcome == UpsertOutcome::Unchanged {
                        outcome = UpsertOutcome::Overwritten;
                    }
                }
                Some(_) => {}
                None => {
                    language.entries.push(LocalizedEntry {
                        id: id.to_string(),
                        text: text.to_string(),
                    });
                    outcome = UpsertOutcome::Inserted;
                }
            }
        }
        outcome
    }

    /// Parse a string table.
    ///
    /// # Errors
    /// Returns an error if the XML is malformed or has unclosed elements.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        // Keep whitespace inside entry text
        reader.trim_text(false);

        let mut languages: Vec<Language> = Vec::new();
        let mut current_entry: Option<LocalizedEntry> = None;
        let mut depth: usize = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    depth += 1;
                    match e.name().as_ref() {
                        LANGUAGE => languages.push(Language::new(id_attribute(&e)?)),
                        ENTRY => {
                            current_entry = Some(LocalizedEntry {
                                id: id_attribute(&e)?,
                                text: String::new(),
                            });
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => match e.name().as_ref() {
                    LANGUAGE => languages.push(Language::new(id_attribute(&e)?)),
                    ENTRY => {
                        if let Some(language) = languages.last_mut() {
                            language.entries.push(LocalizedEntry {
                                id: id_attribute(&e)?,
                                text: String::new(),
                            });
                        }
                    }
                    _ => {}
                },
                Event::Text(e) => {
                    if let Some(entry) = current_entry.as_mut() {
                        entry.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(entry) = current_entry.as_mut() {
                        entry.text.push_str(&String::from_utf8(e.into_inner().into_owned())?);
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if e.name().as_ref() == ENTRY
                        && let Some(entry) = current_entry.take()
                        && let Some(language) = languages.last_mut()
                    {
                        language.entries.push(entry);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if depth != 0 {
            return Err(Error::XmlError(quick_xml::Error::UnexpectedEof(format!(
                "{depth} unclosed element(s)"
            ))));
        }
        Ok(Self { languages })
    }

    /// Serialize with a UTF-8 prologue, 2-space indent and one line per
    /// entry, entry text wrapped in CDATA.
    ///
    /// # Errors
    /// Returns an error if XML serialization fails.
    pub fn to_xml(&self) -> Result<String> {
        let mut output = Vec::new();
        let mut writer = Writer::new_with_indent(&mut output, b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

        for language in &self.languages {
            let mut start = BytesStart::new("language");
            start.push_attribute(("id", language.id.as_str()));
            if language.entries.is_empty() {
                writer.write_event(Event::Empty(start))?;
                continue;
            }
            writer.write_event(Event::Start(start))?;
            for entry in &language.entries {
                let mut element = BytesStart::new("entry");
                element.push_attribute(("id", entry.id.as_str()));
                writer.write_event(Event::Start(element))?;
                for piece in cdata_pieces(&entry.text) {
                    writer.write_event(Event::CData(BytesCData::new(piece)))?;
                }
                writer.write_event(Event::End(BytesEnd::new("entry")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("language")))?;
        }

        writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

        let mut xml = String::from_utf8(output)?;
        xml.push('\n');
        Ok(xml)
    }

    /// Load a table from disk.
    ///
    /// A missing or empty file bootstraps a new table. A file that does not
    /// parse is replaced by a new table and reported as a degradation.
    ///
    /// # Errors
    /// Only I/O failures other than "not found" are errors.
    pub fn load(path: &Path) -> Result<(Self, Option<Degradation>)> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(Error::file_io(path, e)),
        };
        if content.trim().is_empty() {
            return Ok((Self::bootstrap(), None));
        }

        match Self::parse(&content) {
            Ok(table) if table.languages.is_empty() => {
                tracing::debug!("{} has no languages, bootstrapping", path.display());
                Ok((Self::bootstrap(), None))
            }
            Ok(table) => Ok((table, None)),
            Err(e) => {
                let degradation = Degradation::new(
                    "string table",
                    DegradationReason::CorruptStore {
                        path: path.to_path_buf(),
                        detail: e.to_string(),
                    },
                );
                degradation.log();
                Ok((Self::bootstrap(), Some(degradation)))
            }
        }
    }

    /// Write the table to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::file_io(parent, e))?;
        }
        fs::write(path, xml).map_err(|e| Error::file_io(path, e))
    }
}

fn id_attribute(element: &BytesStart<'_>) -> Result<String> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"id" {
            return Ok(attr.unescape_value()?.into_owned());
        }
    }
    Ok(String::new())
}

/// Split text so no piece contains the CDATA terminator.
fn cdata_pieces(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        pieces.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    pieces.push(rest);
    pieces
}

/// Outcome of a localization upsert on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationUpsert {
    pub outcome: UpsertOutcome,
    /// Set when the existing file was unreadable and started over.
    pub recovered: Option<Degradation>,
}

/// String table file plus the overwrite policy for rarity names.
#[derive(Debug, Clone)]
pub struct LocalizationStore {
    path: PathBuf,
    overwrite_rarity_names: bool,
}

impl LocalizationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overwrite_rarity_names: false,
        }
    }

    /// Let rarity names be overwritten like trinket titles.
    #[must_use]
    pub fn with_overwrite_rarity_names(mut self, overwrite: bool) -> Self {
        self.overwrite_rarity_names = overwrite;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current table.
    ///
    /// # Errors
    /// See [`StringTable::load`].
    pub fn table(&self) -> Result<StringTable> {
        StringTable::load(&self.path).map(|(table, _)| table)
    }

    /// Insert or update one string in every language and save.
    ///
    /// The file is only rewritten when something changed or it had to be
    /// recovered.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or written.
    pub fn upsert(&self, id: &str, text: &str, kind: EntryKind) -> Result<LocalizationUpsert> {
        let (mut table, recovered) = StringTable::load(&self.path)?;
        let outcome = table.upsert(id, text, kind.overwrites(self.overwrite_rarity_names));
        if outcome != UpsertOutcome::Unchanged || recovered.is_some() || !self.path.exists() {
            table.save(&self.path)?;
        }
        tracing::debug!("String '{}' {:?} in {}", id, outcome, self.path.display());
        Ok(LocalizationUpsert { outcome, recovered })
    }
}

/// Insert or update one localized string in the table at `path`.
///
/// # Errors
/// See [`LocalizationStore::upsert`].
pub fn upsert_localization_entry(
    path: &Path,
    id: &str,
    text: &str,
    kind: EntryKind,
) -> Result<UpsertOutcome> {
    LocalizationStore::new(path)
        .upsert(id, text, kind)
        .map(|r| r.outcome)
}
