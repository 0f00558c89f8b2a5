//! Line-oriented, section-aware parser for the model's free-text reply.
//!
//! The input is inherently unreliable, so parsing is total: any string,
//! including empty or binary garbage, produces a well-formed [`Recipe`].
//! Missing structure shows up as empty collections, sentinel values and
//! explanatory notes, never as an error.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::model::{
    GenerationRequest, Ingredient, Recipe, RecipeSource, DEFAULT_RECIPE_NAME,
};

/// Quantity sentinel for ingredient lines that resist decomposition.
const FALLBACK_QUANTITY: &str = "As needed";

/// Raw replies longer than this likely held content we failed to extract,
/// which is worth flagging in the notes.
const RECOVERY_NOTE_THRESHOLD: usize = 100;

/// Upper bound when deriving a recipe name from the description.
const MAX_DERIVED_NAME_CHARS: usize = 60;

lazy_static! {
    /// Decomposes an ingredient line into quantity / optional unit / name.
    /// The quantity is a leading number, fraction or range, or one of the
    /// qualitative phrases the prompt allows.
    static ref INGREDIENT_PATTERN: Regex =
        Regex::new(r"(?i)^(\d[\d\s./-]*|to taste|as needed)\s*(?:([a-zµ]+(?:\(s\))?)\s+)?(.+)$")
            .unwrap();

    /// Ordinal prefix that starts a new instruction step, e.g. "3. ".
    static ref STEP_ORDINAL_PATTERN: Regex = Regex::new(r"^\d+\.\s*").unwrap();

    /// First integer substring, used for servings extraction.
    static ref FIRST_INTEGER_PATTERN: Regex = Regex::new(r"\d+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Name,
    Description,
    PrepTime,
    CookTime,
    Servings,
    Cuisine,
    Ingredients,
    Instructions,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    /// Whole value sits on the marker line itself.
    SingleValue,
    /// Prose that may continue over following lines until a blank line.
    MultiLine,
    /// Bulleted or numbered list collected line by line.
    List,
}

impl Section {
    fn kind(self) -> SectionKind {
        match self {
            Section::Name
            | Section::PrepTime
            | Section::CookTime
            | Section::Servings
            | Section::Cuisine => SectionKind::SingleValue,
            Section::Description | Section::Notes => SectionKind::MultiLine,
            Section::Ingredients | Section::Instructions => SectionKind::List,
        }
    }
}

/// Ordered marker table, tested first to last with the first match winning.
/// This table is the section grammar shared with the system prompt in
/// `prompt.txt`; the two must be changed in lockstep.
const SECTION_MARKERS: &[(&str, Section)] = &[
    ("Recipe Name:", Section::Name),
    ("Description:", Section::Description),
    ("Prep Time:", Section::PrepTime),
    ("Cook Time:", Section::CookTime),
    ("Servings:", Section::Servings),
    ("Cuisine:", Section::Cuisine),
    ("Ingredients:", Section::Ingredients),
    ("Instructions:", Section::Instructions),
    ("Steps:", Section::Instructions),
    ("Notes:", Section::Notes),
];

/// Case-insensitive prefix match against the marker table, returning the
/// section and any trailing content on the same line.
fn match_marker(line: &str) -> Option<(Section, &str)> {
    for (marker, section) in SECTION_MARKERS {
        if let Some(prefix) = line.get(..marker.len()) {
            if prefix.eq_ignore_ascii_case(marker) {
                return Some((*section, &line[marker.len()..]));
            }
        }
    }
    None
}

/// Mutable accumulator for the scan, finalized into a [`Recipe`] once.
#[derive(Debug, Default)]
struct RecipeDraft {
    name: Option<String>,
    description: Option<String>,
    prep_time: Option<String>,
    cook_time: Option<String>,
    servings_text: Option<String>,
    cuisine: Option<String>,
    ingredients: Vec<Ingredient>,
    instructions: Vec<String>,
    notes: Option<String>,
}

impl RecipeDraft {
    fn set_single(&mut self, section: Section, value: &str) {
        if value.is_empty() {
            return;
        }
        let slot = match section {
            Section::Name => &mut self.name,
            Section::PrepTime => &mut self.prep_time,
            Section::CookTime => &mut self.cook_time,
            Section::Servings => &mut self.servings_text,
            Section::Cuisine => &mut self.cuisine,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn multi_slot(&mut self, section: Section) -> Option<&mut Option<String>> {
        match section {
            Section::Description => Some(&mut self.description),
            Section::Notes => Some(&mut self.notes),
            _ => None,
        }
    }

    fn seed_multi(&mut self, section: Section, value: &str) {
        if let Some(slot) = self.multi_slot(section) {
            *slot = Some(value.to_string());
        }
    }

    fn append_multi(&mut self, section: Section, line: &str) {
        if let Some(slot) = self.multi_slot(section) {
            match slot {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(line);
                }
                None => *slot = Some(line.to_string()),
            }
        }
    }
}

/// Convert a raw model reply plus the originating request into a [`Recipe`].
///
/// Single-pass, line-oriented state machine over the section markers, with
/// one post-processing step at the end. Never fails.
pub fn parse_model_output(raw: &str, request: &GenerationRequest) -> Recipe {
    let mut draft = RecipeDraft::default();
    let mut current: Option<Section> = None;
    // Open collection window for description/notes prose. A blank line
    // closes it so trailing text cannot leak into an unrelated field.
    let mut collecting = false;

    for raw_line in raw.lines() {
        let line = raw_line.trim();

        if let Some((section, rest)) = match_marker(line) {
            let rest = rest.trim();
            match section.kind() {
                SectionKind::SingleValue => {
                    draft.set_single(section, rest);
                    current = None;
                    collecting = false;
                }
                SectionKind::MultiLine => {
                    if !rest.is_empty() {
                        draft.seed_multi(section, rest);
                    }
                    current = Some(section);
                    collecting = true;
                }
                SectionKind::List => {
                    current = Some(section);
                    collecting = false;
                }
            }
            continue;
        }

        if line.is_empty() {
            collecting = false;
            continue;
        }

        match current {
            Some(Section::Ingredients) => {
                if let Some(stripped) =
                    line.strip_prefix('-').or_else(|| line.strip_prefix('*'))
                {
                    draft
                        .ingredients
                        .push(parse_ingredient_line(stripped.trim(), line));
                }
            }
            Some(Section::Instructions) => {
                if let Some(ordinal) = STEP_ORDINAL_PATTERN.find(line) {
                    draft
                        .instructions
                        .push(line[ordinal.end()..].trim().to_string());
                } else if let Some(last) = draft.instructions.last_mut() {
                    // Wrapped step text is recombined, not dropped
                    if !last.is_empty() {
                        last.push(' ');
                    }
                    last.push_str(line);
                } else {
                    debug!("dropping stray instruction line before any step: {line:?}");
                }
            }
            Some(section @ (Section::Description | Section::Notes)) if collecting => {
                draft.append_multi(section, line);
            }
            _ => {
                debug!("ignoring unstructured line: {line:?}");
            }
        }
    }

    finalize(draft, raw, request)
}

fn parse_ingredient_line(text: &str, full_line: &str) -> Ingredient {
    let (item_part, notes_part) = match text.split_once('|') {
        Some((item, notes)) => (item.trim(), notes.trim()),
        None => (text, ""),
    };
    let notes = if notes_part.is_empty() {
        None
    } else {
        Some(notes_part.to_string())
    };

    if let Some(caps) = INGREDIENT_PATTERN.captures(item_part) {
        let item = caps.get(3).map_or("", |m| m.as_str()).trim();
        if !item.is_empty() {
            let quantity = caps.get(1).map_or("", |m| m.as_str()).trim();
            return Ingredient {
                quantity: if quantity.is_empty() {
                    "1".to_string()
                } else {
                    quantity.to_string()
                },
                unit: caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|u| !u.is_empty()),
                item: item.to_string(),
                notes,
            };
        }
    }

    // The line resisted decomposition; keep it whole rather than drop it.
    // A bare bullet falls back to the raw line so `item` is never empty.
    let item = if item_part.is_empty() {
        full_line.trim()
    } else {
        item_part
    };
    Ingredient {
        quantity: FALLBACK_QUANTITY.to_string(),
        unit: None,
        item: item.to_string(),
        notes,
    }
}

fn finalize(draft: RecipeDraft, raw: &str, request: &GenerationRequest) -> Recipe {
    let RecipeDraft {
        name,
        description,
        prep_time,
        cook_time,
        servings_text,
        cuisine,
        ingredients,
        mut instructions,
        mut notes,
    } = draft;

    instructions.retain(|step| !step.is_empty());

    let servings = servings_text
        .as_deref()
        .and_then(|text| FIRST_INTEGER_PATTERN.find(text))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n > 0);

    let mut tags: Vec<String> = Vec::new();
    let tag_sources = cuisine
        .as_deref()
        .or(request.cuisine.as_deref())
        .into_iter()
        .chain(request.dietary_restrictions.iter().map(String::as_str))
        .chain(request.meal_type.as_deref());
    for candidate in tag_sources {
        let tag = candidate.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .or_else(|| description.as_deref().and_then(derive_name))
        .unwrap_or_else(|| DEFAULT_RECIPE_NAME.to_string());

    if instructions.is_empty() && raw.len() > RECOVERY_NOTE_THRESHOLD {
        append_note(
            &mut notes,
            "AI response might contain instructions, but they could not be parsed correctly. Please review raw output.",
        );
    }
    if ingredients.is_empty() && raw.len() > RECOVERY_NOTE_THRESHOLD {
        append_note(
            &mut notes,
            "AI response might contain ingredients, but they could not be parsed correctly. Please review raw output.",
        );
    }

    Recipe {
        id: None,
        name,
        description,
        prep_time,
        cook_time,
        servings,
        cuisine,
        ingredients,
        instructions,
        notes,
        tags,
        source: RecipeSource::Ai,
        ai_prompt: request.clone(),
    }
}

/// First sentence of the description, bounded in length.
fn derive_name(description: &str) -> Option<String> {
    let first = description.split(['.', '\n']).next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some(first.chars().take(MAX_DERIVED_NAME_CHARS).collect())
}

fn append_note(notes: &mut Option<String>, message: &str) {
    match notes {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(message);
        }
        None => *notes = Some(message.to_string()),
    }
}
