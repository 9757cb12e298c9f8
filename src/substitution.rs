//! # Substitution Resolver
//!
//! Swaps a known ingredient inside an ingredient line for a diet-friendly
//! alternative. Matching is case-insensitive and whole-word, and only the
//! first matching ingredient is replaced.
//!
//! ```rust
//! use copycat::substitution::{DietaryMode, SubstitutionTable};
//!
//! let table = SubstitutionTable::default();
//! assert_eq!(
//!     table.substitute("1 cup milk", DietaryMode::Vegan),
//!     "1 cup almond milk, soy milk, or oat milk"
//! );
//! assert_eq!(table.substitute("1 cup milk", DietaryMode::None), "1 cup milk");
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// The single active dietary transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DietaryMode {
    #[default]
    None,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl DietaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryMode::None => "none",
            DietaryMode::Vegan => "vegan",
            DietaryMode::GlutenFree => "glutenFree",
            DietaryMode::DairyFree => "dairyFree",
        }
    }
}

impl fmt::Display for DietaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "none" | "" => Ok(DietaryMode::None),
            "vegan" => Ok(DietaryMode::Vegan),
            "glutenfree" => Ok(DietaryMode::GlutenFree),
            "dairyfree" => Ok(DietaryMode::DairyFree),
            other => Err(format!("Unknown dietary mode: {}", other)),
        }
    }
}

/// Replacement phrases for one ingredient key
///
/// A diet without a phrase leaves the ingredient alone for that diet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubstitutionEntry {
    /// Lowercase canonical ingredient name
    pub key: String,
    pub vegan: Option<String>,
    pub gluten_free: Option<String>,
    pub dairy_free: Option<String>,
}

impl SubstitutionEntry {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.trim().to_lowercase(),
            ..Default::default()
        }
    }

    pub fn vegan(mut self, phrase: &str) -> Self {
        self.vegan = Some(phrase.to_string());
        self
    }

    pub fn gluten_free(mut self, phrase: &str) -> Self {
        self.gluten_free = Some(phrase.to_string());
        self
    }

    pub fn dairy_free(mut self, phrase: &str) -> Self {
        self.dairy_free = Some(phrase.to_string());
        self
    }

    /// Phrase used for `mode`, if any
    pub fn phrase_for(&self, mode: DietaryMode) -> Option<&str> {
        match mode {
            DietaryMode::None => None,
            DietaryMode::Vegan => self.vegan.as_deref(),
            DietaryMode::GlutenFree => self.gluten_free.as_deref(),
            DietaryMode::DairyFree => self.dairy_free.as_deref(),
        }
    }
}

/// Where a substitution key matched inside a line
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionMatch {
    /// The table key that matched
    pub key: String,
    /// Byte offset of the matched span
    pub start: usize,
    /// Byte offset just past the matched span
    pub end: usize,
    /// The phrase that replaces the span
    pub replacement: String,
}

struct CompiledEntry {
    entry: SubstitutionEntry,
    pattern: Regex,
}

/// Ordered set of substitution entries
///
/// Entries are tried in declaration order, except that a key is moved behind
/// every other key containing it as a whole word. This keeps "sour cream"
/// ahead of "cream" while "milk" stays ahead of a later "chicken broth".
pub struct SubstitutionTable {
    entries: Vec<CompiledEntry>,
}

/// Declaration order, with each key placed after the longer keys containing it
///
/// Repeatedly takes the earliest remaining entry whose containing keys are all
/// placed, which is a stable topological sort over the containment pairs.
fn priority_order(compiled: Vec<CompiledEntry>) -> Vec<CompiledEntry> {
    let containers: Vec<Vec<usize>> = compiled
        .iter()
        .map(|inner| {
            compiled
                .iter()
                .enumerate()
                .filter(|(_, outer)| {
                    !outer.entry.key.eq_ignore_ascii_case(&inner.entry.key)
                        && inner.pattern.is_match(&outer.entry.key)
                })
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut slots: Vec<Option<CompiledEntry>> = compiled.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());

    while ordered.len() < slots.len() {
        let ready = (0..slots.len()).find(|&i| {
            slots[i].is_some() && containers[i].iter().all(|&j| slots[j].is_none())
        });
        // Containment is strict, so a ready entry always exists; fall back to
        // the earliest remaining one regardless
        let next = ready.or_else(|| (0..slots.len()).find(|&i| slots[i].is_some()));
        let Some(index) = next else {
            break;
        };
        if let Some(entry) = slots[index].take() {
            ordered.push(entry);
        }
    }

    ordered
}

lazy_static! {
    static ref DEFAULT_TABLE: SubstitutionTable = SubstitutionTable::builtin();
}

impl SubstitutionTable {
    /// Build a table from custom entries
    pub fn new(entries: Vec<SubstitutionEntry>) -> Result<Self, regex::Error> {
        let compiled = entries
            .into_iter()
            .filter(|entry| !entry.key.is_empty())
            .map(|entry| {
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&entry.key)))?;
                Ok(CompiledEntry { entry, pattern })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let entries = priority_order(compiled);
        debug!("Built substitution table with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// The table used when no custom one is configured
    pub fn shared() -> &'static SubstitutionTable {
        &DEFAULT_TABLE
    }

    /// Keys in match-priority order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.entry.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first key matching `line` that has a phrase for `mode`
    pub fn find_match(&self, line: &str, mode: DietaryMode) -> Option<SubstitutionMatch> {
        if mode == DietaryMode::None {
            return None;
        }

        self.entries.iter().find_map(|compiled| {
            let phrase = compiled.entry.phrase_for(mode)?;
            let found = compiled.pattern.find(line)?;
            Some(SubstitutionMatch {
                key: compiled.entry.key.clone(),
                start: found.start(),
                end: found.end(),
                replacement: phrase.to_string(),
            })
        })
    }

    /// Replace the first matching ingredient in `line` for `mode`
    pub fn substitute(&self, line: &str, mode: DietaryMode) -> String {
        match self.find_match(line, mode) {
            Some(found) => {
                let mut result = String::with_capacity(line.len() + found.replacement.len());
                result.push_str(&line[..found.start]);
                result.push_str(&found.replacement);
                result.push_str(&line[found.end..]);
                trace!(
                    "Substituted '{}' ({}) in '{}' -> '{}'",
                    found.key,
                    mode,
                    line,
                    result
                );
                result
            }
            None => line.to_string(),
        }
    }

    fn builtin() -> Self {
        let entries = vec![
            SubstitutionEntry::new("milk")
                .vegan("almond milk, soy milk, or oat milk")
                .dairy_free("almond milk, soy milk, or oat milk"),
            SubstitutionEntry::new("buttermilk")
                .vegan("plant milk with 1 tbsp lemon juice")
                .dairy_free("plant milk with 1 tbsp lemon juice"),
            SubstitutionEntry::new("butter")
                .vegan("vegan butter or coconut oil")
                .dairy_free("dairy-free butter or coconut oil"),
            SubstitutionEntry::new("heavy cream")
                .vegan("full-fat coconut cream")
                .dairy_free("full-fat coconut cream"),
            SubstitutionEntry::new("sour cream")
                .vegan("cashew cream with lemon juice")
                .dairy_free("dairy-free sour cream"),
            SubstitutionEntry::new("cream cheese")
                .vegan("vegan cream cheese")
                .dairy_free("dairy-free cream cheese"),
            SubstitutionEntry::new("cream")
                .vegan("coconut cream")
                .dairy_free("coconut cream"),
            SubstitutionEntry::new("parmesan cheese")
                .vegan("nutritional yeast")
                .dairy_free("nutritional yeast"),
            SubstitutionEntry::new("cheese")
                .vegan("vegan cheese")
                .dairy_free("dairy-free cheese"),
            SubstitutionEntry::new("yogurt")
                .vegan("coconut yogurt")
                .dairy_free("coconut yogurt"),
            SubstitutionEntry::new("eggs")
                .vegan("flax eggs (1 tbsp ground flaxseed + 3 tbsp water each)"),
            SubstitutionEntry::new("egg")
                .vegan("flax egg (1 tbsp ground flaxseed + 3 tbsp water)"),
            SubstitutionEntry::new("honey").vegan("maple syrup or agave nectar"),
            SubstitutionEntry::new("chicken broth")
                .vegan("vegetable broth")
                .gluten_free("gluten-free chicken broth"),
            SubstitutionEntry::new("beef broth")
                .vegan("mushroom broth")
                .gluten_free("gluten-free beef broth"),
            SubstitutionEntry::new("all-purpose flour")
                .gluten_free("gluten-free all-purpose flour blend"),
            SubstitutionEntry::new("flour").gluten_free("gluten-free flour blend"),
            SubstitutionEntry::new("breadcrumbs").gluten_free("gluten-free breadcrumbs"),
            SubstitutionEntry::new("bread crumbs").gluten_free("gluten-free bread crumbs"),
            SubstitutionEntry::new("soy sauce").gluten_free("tamari or coconut aminos"),
            SubstitutionEntry::new("pasta").gluten_free("gluten-free pasta"),
            SubstitutionEntry::new("noodles").gluten_free("rice noodles"),
            SubstitutionEntry::new("tortillas").gluten_free("corn tortillas"),
        ];

        // Keys are escaped literals, so compilation cannot fail
        Self::new(entries).expect("Built-in substitution keys should compile")
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Replace the first known ingredient in `line` using the built-in table
pub fn substitute(line: &str, mode: DietaryMode) -> String {
    SubstitutionTable::shared().substitute(line, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vegan_milk() {
        assert_eq!(
            substitute("1 cup milk", DietaryMode::Vegan),
            "1 cup almond milk, soy milk, or oat milk"
        );
    }

    #[test]
    fn test_mode_none_is_identity() {
        assert_eq!(substitute("1 cup milk", DietaryMode::None), "1 cup milk");
    }

    #[test]
    fn test_word_boundary() {
        // "buttermilk" has its own key, "milk" must not match inside it
        assert_eq!(
            substitute("1 cup buttermilk", DietaryMode::Vegan),
            "1 cup plant milk with 1 tbsp lemon juice"
        );
        assert_eq!(
            substitute("2 tbsp peanut butterscotch chips", DietaryMode::Vegan),
            "2 tbsp peanut butterscotch chips"
        );
    }

    #[test]
    fn test_case_insensitive_match_replaces_span_only() {
        assert_eq!(
            substitute("2 Tbsp BUTTER, softened", DietaryMode::DairyFree),
            "2 Tbsp dairy-free butter or coconut oil, softened"
        );
    }

    #[test]
    fn test_multi_word_key_wins() {
        assert_eq!(
            substitute("1/2 cup sour cream", DietaryMode::DairyFree),
            "1/2 cup dairy-free sour cream"
        );
        assert_eq!(
            substitute("4 oz cream cheese", DietaryMode::Vegan),
            "4 oz vegan cream cheese"
        );
    }

    #[test]
    fn test_only_first_match_replaced() {
        assert_eq!(
            substitute("1 cup milk and 1 cup cream", DietaryMode::Vegan),
            "1 cup almond milk, soy milk, or oat milk and 1 cup cream"
        );
    }

    #[test]
    fn test_key_without_phrase_is_skipped() {
        // milk has no gluten-free phrase, so flour is the first usable match
        assert_eq!(
            substitute("1 cup milk mixed with 2 cups flour", DietaryMode::GlutenFree),
            "1 cup milk mixed with 2 cups gluten-free flour blend"
        );
    }

    #[test]
    fn test_priority_order() {
        let table = SubstitutionTable::new(vec![
            SubstitutionEntry::new("cream").vegan("A"),
            SubstitutionEntry::new("sour cream").vegan("B"),
            SubstitutionEntry::new("milk").vegan("C"),
        ])
        .unwrap();

        assert_eq!(table.keys(), vec!["sour cream", "cream", "milk"]);
        assert_eq!(table.substitute("sour cream", DietaryMode::Vegan), "B");
    }

    #[test]
    fn test_declaration_order_for_unrelated_keys() {
        let table = SubstitutionTable::new(vec![
            SubstitutionEntry::new("milk").vegan("A"),
            SubstitutionEntry::new("chicken broth").vegan("B"),
        ])
        .unwrap();

        assert_eq!(table.keys(), vec!["milk", "chicken broth"]);
        assert_eq!(
            table.substitute("1 cup milk and 2 cups chicken broth", DietaryMode::Vegan),
            "1 cup A and 2 cups chicken broth"
        );
    }

    #[test]
    fn test_contained_key_moves_only_behind_its_container() {
        let table = SubstitutionTable::new(vec![
            SubstitutionEntry::new("cheese").vegan("A"),
            SubstitutionEntry::new("milk").vegan("B"),
            SubstitutionEntry::new("cream cheese").vegan("C"),
            SubstitutionEntry::new("honey").vegan("D"),
        ])
        .unwrap();

        assert_eq!(table.keys(), vec!["milk", "cream cheese", "cheese", "honey"]);
        assert_eq!(
            table.substitute("4 oz cream cheese and 1 cup milk", DietaryMode::Vegan),
            "4 oz cream cheese and 1 cup B"
        );
    }

    #[test]
    fn test_builtin_table_prefers_earlier_key() {
        assert_eq!(
            substitute("1 cup milk and 2 cups chicken broth", DietaryMode::Vegan),
            "1 cup almond milk, soy milk, or oat milk and 2 cups chicken broth"
        );
        let keys = SubstitutionTable::shared().keys();
        let position = |key: &str| keys.iter().position(|k| *k == key).unwrap();
        assert!(position("sour cream") < position("cream"));
        assert!(position("all-purpose flour") < position("flour"));
        assert!(position("milk") < position("chicken broth"));
    }

    #[test]
    fn test_find_match_span() {
        let found = SubstitutionTable::shared()
            .find_match("3 large eggs", DietaryMode::Vegan)
            .unwrap();
        assert_eq!(found.key, "eggs");
        assert_eq!((found.start, found.end), (8, 12));
    }

    #[test]
    fn test_dietary_mode_parsing() {
        assert_eq!("vegan".parse::<DietaryMode>(), Ok(DietaryMode::Vegan));
        assert_eq!("glutenFree".parse::<DietaryMode>(), Ok(DietaryMode::GlutenFree));
        assert_eq!("dairy-free".parse::<DietaryMode>(), Ok(DietaryMode::DairyFree));
        assert_eq!("none".parse::<DietaryMode>(), Ok(DietaryMode::None));
        assert!("paleo".parse::<DietaryMode>().is_err());
        assert_eq!(DietaryMode::GlutenFree.to_string(), "glutenFree");
    }
}
