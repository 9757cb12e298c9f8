use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::collections::HashMap;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Languages with a bundled message file
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "fr"];

const DEFAULT_LANGUAGE: &str = "en";

/// Arguments passed to Fluent as numbers so plural selectors can match them
const NUMERIC_ARGS: &[&str] = &["remaining", "limit", "max", "rating"];

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");
const FR_MESSAGES: &str = include_str!("../locales/fr/main.ftl");

/// Localization manager for user-facing status messages
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every bundled language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in [("en", EN_MESSAGES), ("fr", FR_MESSAGES)] {
            let locale: LanguageIdentifier = code.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(code.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: &LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid {} messages: {:?}", locale, errors))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate {} messages: {:?}", locale, errors))?;

        Ok(bundle)
    }

    /// Get a localized message, falling back to English for unknown languages
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = detect_language(Some(language));
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        else {
            return format!("Missing translation: {}", key);
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                let number = if NUMERIC_ARGS.contains(name) {
                    value.parse::<f64>().ok()
                } else {
                    None
                };
                let value = match number {
                    Some(number) => FluentValue::from(number),
                    None => FluentValue::from(value.to_string()),
                };
                fluent_args.set(name.to_string(), value);
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!("Errors formatting message '{}': {:?}", key, errors);
        }

        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, language: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }
}

/// Map a language tag to a supported language code
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let Some(code) = language_code else {
        return DEFAULT_LANGUAGE;
    };

    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    SUPPORTED_LANGUAGES
        .iter()
        .find(|supported| **supported == primary)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundles_load() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(manager.bundles.len(), SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn test_plural_selection() {
        let manager = LocalizationManager::new().unwrap();
        let one = manager.get_message_with_args("search-remaining", "en", &[("remaining", "1")]);
        let many = manager.get_message_with_args("search-remaining", "en", &[("remaining", "2")]);
        assert_eq!(one, "You have 1 free search left today.");
        assert_eq!(many, "You have 2 free searches left today.");
    }

    #[test]
    fn test_text_arguments_are_not_reformatted() {
        let manager = LocalizationManager::new().unwrap();
        let removed = manager.get_message_with_args("favorites-removed", "en", &[("id", "007")]);
        assert_eq!(removed, "Removed \"007\" from your favorites.");

        let saved = manager.get_message_with_args("favorites-saved", "en", &[("title", "1e3")]);
        assert_eq!(saved, "Saved \"1e3\" to your favorites.");
    }
}
