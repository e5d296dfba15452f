//! Relays display-name translations into the host text table.

use bevy::prelude::*;
use cm_host::{EnglishText, TextTable};

use crate::definition::CreatureDefinition;

/// Language whose text is used when the selected language has none.
pub const FALLBACK_LANGUAGE: &str = "English";

/// Forward one translation to the host.
///
/// Written when `language` is the selected one, or when it is the fallback
/// language and the key has no text yet. Returns whether anything was written.
pub fn relay(table: &mut TextTable, key: &str, language: &str, text: &str) -> bool {
    if table.selected_language == language
        || (language == FALLBACK_LANGUAGE && !table.contains(key))
    {
        table.add_word(key, text);
        return true;
    }
    false
}

/// Builder collecting the translations of one key.
pub struct LocalizeKey<'a> {
    table: &'a mut TextTable,
    english: &'a mut EnglishText,
    key: String,
}

macro_rules! language_methods {
    ($($method:ident => $language:literal),* $(,)?) => {
        $(
            pub fn $method(self, text: &str) -> Self {
                self.add($language, text)
            }
        )*
    };
}

impl<'a> LocalizeKey<'a> {
    /// `key` may carry the `$` marker used by character names.
    pub fn new(table: &'a mut TextTable, english: &'a mut EnglishText, key: &str) -> Self {
        Self {
            table,
            english,
            key: key.replace('$', ""),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn add(mut self, language: &str, text: &str) -> Self {
        if language == FALLBACK_LANGUAGE {
            self.english.words.insert(self.key.clone(), text.to_string());
        }
        relay(&mut *self.table, &self.key, language, text);
        self
    }

    language_methods!(
        english => "English",
        swedish => "Swedish",
        french => "French",
        italian => "Italian",
        german => "German",
        spanish => "Spanish",
        russian => "Russian",
        romanian => "Romanian",
        bulgarian => "Bulgarian",
        macedonian => "Macedonian",
        finnish => "Finnish",
        danish => "Danish",
        norwegian => "Norwegian",
        icelandic => "Icelandic",
        turkish => "Turkish",
        lithuanian => "Lithuanian",
        czech => "Czech",
        hungarian => "Hungarian",
        slovak => "Slovak",
        polish => "Polish",
        dutch => "Dutch",
        portuguese_european => "Portuguese_European",
        portuguese_brazilian => "Portuguese_Brazilian",
        chinese => "Chinese",
        japanese => "Japanese",
        korean => "Korean",
        hindi => "Hindi",
        thai => "Thai",
        abenaki => "Abenaki",
        croatian => "Croatian",
        georgian => "Georgian",
        greek => "Greek",
        serbian => "Serbian",
        ukrainian => "Ukrainian",
    );
}

impl CreatureDefinition {
    /// Translations for this creature's display name.
    pub fn localize<'a>(&self, table: &'a mut TextTable, english: &'a mut EnglishText) -> LocalizeKey<'a> {
        LocalizeKey::new(table, english, &self.name_key)
    }
}

/// Run `f` with a builder bound to the world's text tables.
pub fn localize_with(world: &mut World, key: &str, f: impl FnOnce(LocalizeKey<'_>)) {
    world.get_resource_or_insert_with(TextTable::default);
    world.resource_scope(|world, mut table: Mut<TextTable>| {
        let mut english = world.get_resource_or_insert_with(EnglishText::default);
        f(LocalizeKey::new(&mut table, &mut english, key));
    });
}
