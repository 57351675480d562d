//! Operator-facing prompts and messages, per language.
//!
//! The language tag from the config picks the [`Locale`]; the same tag is
//! passed unchanged to the speech synthesizer.

use std::path::Path;

use crate::tts::CacheOutcome;

use super::controller::BrowseError;

/// Prompt language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Spanish,
}

impl Locale {
    /// Pick the locale for a language tag: `es`, `es-MX`, `es_AR` … select
    /// Spanish, everything else English.
    ///
    /// ```
    /// use article_narrator::pipeline::Locale;
    ///
    /// assert_eq!(Locale::for_tag("es"), Locale::Spanish);
    /// assert_eq!(Locale::for_tag("es-MX"), Locale::Spanish);
    /// assert_eq!(Locale::for_tag("en"), Locale::English);
    /// assert_eq!(Locale::for_tag("fr"), Locale::English);
    /// ```
    pub fn for_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "es" => Locale::Spanish,
            _ => Locale::English,
        }
    }

    /// Tokens accepted as "yes".
    pub fn affirmative_tokens(&self) -> &'static [&'static str] {
        match self {
            Locale::English => &["yes", "y"],
            Locale::Spanish => &["sí", "si", "s"],
        }
    }

    /// `true` when `response` (trimmed, case-insensitive) is a "yes".
    /// Anything else, including empty input, is a "no".
    pub fn is_affirmative(&self, response: &str) -> bool {
        let answer = response.trim().to_lowercase();
        self.affirmative_tokens().iter().any(|t| *t == answer)
    }

    // -----------------------------------------------------------------------
    // Pipeline banners
    // -----------------------------------------------------------------------

    pub fn processing(&self) -> &'static str {
        match self {
            Locale::English => "Processing the article...",
            Locale::Spanish => "Procesando el artículo...",
        }
    }

    pub fn no_content(&self) -> &'static str {
        match self {
            Locale::English => "The article does not contain valid text to process.",
            Locale::Spanish => "El artículo no contiene texto válido para procesar.",
        }
    }

    pub fn processed(&self) -> &'static str {
        match self {
            Locale::English => "The article has been processed and divided into paragraphs.",
            Locale::Spanish => "El artículo ha sido procesado y dividido en párrafos.",
        }
    }

    pub fn saved(&self, index: usize, path: &Path) -> String {
        match self {
            Locale::English => {
                format!("Paragraph {index} has been saved as '{}'", path.display())
            }
            Locale::Spanish => {
                format!("El párrafo {index} se ha guardado como '{}'", path.display())
            }
        }
    }

    pub fn already_exists(&self, path: &Path) -> String {
        match self {
            Locale::English => format!(
                "The file '{}' already exists. It will not be regenerated.",
                path.display()
            ),
            Locale::Spanish => format!(
                "El archivo '{}' ya existe. No se generará de nuevo.",
                path.display()
            ),
        }
    }

    /// The operator line for one paragraph of the cache pass.
    pub fn cache_progress(&self, index: usize, path: &Path, outcome: CacheOutcome) -> String {
        match outcome {
            CacheOutcome::Hit => self.already_exists(path),
            CacheOutcome::Created => self.saved(index, path),
        }
    }

    // -----------------------------------------------------------------------
    // Consent and manifest
    // -----------------------------------------------------------------------

    pub fn consent_prompt(&self) -> &'static str {
        match self {
            Locale::English => "Would you like to listen to the generated audios? (yes/no): ",
            Locale::Spanish => "¿Te gustaría escuchar los audios generados? (si/no): ",
        }
    }

    pub fn declined(&self) -> &'static str {
        match self {
            Locale::English => "Thank you for using the program!",
            Locale::Spanish => "¡Gracias por usar el programa!",
        }
    }

    pub fn manifest_heading(&self) -> &'static str {
        match self {
            Locale::English => "Available paragraphs:",
            Locale::Spanish => "Párrafos disponibles:",
        }
    }

    pub fn no_audio(&self) -> &'static str {
        match self {
            Locale::English => "No audio files are available to play.",
            Locale::Spanish => "No hay audios disponibles para reproducir.",
        }
    }

    // -----------------------------------------------------------------------
    // Browsing and playing
    // -----------------------------------------------------------------------

    pub fn selection_prompt(&self, max: usize) -> String {
        match self {
            Locale::English => {
                format!("Select the number of the paragraph you want to listen to (1-{max}): ")
            }
            Locale::Spanish => {
                format!("Selecciona el número del párrafo que deseas escuchar (1-{max}): ")
            }
        }
    }

    pub fn playing(&self, index: usize) -> String {
        match self {
            Locale::English => format!("Playing paragraph {index}..."),
            Locale::Spanish => format!("Reproduciendo el párrafo {index}..."),
        }
    }

    pub fn content_heading(&self, index: usize) -> String {
        match self {
            Locale::English => format!("Content of paragraph {index}:"),
            Locale::Spanish => format!("Contenido del párrafo {index}:"),
        }
    }

    pub fn continue_prompt(&self) -> &'static str {
        match self {
            Locale::English => "Would you like to listen to another paragraph? (yes/no): ",
            Locale::Spanish => "¿Deseas escuchar otro párrafo? (si/no): ",
        }
    }

    pub fn goodbye(&self) -> &'static str {
        match self {
            Locale::English => "Thank you for using the program! Goodbye.",
            Locale::Spanish => "¡Gracias por usar el programa! Hasta luego.",
        }
    }

    // -----------------------------------------------------------------------
    // Recoverable errors
    // -----------------------------------------------------------------------

    fn missing_file(&self, path: &Path) -> String {
        match self {
            Locale::English => format!(
                "The file '{}' does not exist. Please select another paragraph.",
                path.display()
            ),
            Locale::Spanish => format!(
                "El archivo '{}' no existe. Por favor, selecciona otro párrafo.",
                path.display()
            ),
        }
    }

    /// Render a recoverable browsing error for the operator.
    pub fn describe(&self, error: &BrowseError) -> String {
        match (self, error) {
            (Locale::English, BrowseError::InvalidInput { max, .. }) => {
                format!("Invalid input. Please enter a number between 1 and {max}.")
            }
            (Locale::Spanish, BrowseError::InvalidInput { max, .. }) => {
                format!("Entrada no válida. Por favor, introduce un número entre 1 y {max}.")
            }
            (Locale::English, BrowseError::OutOfRange { max, .. }) => {
                format!("Please select a valid number between 1 and {max}.")
            }
            (Locale::Spanish, BrowseError::OutOfRange { max, .. }) => {
                format!("Por favor, selecciona un número válido entre 1 y {max}.")
            }
            (_, BrowseError::ArtifactMissing { path, .. }) => self.missing_file(path),
            (Locale::English, BrowseError::Playback(e)) => format!("Error playing the file: {e}"),
            (Locale::Spanish, BrowseError::Playback(e)) => {
                format!("Error al reproducir el archivo: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn english_affirmatives() {
        let l = Locale::English;
        assert!(l.is_affirmative("yes"));
        assert!(l.is_affirmative("  Y \n"));
        assert!(l.is_affirmative("YES"));
        assert!(!l.is_affirmative("yeah"));
        assert!(!l.is_affirmative("no"));
        assert!(!l.is_affirmative(""));
        assert!(!l.is_affirmative("si"));
    }

    #[test]
    fn spanish_affirmatives() {
        let l = Locale::Spanish;
        assert!(l.is_affirmative("sí"));
        assert!(l.is_affirmative("SÍ"));
        assert!(l.is_affirmative("si"));
        assert!(l.is_affirmative("s"));
        assert!(!l.is_affirmative("yes"));
        assert!(!l.is_affirmative("no"));
    }

    #[test]
    fn tag_selection_is_case_insensitive() {
        assert_eq!(Locale::for_tag("ES"), Locale::Spanish);
        assert_eq!(Locale::for_tag("es_AR"), Locale::Spanish);
        assert_eq!(Locale::for_tag(""), Locale::English);
        assert_eq!(Locale::for_tag("est"), Locale::English);
    }

    #[test]
    fn range_messages_name_the_bounds() {
        let err = BrowseError::OutOfRange { selection: 5, max: 3 };
        assert_eq!(
            Locale::English.describe(&err),
            "Please select a valid number between 1 and 3."
        );
        assert_eq!(
            Locale::Spanish.describe(&err),
            "Por favor, selecciona un número válido entre 1 y 3."
        );
    }

    #[test]
    fn invalid_input_message() {
        let err = BrowseError::InvalidInput {
            input: "abc".into(),
            max: 3,
        };
        assert!(Locale::English.describe(&err).starts_with("Invalid input."));
        assert!(Locale::Spanish.describe(&err).starts_with("Entrada no válida."));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = BrowseError::ArtifactMissing {
            index: 2,
            path: PathBuf::from("paragraph_2.mp3"),
        };
        assert_eq!(
            Locale::English.describe(&err),
            "The file 'paragraph_2.mp3' does not exist. Please select another paragraph."
        );
    }

    #[test]
    fn cache_progress_lines() {
        let path = PathBuf::from("paragraph_3.mp3");
        assert_eq!(
            Locale::English.cache_progress(3, &path, CacheOutcome::Created),
            "Paragraph 3 has been saved as 'paragraph_3.mp3'"
        );
        assert_eq!(
            Locale::Spanish.cache_progress(3, &path, CacheOutcome::Created),
            "El párrafo 3 se ha guardado como 'paragraph_3.mp3'"
        );
        assert_eq!(
            Locale::Spanish.cache_progress(3, &path, CacheOutcome::Hit),
            "El archivo 'paragraph_3.mp3' ya existe. No se generará de nuevo."
        );
    }

    #[test]
    fn selection_prompt_shows_range() {
        assert!(Locale::English.selection_prompt(32).ends_with("(1-32): "));
        assert!(Locale::Spanish.selection_prompt(10).ends_with("(1-10): "));
    }
}
