//! Cleanup of recognized page text before parsing.
//!
//! OCR engines emit CRLF line endings, form feeds between pages, ligatures
//! and the occasional replacement character. None of that helps the field
//! patterns, so each page's text goes through this pipeline first.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Leave recognized text untouched
    None,
    /// Line endings, NFC, ligatures, stray control characters
    #[default]
    Minimal,
    /// Minimal plus whitespace collapsing and blank-line limiting
    Standard,
}

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Convert CRLF and lone CR to LF
    pub normalize_line_endings: bool,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove form feeds emitted between pages
    pub remove_form_feeds: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Strip spaces and tabs at the end of each line
    pub strip_trailing_whitespace: bool,

    /// Collapse runs of spaces/tabs into a single space
    pub collapse_spaces: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::None => Self::none(),
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
        }
    }

    /// No cleanup at all.
    pub fn none() -> Self {
        Self {
            normalize_line_endings: false,
            normalize_unicode: false,
            fix_ligatures: false,
            remove_form_feeds: false,
            remove_replacement_char: false,
            remove_pua: false,
            strip_trailing_whitespace: false,
            collapse_spaces: false,
            max_consecutive_newlines: 0,
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_line_endings: true,
            normalize_unicode: true,
            fix_ligatures: true,
            remove_form_feeds: true,
            remove_replacement_char: true,
            remove_pua: true,
            strip_trailing_whitespace: true,
            collapse_spaces: false,
            max_consecutive_newlines: 0,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            collapse_spaces: true,
            max_consecutive_newlines: 2,
            ..Self::minimal()
        }
    }

    /// Whether any step is enabled.
    pub fn is_noop(&self) -> bool {
        !(self.normalize_line_endings
            || self.normalize_unicode
            || self.fix_ligatures
            || self.remove_form_feeds
            || self.remove_replacement_char
            || self.remove_pua
            || self.strip_trailing_whitespace
            || self.collapse_spaces
            || self.max_consecutive_newlines > 0)
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::minimal()
    }
}

const LIGATURES: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// Text cleanup pipeline.
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    options: CleanupOptions,
    trailing_ws: Regex,
    space_runs: Regex,
    newline_runs: Option<Regex>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        let newline_runs = match options.max_consecutive_newlines {
            0 => None,
            max => Some(
                Regex::new(&format!(r"\n{{{},}}", max as usize + 1))
                    .expect("newline limit pattern must compile"),
            ),
        };
        Self {
            options,
            trailing_ws: Regex::new(r"(?m)[ \t]+$").expect("trailing whitespace pattern"),
            space_runs: Regex::new(r"[ \t]{2,}").expect("space run pattern"),
            newline_runs,
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Clean one page of recognized text.
    pub fn process(&self, text: &str) -> String {
        if self.options.is_noop() {
            return text.to_string();
        }

        let mut result = text.to_string();

        if self.options.normalize_line_endings {
            result = result.replace("\r\n", "\n").replace('\r', "\n");
        }

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_form_feeds {
            result = result.replace('\u{000C}', "");
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.remove_pua {
            result = remove_pua_chars(&result);
        }

        if self.options.collapse_spaces {
            result = self.space_runs.replace_all(&result, " ").into_owned();
        }

        if self.options.strip_trailing_whitespace {
            result = self.trailing_ws.replace_all(&result, "").into_owned();
        }

        if let Some(ref re) = self.newline_runs {
            let replacement = "\n".repeat(self.options.max_consecutive_newlines as usize);
            result = re.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn remove_pua_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !(0xE000..=0xF8FF).contains(&code)
                && !(0xF0000..=0xFFFFD).contains(&code)
                && !(0x100000..=0x10FFFD).contains(&code)
        })
        .collect()
}
