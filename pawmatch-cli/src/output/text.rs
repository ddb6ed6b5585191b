//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use pawmatch_core::Dog;
use pawmatch_store::{SearchPhase, SearchSnapshot, Settings};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const FAVORITE_MARK: char = '★';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the loaded results with a header line.
    pub fn format_search(&self, snapshot: &SearchSnapshot) -> String {
        let mut lines = Vec::new();

        match snapshot.phase {
            SearchPhase::Error if snapshot.dogs.is_empty() => {
                let message = snapshot.last_error.as_deref().unwrap_or("Search failed.");
                return self.red(message);
            }
            _ if snapshot.dogs.is_empty() => return self.dim("No dogs match these filters."),
            _ => {}
        }

        lines.push(format!(
            "{} {} of {} dogs {}",
            self.bold("Showing"),
            snapshot.dogs.len(),
            snapshot.total_dogs,
            self.dim(&format!("(page {})", snapshot.pagination.page)),
        ));

        for dog in &snapshot.dogs {
            let favorite = snapshot.favorites.iter().any(|id| id == &dog.id);
            lines.push(self.format_dog_line(dog, favorite));
        }

        if snapshot.phase == SearchPhase::Error {
            if let Some(error) = &snapshot.last_error {
                lines.push(self.yellow(&format!("Could not load more: {error}")));
            }
        }

        lines.join("\n")
    }

    /// One dog per line: favorite mark, id, summary.
    pub fn format_dog_line(&self, dog: &Dog, favorite: bool) -> String {
        let mark = if favorite {
            self.yellow(&FAVORITE_MARK.to_string())
        } else {
            " ".to_string()
        };
        format!("{mark} {} {}", self.dim(&dog.id), dog.summary())
    }

    /// Formats the matched dog.
    pub fn format_match(&self, dog: &Dog) -> String {
        [
            self.green("It's a match!"),
            String::new(),
            format!("Name:  {}", self.bold(&dog.name)),
            format!("Breed: {}", dog.breed),
            format!("Age:   {}", dog.age),
            format!("Zip:   {}", dog.zip_code),
            format!("Photo: {}", self.cyan(&dog.img)),
        ]
        .join("\n")
    }

    /// Formats the breed list, one per line.
    pub fn format_breeds(&self, breeds: &[String]) -> String {
        if breeds.is_empty() {
            return self.dim("No breeds available.");
        }
        breeds.join("\n")
    }

    /// Formats the favorites list.
    pub fn format_favorites(&self, favorites: &[String]) -> String {
        if favorites.is_empty() {
            return self.dim("No favorites yet.");
        }
        favorites
            .iter()
            .map(|id| format!("{} {id}", self.yellow(&FAVORITE_MARK.to_string())))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats settings for `config show`.
    pub fn format_settings(&self, settings: &Settings) -> String {
        let timeout = settings
            .request_timeout_secs
            .map_or_else(|| "none".to_string(), |secs| format!("{secs}s"));
        [
            self.bold("PawMatch Configuration"),
            "─".repeat(40),
            format!("Base URL:     {}", self.cyan(&settings.base_url)),
            format!("Page size:    {}", settings.page_size),
            format!("Timeout:      {timeout}"),
            format!("Default sort: {}:{}", settings.default_sort, settings.default_order),
            format!("Log level:    {}", settings.log_level),
        ]
        .join("\n")
    }

    /// Formats a verification time in local time.
    pub fn format_verified(&self, at: Option<DateTime<Utc>>) -> String {
        match at {
            Some(at) => format!(
                "Session verified at {}",
                self.green(&at.with_timezone(&Local).format("%H:%M:%S").to_string())
            ),
            None => self.red("Session not verified."),
        }
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
