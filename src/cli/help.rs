//! Topic help for the envset binary

use colored::*;

/// Extended help beyond `--help`, one page per topic
pub struct HelpSystem;

impl HelpSystem {
    /// Create a new help system
    pub fn new() -> Self {
        Self
    }

    /// Names accepted by `--help-topic`
    pub fn topics() -> &'static [&'static str] {
        &["types", "policy", "examples"]
    }

    /// Display quick help for specific topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "types" | "type" => Some(self.format_types_help(use_colors)),
            "policy" | "errors" => Some(self.format_policy_help(use_colors)),
            "examples" | "example" => Some(self.format_examples_help(use_colors)),
            _ => None,
        }
    }

    /// Message shown for an unknown topic
    pub fn unknown_topic(&self, topic: &str) -> String {
        format!(
            "Unknown help topic '{}'. Available topics: {}",
            topic,
            Self::topics().join(", ")
        )
    }

    fn heading(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            format!("{}\n", title.bold().cyan())
        } else {
            format!("{}\n", title)
        }
    }

    fn format_types_help(&self, use_colors: bool) -> String {
        let mut help = self.heading("Setting Types", use_colors);
        help.push_str("\n");
        help.push_str("  --string NAME=DEFAULT    value taken verbatim\n");
        help.push_str("  --int NAME=DEFAULT       signed decimal integer (e.g. -1, 8080)\n");
        help.push_str("  --bool NAME=DEFAULT      1 t T TRUE true True / 0 f F FALSE false False\n");
        help.push_str("  --duration NAME=DEFAULT  combined units: ns us ms s m h (e.g. 1m3s, 1.5s)\n");
        help.push_str("  --list NAME=DEFAULT      comma-separated, blanks dropped (e.g. host1,host2)\n");
        help.push_str("\n");
        help.push_str("Each setting NAME is read from the variable PREFIX + NAME.\n");
        help
    }

    fn format_policy_help(&self, use_colors: bool) -> String {
        let mut help = self.heading("Error Policy", use_colors);
        help.push_str("\n");
        help.push_str("  malformed values   reported by default; --ignore-parse-errors keeps the\n");
        help.push_str("                     default silently. The default is restored either way.\n");
        help.push_str("  unexpected keys    prefixed variables with no declared setting; ignored\n");
        help.push_str("                     unless --error-on-extra-keys is given.\n");
        help.push_str("  missing keys       declared settings with no (valid) variable; ignored\n");
        help.push_str("                     unless --error-on-missing-keys is given.\n");
        help.push_str("\n");
        help.push_str("Every problem found in one pass is reported together; exit status is 1.\n");
        help
    }

    fn format_examples_help(&self, use_colors: bool) -> String {
        let mut help = self.heading("Examples", use_colors);
        let examples = [
            (
                "Check a service's settings",
                "envset --prefix APP_ --int PORT=8080 --duration TIMEOUT=30s",
            ),
            (
                "Refuse typos in variable names",
                "envset --prefix APP_ --string HOST=localhost --error-on-extra-keys",
            ),
            (
                "Require every setting to be provided",
                "envset --prefix APP_ --list KAFKAS= --error-on-missing-keys",
            ),
            (
                "Print example exports",
                "envset --prefix APP_ --int PORT=8080 --usage",
            ),
        ];

        for (description, command) in examples {
            help.push_str("\n");
            if use_colors {
                help.push_str(&format!("  {}\n    {}\n", description.bold(), command.green()));
            } else {
                help.push_str(&format!("  {}\n    {}\n", description, command));
            }
        }
        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}
