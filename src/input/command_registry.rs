//! `:` commands, looked up by name or alias like Helix typed commands.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CommandDef {
    pub name: &'static str,
    pub aliases: Vec<&'static str>,
    pub description: &'static str,
}

pub struct CommandRegistry {
    commands: Vec<CommandDef>,
    // name or alias -> index
    lookup: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            commands: Vec::new(),
            lookup: HashMap::new(),
        };
        registry.register_default_commands();
        registry
    }

    fn register_default_commands(&mut self) {
        let defaults: [(&'static str, &[&'static str], &'static str); 18] = [
            ("quit", &["q"], "Quit"),
            ("help", &["h", "?"], "Show key bindings"),
            ("home", &["dashboard", "board"], "Open your dashboard"),
            ("tasks", &["t", "list"], "All tasks"),
            ("mine", &["my-tasks", "m"], "Tasks assigned to me"),
            ("new", &["task-new", "add"], "Create a task"),
            ("employees", &["emp", "e"], "Employee summary"),
            ("add-employee", &["emp-add"], "Add an employee"),
            ("stats", &["s"], "Statistics"),
            ("profile", &["me"], "Your profile"),
            ("reload", &["r", "refresh"], "Fetch the view again"),
            ("back", &["b"], "Previous view"),
            ("login", &["signin"], "Sign in"),
            ("signup", &["register"], "Create an account"),
            ("forgot", &["forgot-password"], "Request a password reset"),
            ("reset", &["reset-password"], "Reset password with a token: reset <token>"),
            ("logout", &["signout"], "Sign out"),
            ("lang", &["language"], "Switch language: lang en|fr"),
        ];

        for (name, aliases, description) in defaults {
            self.register(CommandDef {
                name,
                aliases: aliases.to_vec(),
                description,
            });
        }
    }

    fn register(&mut self, cmd: CommandDef) {
        let idx = self.commands.len();
        self.lookup.insert(cmd.name.to_string(), idx);
        for alias in &cmd.aliases {
            self.lookup.insert(alias.to_string(), idx);
        }
        self.commands.push(cmd);
    }

    /// Commands whose name or an alias starts with `input`, shortest first
    pub fn find_matches(&self, input: &str) -> Vec<&CommandDef> {
        if input.is_empty() {
            return self.commands.iter().collect();
        }

        let input_lower = input.to_lowercase();
        let mut matches: Vec<&CommandDef> = self
            .commands
            .iter()
            .filter(|cmd| {
                cmd.name.starts_with(&input_lower)
                    || cmd.aliases.iter().any(|alias| alias.starts_with(&input_lower))
            })
            .collect();
        matches.sort_by_key(|cmd| cmd.name.len());
        matches
    }

    pub fn find_exact(&self, name: &str) -> Option<&CommandDef> {
        let idx = self.lookup.get(name)?;
        self.commands.get(*idx)
    }

    pub fn all_commands(&self) -> &[CommandDef] {
        &self.commands
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches() {
        let registry = CommandRegistry::new();

        let matches = registry.find_matches("q");
        assert!(matches.iter().any(|cmd| cmd.name == "quit"));

        // alias prefix
        let matches = registry.find_matches("my");
        assert!(matches.iter().any(|cmd| cmd.name == "mine"));

        assert_eq!(registry.find_matches("").len(), registry.all_commands().len());
    }

    #[test]
    fn test_find_exact() {
        let registry = CommandRegistry::new();

        assert_eq!(registry.find_exact("q").unwrap().name, "quit");
        assert_eq!(registry.find_exact("dashboard").unwrap().name, "home");
        assert!(registry.find_exact("nonexistent").is_none());
    }
}
