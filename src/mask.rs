//! Hide registered passwords in printed output.

use regex::Regex;

pub const MASK: &str = "********";

#[derive(Debug, Default)]
pub struct PasswordMask {
    hidden: Vec<String>,
    pattern: Option<Regex>,
}

impl PasswordMask {
    pub fn new() -> Self {
        PasswordMask::default()
    }

    /// Register passwords to hide. Processing stops at the first blank or
    /// already registered value; the values after it are not registered.
    pub fn register(&mut self, passwords: &[&str]) {
        for password in passwords {
            if password.is_empty() || self.hidden.iter().any(|h| h == password) {
                break;
            }
            self.hidden.push(password.to_string());
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        if self.hidden.is_empty() {
            self.pattern = None;
            return;
        }
        let alternation = self
            .hidden
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");
        self.pattern = Regex::new(&format!("({})", alternation)).ok();
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }

    /// `text` with every registered password replaced by asterisks.
    pub fn replace(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re.replace_all(text, MASK).into_owned(),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_registered_passwords() {
        let mut mask = PasswordMask::new();
        mask.register(&["s3cret", "p.w"]);
        assert_eq!(
            mask.replace("login s3cret then p.w, not pxw"),
            "login ******** then ********, not pxw"
        );
    }

    #[test]
    fn nothing_registered_is_identity() {
        let mask = PasswordMask::new();
        assert!(mask.is_empty());
        assert_eq!(mask.replace("plain"), "plain");
    }

    #[test]
    fn blank_stops_registration() {
        let mut mask = PasswordMask::new();
        mask.register(&["one", "", "two"]);
        assert_eq!(mask.replace("one two"), "******** two");
    }

    #[test]
    fn duplicate_stops_registration() {
        let mut mask = PasswordMask::new();
        mask.register(&["one"]);
        mask.register(&["one", "two"]);
        assert_eq!(mask.replace("one two"), "******** two");
    }
}
