//! Password gate in front of the admin editors. This is a convenience lock
//! for the panel, not an access control boundary: the site's write routes do
//! not check it.

pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password. Please try again.";

#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
    unlocked: bool,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            unlocked: false,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn unlock(&mut self, attempt: &str) -> Result<(), &'static str> {
        if !self.password.is_empty() && attempt == self.password {
            self.unlocked = true;
            Ok(())
        } else {
            self.unlocked = false;
            Err(INVALID_PASSWORD_MESSAGE)
        }
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_only_on_exact_match() {
        let mut gate = AdminGate::new("rotary123");
        assert!(!gate.is_unlocked());

        assert_eq!(gate.unlock("Rotary123"), Err(INVALID_PASSWORD_MESSAGE));
        assert!(!gate.is_unlocked());

        gate.unlock("rotary123").expect("unlock");
        assert!(gate.is_unlocked());

        gate.lock();
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn empty_password_never_unlocks() {
        let mut gate = AdminGate::new("");
        assert!(gate.unlock("").is_err());
    }
}
